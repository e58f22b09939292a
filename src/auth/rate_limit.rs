use std::collections::HashMap;
use std::time::{Duration, Instant};

use tokio::sync::Mutex;

use crate::config::RateLimitConfig;

#[derive(Debug, Clone, Copy)]
struct AttemptWindow {
    started: Instant,
    count: u32,
}

/// Fixed-window attempt counter keyed by client identifier.
///
/// The table never holds more than `capacity` keys. When full, expired windows
/// are dropped first and then the oldest live window is evicted.
pub struct RateLimiter {
    max_attempts: u32,
    window: Duration,
    capacity: usize,
    windows: Mutex<HashMap<String, AttemptWindow>>,
}

impl RateLimiter {
    pub fn new(max_attempts: u32, window: Duration, capacity: usize) -> Self {
        Self {
            max_attempts,
            window,
            capacity: capacity.max(1),
            windows: Mutex::new(HashMap::new()),
        }
    }

    pub fn from_config(config: &RateLimitConfig) -> Self {
        Self::new(
            config.max_attempts,
            Duration::from_secs(config.window_minutes * 60),
            config.capacity,
        )
    }

    /// Records an attempt. Returns false once the key is over its budget.
    pub async fn check(&self, key: &str) -> bool {
        self.check_at(key, Instant::now()).await
    }

    pub async fn check_at(&self, key: &str, now: Instant) -> bool {
        let mut windows = self.windows.lock().await;

        if let Some(entry) = windows.get_mut(key) {
            if now.saturating_duration_since(entry.started) >= self.window {
                *entry = AttemptWindow { started: now, count: 0 };
            }
            entry.count = entry.count.saturating_add(1);
            return entry.count <= self.max_attempts;
        }

        if windows.len() >= self.capacity {
            self.evict(&mut windows, now);
        }

        windows.insert(key.to_string(), AttemptWindow { started: now, count: 1 });
        self.max_attempts >= 1
    }

    fn evict(&self, windows: &mut HashMap<String, AttemptWindow>, now: Instant) {
        let window = self.window;
        windows.retain(|_, entry| now.saturating_duration_since(entry.started) < window);

        if windows.len() >= self.capacity {
            let oldest = windows
                .iter()
                .min_by_key(|(_, entry)| entry.started)
                .map(|(key, _)| key.clone());
            if let Some(key) = oldest {
                tracing::debug!("Rate limiter full, evicting {}", key);
                windows.remove(&key);
            }
        }
    }

    pub async fn tracked_keys(&self) -> usize {
        self.windows.lock().await.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_blocks_after_max_attempts() {
        let limiter = RateLimiter::new(3, Duration::from_secs(60), 100);
        let now = Instant::now();

        assert!(limiter.check_at("1.2.3.4", now).await);
        assert!(limiter.check_at("1.2.3.4", now).await);
        assert!(limiter.check_at("1.2.3.4", now).await);
        assert!(!limiter.check_at("1.2.3.4", now).await);

        // Other clients are unaffected
        assert!(limiter.check_at("5.6.7.8", now).await);
    }

    #[tokio::test]
    async fn test_window_resets() {
        let limiter = RateLimiter::new(1, Duration::from_secs(60), 100);
        let start = Instant::now();

        assert!(limiter.check_at("k", start).await);
        assert!(!limiter.check_at("k", start + Duration::from_secs(30)).await);
        assert!(limiter.check_at("k", start + Duration::from_secs(61)).await);
    }

    #[tokio::test]
    async fn test_capacity_is_bounded() {
        let limiter = RateLimiter::new(5, Duration::from_secs(60), 3);
        let start = Instant::now();

        for i in 0..10u64 {
            let key = format!("client-{}", i);
            assert!(limiter.check_at(&key, start + Duration::from_millis(i)).await);
            assert!(limiter.tracked_keys().await <= 3);
        }
    }

    #[tokio::test]
    async fn test_expired_entries_evicted_first() {
        let limiter = RateLimiter::new(1, Duration::from_secs(60), 2);
        let start = Instant::now();

        assert!(limiter.check_at("stale", start).await);
        assert!(limiter.check_at("fresh", start + Duration::from_secs(50)).await);
        assert!(!limiter.check_at("fresh", start + Duration::from_secs(55)).await);

        // "stale" has expired, so it goes and "fresh" keeps its exhausted budget
        assert!(limiter.check_at("new", start + Duration::from_secs(70)).await);
        assert!(!limiter.check_at("fresh", start + Duration::from_secs(75)).await);
    }
}
