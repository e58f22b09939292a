use serde::{Deserialize, Serialize};

pub const DEFAULT_GST_PERCENT: f64 = 18.0;

/// Normalized pricing inputs for a course.
///
/// Every field is finite and non-negative; `discount_percent` is at most 100.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PriceInputs {
    pub price: f64,
    pub discount_percent: f64,
    pub gst_percent: f64,
}

impl Default for PriceInputs {
    fn default() -> Self {
        Self {
            price: 0.0,
            discount_percent: 0.0,
            gst_percent: DEFAULT_GST_PERCENT,
        }
    }
}

impl PriceInputs {
    /// Build inputs for a new course. Missing or unusable values take the
    /// global defaults (0 price, 0 discount, 18% GST).
    pub fn for_create(price: Option<f64>, discount_percent: Option<f64>, gst_percent: Option<f64>) -> Self {
        Self::resolve(price, discount_percent, gst_percent, Self::default())
    }

    /// Like [`PriceInputs::for_create`], but missing or unusable values fall
    /// back to `current` (the stored course values) instead.
    pub fn resolve(
        price: Option<f64>,
        discount_percent: Option<f64>,
        gst_percent: Option<f64>,
        current: PriceInputs,
    ) -> Self {
        let current = current.sanitized();
        Self {
            price: usable(price).unwrap_or(current.price),
            discount_percent: usable(discount_percent)
                .map(|d| d.min(100.0))
                .unwrap_or(current.discount_percent),
            gst_percent: usable(gst_percent).unwrap_or(current.gst_percent),
        }
    }

    /// Tax-inclusive price after discount. Stored as computed; display
    /// rounding is left to clients.
    pub fn discount_price(&self) -> f64 {
        (self.price - self.price * self.discount_percent / 100.0) * (1.0 + self.gst_percent / 100.0)
    }

    fn sanitized(self) -> Self {
        let defaults = Self::default();
        Self {
            price: usable(Some(self.price)).unwrap_or(defaults.price),
            discount_percent: usable(Some(self.discount_percent))
                .map(|d| d.min(100.0))
                .unwrap_or(defaults.discount_percent),
            gst_percent: usable(Some(self.gst_percent)).unwrap_or(defaults.gst_percent),
        }
    }
}

fn usable(value: Option<f64>) -> Option<f64> {
    value.filter(|v| v.is_finite() && *v >= 0.0)
}
