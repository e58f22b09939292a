use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::pricing::PriceInputs;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Course {
    pub id: i64,
    pub title: String,
    pub slug: String,
    pub subtitle: Option<String>,
    pub category: Option<String>,
    pub description: Option<String>,
    pub duration: Option<String>,
    pub instructor: Option<String>,
    pub level: Option<String>,
    pub features: Vec<String>,
    pub tags: Option<String>,
    pub rating: f64,
    pub students_count: i64,
    pub next_batch: Option<String>,
    pub price: f64,
    pub discount_percent: f64,
    pub gst_percent: f64,
    /// Persisted at write time; never recomputed on read.
    pub discount_price: f64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Course {
    pub fn price_inputs(&self) -> PriceInputs {
        PriceInputs {
            price: self.price,
            discount_percent: self.discount_percent,
            gst_percent: self.gst_percent,
        }
    }
}

/// Incoming course payload. Pricing fields are optional; the pricing engine
/// fills in defaults.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CourseInput {
    pub title: Option<String>,
    pub subtitle: Option<String>,
    pub category: Option<String>,
    pub description: Option<String>,
    pub duration: Option<String>,
    pub instructor: Option<String>,
    pub level: Option<String>,
    pub features: Option<Vec<String>>,
    pub tags: Option<String>,
    pub rating: Option<f64>,
    pub students_count: Option<i64>,
    pub next_batch: Option<String>,
    pub price: Option<f64>,
    pub discount_percent: Option<f64>,
    pub gst_percent: Option<f64>,
}

/// Fully resolved course fields, ready to be written.
#[derive(Debug, Clone)]
pub struct CourseRecord {
    pub title: String,
    pub slug: String,
    pub subtitle: Option<String>,
    pub category: Option<String>,
    pub description: Option<String>,
    pub duration: Option<String>,
    pub instructor: Option<String>,
    pub level: Option<String>,
    pub features: Vec<String>,
    pub tags: Option<String>,
    pub rating: f64,
    pub students_count: i64,
    pub next_batch: Option<String>,
    pub pricing: PriceInputs,
    pub discount_price: f64,
}

/// Generate a URL-safe slug from a title
pub fn slugify(title: &str) -> String {
    title
        .to_lowercase()
        .chars()
        .filter(|c| c.is_ascii_alphanumeric() || c.is_whitespace() || *c == '-')
        .collect::<String>()
        .split_whitespace()
        .collect::<Vec<_>>()
        .join("-")
}
