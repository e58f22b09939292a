use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BlogPost {
    pub id: i64,
    pub title: String,
    pub slug: String,
    pub category: String,
    pub tag: Option<String>,
    pub color: Option<String>,
    pub img_url: String,
    pub excerpt: Option<String>,
    pub created_by: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Incoming blog payload. On update, absent fields keep their stored values.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BlogInput {
    pub title: Option<String>,
    pub category: Option<String>,
    pub tag: Option<String>,
    pub color: Option<String>,
    pub img_url: Option<String>,
    pub excerpt: Option<String>,
    pub created_by: Option<String>,
}

#[derive(Debug, Clone)]
pub struct BlogRecord {
    pub title: String,
    pub slug: String,
    pub category: String,
    pub tag: Option<String>,
    pub color: Option<String>,
    pub img_url: String,
    pub excerpt: Option<String>,
    pub created_by: Option<String>,
}
