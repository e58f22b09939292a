use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use validator::Validate;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JobApplication {
    pub id: i64,
    pub name: String,
    pub email: String,
    pub phone: Option<String>,
    pub position: String,
    pub experience: Option<f64>,
    pub cover_letter: Option<String>,
    pub current_ctc_amount: Option<f64>,
    pub current_ctc_currency: Option<String>,
    pub current_ctc_period: Option<String>,
    pub expected_ctc_amount: Option<f64>,
    pub expected_ctc_currency: Option<String>,
    pub expected_ctc_period: Option<String>,
    pub location: Option<String>,
    pub applied_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct CreateApplicationRequest {
    #[validate(length(min = 1, max = 120, message = "is required"))]
    pub name: String,
    #[validate(email(message = "must be a valid email address"))]
    pub email: String,
    pub phone: Option<String>,
    #[validate(length(min = 1, max = 120, message = "is required"))]
    pub position: String,
    #[validate(range(min = 0.0, max = 60.0, message = "must be between 0 and 60 years"))]
    pub experience: Option<f64>,
    #[validate(length(max = 5000, message = "is too long"))]
    pub cover_letter: Option<String>,
    #[validate(range(min = 0.0, message = "cannot be negative"))]
    pub current_ctc_amount: Option<f64>,
    pub current_ctc_currency: Option<String>,
    pub current_ctc_period: Option<String>,
    #[validate(range(min = 0.0, message = "cannot be negative"))]
    pub expected_ctc_amount: Option<f64>,
    pub expected_ctc_currency: Option<String>,
    pub expected_ctc_period: Option<String>,
    pub location: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct BulkDeleteRequest {
    #[serde(default)]
    pub ids: Vec<i64>,
}
