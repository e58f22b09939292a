use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use validator::Validate;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Consultation {
    pub id: i64,
    pub full_name: String,
    pub email: String,
    pub phone: String,
    pub country_code: String,
    pub service_interest: String,
    pub requirement_description: String,
    pub city_country: String,
    pub company_name: Option<String>,
    pub preferred_mode: Option<String>,
    pub status: ConsultationStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum ConsultationStatus {
    Pending,
    Contacted,
    Scheduled,
    Completed,
    Cancelled,
}

impl ConsultationStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ConsultationStatus::Pending => "pending",
            ConsultationStatus::Contacted => "contacted",
            ConsultationStatus::Scheduled => "scheduled",
            ConsultationStatus::Completed => "completed",
            ConsultationStatus::Cancelled => "cancelled",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "pending" => Some(ConsultationStatus::Pending),
            "contacted" => Some(ConsultationStatus::Contacted),
            "scheduled" => Some(ConsultationStatus::Scheduled),
            "completed" => Some(ConsultationStatus::Completed),
            "cancelled" => Some(ConsultationStatus::Cancelled),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateConsultationRequest {
    #[validate(length(min = 1, max = 120, message = "is required"))]
    pub full_name: String,
    #[validate(email(message = "must be a valid email address"))]
    pub email: String,
    #[validate(length(min = 5, max = 20, message = "must be 5 to 20 characters"))]
    pub phone: String,
    pub country_code: Option<String>,
    #[validate(length(min = 1, message = "is required"))]
    pub service_interest: String,
    #[validate(length(min = 1, max = 5000, message = "is required"))]
    pub requirement_description: String,
    #[validate(length(min = 1, message = "is required"))]
    pub city_country: String,
    pub company_name: Option<String>,
    pub preferred_mode: Option<String>,
}
