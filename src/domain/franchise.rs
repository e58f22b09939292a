use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use validator::Validate;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FranchiseLead {
    pub id: i64,
    pub name: String,
    pub mobile: String,
    pub email: String,
    pub city: String,
    pub interested: String,
    pub ip: Option<String>,
    pub status: FranchiseStatus,
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum FranchiseStatus {
    Pending,
    Contacted,
    Approved,
    Rejected,
}

impl FranchiseStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            FranchiseStatus::Pending => "pending",
            FranchiseStatus::Contacted => "contacted",
            FranchiseStatus::Approved => "approved",
            FranchiseStatus::Rejected => "rejected",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "pending" => Some(FranchiseStatus::Pending),
            "contacted" => Some(FranchiseStatus::Contacted),
            "approved" => Some(FranchiseStatus::Approved),
            "rejected" => Some(FranchiseStatus::Rejected),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct CreateFranchiseRequest {
    #[validate(length(min = 1, max = 120, message = "is required"))]
    pub name: String,
    pub mobile: String,
    #[validate(email(message = "must be a valid email address"))]
    pub email: String,
    #[validate(length(min = 1, max = 120, message = "is required"))]
    pub city: String,
    #[validate(length(min = 1, max = 500, message = "is required"))]
    pub interested: String,
}

#[derive(Debug, Clone)]
pub struct NewFranchiseLead {
    pub name: String,
    pub mobile: String,
    pub email: String,
    pub city: String,
    pub interested: String,
    pub ip: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct FranchiseStatusUpdate {
    pub status: String,
    pub notes: Option<String>,
}

#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct FranchiseStats {
    pub total: i64,
    pub pending: i64,
    pub contacted: i64,
    pub approved: i64,
    pub rejected: i64,
}

/// Exactly ten ASCII digits.
pub fn is_valid_mobile(mobile: &str) -> bool {
    mobile.len() == 10 && mobile.bytes().all(|b| b.is_ascii_digit())
}
