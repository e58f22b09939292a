use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use validator::Validate;

/// An admin-panel account. Operators without a role can log in but pass no
/// capability check.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Operator {
    pub id: i64,
    pub username: String,
    pub role: Option<Role>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Admin,
    Developer,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Admin => "admin",
            Role::Developer => "developer",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "admin" => Some(Role::Admin),
            "developer" => Some(Role::Developer),
            _ => None,
        }
    }
}

#[derive(Debug, Clone)]
pub struct NewOperator {
    pub username: String,
    pub password_hash: String,
    pub role: Option<Role>,
}

/// `role` arrives as free text so an unknown value is a 400 rather than a
/// body rejection.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct RegisterOperatorRequest {
    #[validate(length(min = 3, max = 64, message = "must be 3 to 64 characters"))]
    pub username: String,
    #[validate(length(min = 8, message = "must be at least 8 characters"))]
    pub password: String,
    pub role: Option<String>,
    pub admin_key: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct OperatorLoginRequest {
    pub username: String,
    pub password: String,
}
