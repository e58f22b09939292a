use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use validator::Validate;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Student {
    pub id: i64,
    pub username: String,
    pub email: String,
    pub mobile: Option<String>,
    pub is_verified: bool,
    #[serde(skip_serializing)]
    pub verification_expires: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct NewStudent {
    pub username: String,
    pub email: String,
    pub mobile: Option<String>,
    pub password_hash: String,
    pub verification_token_hash: String,
    pub verification_expires: DateTime<Utc>,
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct RegisterStudentRequest {
    #[validate(length(min = 1, max = 64, message = "is required"))]
    pub username: String,
    #[validate(email(message = "must be a valid email address"))]
    pub email: String,
    pub mobile: Option<String>,
    #[validate(length(min = 8, message = "must be at least 8 characters"))]
    pub password: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct StudentLoginRequest {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ResendVerificationRequest {
    pub email: String,
}

/// Strip angle brackets and surrounding whitespace from free-text input.
pub fn sanitize(value: &str) -> String {
    value.replace(['<', '>'], "").trim().to_string()
}
