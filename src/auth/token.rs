use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{de::DeserializeOwned, Deserialize, Serialize};

use crate::{
    config::AuthConfig,
    domain::{Operator, Role, Student},
    error::{AppError, Result},
};

const OPERATOR_AUDIENCE: &str = "operator";
const STUDENT_AUDIENCE: &str = "student";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OperatorClaims {
    pub sub: i64,
    pub username: String,
    pub role: Option<Role>,
    pub aud: String,
    pub iat: i64,
    pub exp: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StudentClaims {
    pub sub: i64,
    pub email: String,
    pub aud: String,
    pub iat: i64,
    pub exp: i64,
}

struct SigningKeys {
    encoding: EncodingKey,
    decoding: DecodingKey,
    audience: &'static str,
    lifetime: Duration,
}

impl SigningKeys {
    fn new(secret: &str, audience: &'static str, lifetime_hours: i64) -> Self {
        Self {
            encoding: EncodingKey::from_secret(secret.as_bytes()),
            decoding: DecodingKey::from_secret(secret.as_bytes()),
            audience,
            lifetime: Duration::hours(lifetime_hours),
        }
    }

    fn sign<C: Serialize>(&self, claims: &C) -> Result<String> {
        encode(&Header::new(Algorithm::HS256), claims, &self.encoding)
            .map_err(|e| AppError::Internal(format!("Token signing failed: {}", e)))
    }

    fn verify<C: DeserializeOwned>(&self, token: &str) -> Result<C> {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.set_audience(&[self.audience]);

        decode::<C>(token, &self.decoding, &validation)
            .map(|data| data.claims)
            .map_err(|e| {
                tracing::debug!("Rejected {} token: {}", self.audience, e);
                AppError::Unauthorized("Invalid token".to_string())
            })
    }
}

/// Issues and verifies the signed session tokens for both identity domains.
/// Each domain has its own secret and audience, so a token from one is never
/// accepted by the other.
pub struct TokenService {
    operator: SigningKeys,
    student: SigningKeys,
}

impl TokenService {
    pub fn new(config: &AuthConfig) -> Self {
        Self {
            operator: SigningKeys::new(&config.operator_secret, OPERATOR_AUDIENCE, config.operator_token_hours),
            student: SigningKeys::new(&config.student_secret, STUDENT_AUDIENCE, config.student_token_hours),
        }
    }

    pub fn issue_operator(&self, operator: &Operator) -> Result<String> {
        let now = Utc::now();
        let claims = OperatorClaims {
            sub: operator.id,
            username: operator.username.clone(),
            role: operator.role,
            aud: OPERATOR_AUDIENCE.to_string(),
            iat: now.timestamp(),
            exp: (now + self.operator.lifetime).timestamp(),
        };
        self.operator.sign(&claims)
    }

    pub fn verify_operator(&self, token: &str) -> Result<OperatorClaims> {
        self.operator.verify(token)
    }

    pub fn issue_student(&self, student: &Student) -> Result<String> {
        let now = Utc::now();
        let claims = StudentClaims {
            sub: student.id,
            email: student.email.clone(),
            aud: STUDENT_AUDIENCE.to_string(),
            iat: now.timestamp(),
            exp: (now + self.student.lifetime).timestamp(),
        };
        self.student.sign(&claims)
    }

    pub fn verify_student(&self, token: &str) -> Result<StudentClaims> {
        self.student.verify(token)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Settings;

    fn operator(role: Option<Role>) -> Operator {
        Operator {
            id: 7,
            username: "ops".to_string(),
            role,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    fn student() -> Student {
        Student {
            id: 3,
            username: "asha".to_string(),
            email: "asha@example.com".to_string(),
            mobile: None,
            is_verified: true,
            verification_expires: None,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn test_operator_token_roundtrip() {
        let service = TokenService::new(&Settings::default().auth);
        let token = service.issue_operator(&operator(Some(Role::Admin))).unwrap();
        let claims = service.verify_operator(&token).unwrap();
        assert_eq!(claims.sub, 7);
        assert_eq!(claims.role, Some(Role::Admin));
    }

    #[test]
    fn test_domains_do_not_cross() {
        let service = TokenService::new(&Settings::default().auth);
        let student_token = service.issue_student(&student()).unwrap();
        let operator_token = service.issue_operator(&operator(Some(Role::Admin))).unwrap();

        assert!(service.verify_operator(&student_token).is_err());
        assert!(service.verify_student(&operator_token).is_err());
        assert_eq!(service.verify_student(&student_token).unwrap().sub, 3);
    }

    #[test]
    fn test_same_secret_still_separated_by_audience() {
        let mut config = Settings::default().auth;
        config.student_secret = config.operator_secret.clone();
        let service = TokenService::new(&config);

        let student_token = service.issue_student(&student()).unwrap();
        assert!(service.verify_operator(&student_token).is_err());
    }

    #[test]
    fn test_expired_token_rejected() {
        let mut config = Settings::default().auth;
        config.student_token_hours = -2;
        let service = TokenService::new(&config);

        let token = service.issue_student(&student()).unwrap();
        assert!(matches!(service.verify_student(&token), Err(AppError::Unauthorized(_))));
    }

    #[test]
    fn test_garbage_token_rejected() {
        let service = TokenService::new(&Settings::default().auth);
        assert!(service.verify_student("not-a-jwt").is_err());
    }
}
