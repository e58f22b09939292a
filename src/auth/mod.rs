use argon2::{Argon2, PasswordHash, PasswordHasher, PasswordVerifier};
use argon2::password_hash::{SaltString, rand_core::OsRng};
use sha2::{Digest, Sha256};

use crate::error::{AppError, Result};

pub mod capability;
pub mod rate_limit;
pub mod token;

pub use capability::{authorize, Capability, RoleSet};
pub use rate_limit::RateLimiter;
pub use token::{OperatorClaims, StudentClaims, TokenService};

pub struct AuthService;

impl AuthService {
    pub async fn verify_password(password: &str, hash: &str) -> Result<bool> {
        let parsed_hash = PasswordHash::new(hash)
            .map_err(|e| AppError::Internal(format!("Invalid password hash: {}", e)))?;

        let argon2 = Argon2::default();

        Ok(argon2.verify_password(password.as_bytes(), &parsed_hash).is_ok())
    }

    /// Hash a password using Argon2.
    pub async fn hash_password(password: &str) -> Result<String> {
        let salt = SaltString::generate(&mut OsRng);
        let argon2 = Argon2::default();

        let password_hash = argon2
            .hash_password(password.as_bytes(), &salt)
            .map_err(|e| AppError::Internal(format!("Password hashing failed: {}", e)))?;

        Ok(password_hash.to_string())
    }
}

/// Random 24-byte hex token used for email verification links.
pub fn generate_verification_token() -> String {
    use rand::RngCore;
    let mut bytes = [0u8; 24];
    rand::thread_rng().fill_bytes(&mut bytes);
    hex::encode(bytes)
}

pub fn hash_token(token: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(token.as_bytes());
    hex::encode(hasher.finalize())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_verification_token_generation() {
        let token = generate_verification_token();
        assert_eq!(token.len(), 48); // 24 bytes = 48 hex chars
        assert_ne!(token, generate_verification_token());
    }

    #[test]
    fn test_token_hashing() {
        let hash1 = hash_token("abc");
        let hash2 = hash_token("abc");
        assert_eq!(hash1, hash2);
        assert_ne!(hash1, "abc");
    }

    #[tokio::test]
    async fn test_password_hashing() {
        let hash = AuthService::hash_password("correct horse").await.unwrap();
        assert!(AuthService::verify_password("correct horse", &hash).await.unwrap());
        assert!(!AuthService::verify_password("wrong horse", &hash).await.unwrap());
    }
}
