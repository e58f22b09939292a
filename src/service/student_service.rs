use std::sync::Arc;
use chrono::{Duration, Utc};
use validator::Validate;
use crate::{
    auth::{generate_verification_token, hash_token, AuthService, TokenService},
    domain::*,
    error::{AppError, Result},
    notifications::{Notification, Notifier},
    repository::StudentRepository,
};

pub struct StudentService {
    repo: Arc<dyn StudentRepository>,
    tokens: Arc<TokenService>,
    notifier: Arc<dyn Notifier>,
    base_url: String,
    verification_ttl: Duration,
}

impl StudentService {
    pub fn new(
        repo: Arc<dyn StudentRepository>,
        tokens: Arc<TokenService>,
        notifier: Arc<dyn Notifier>,
        base_url: String,
        verification_ttl_minutes: i64,
    ) -> Self {
        Self {
            repo,
            tokens,
            notifier,
            base_url: base_url.trim_end_matches('/').to_string(),
            verification_ttl: Duration::minutes(verification_ttl_minutes),
        }
    }

    pub async fn register(&self, request: RegisterStudentRequest) -> Result<Student> {
        let request = RegisterStudentRequest {
            username: sanitize(&request.username),
            email: sanitize(&request.email).to_lowercase(),
            mobile: request.mobile.as_deref().map(sanitize).filter(|m| !m.is_empty()),
            password: request.password,
        };
        request.validate()?;

        if self.repo.find_by_email(&request.email).await?.is_some() {
            return Err(AppError::Validation("Email already registered".to_string()));
        }

        let password_hash = AuthService::hash_password(&request.password).await?;
        let token = generate_verification_token();

        let student = self
            .repo
            .create(NewStudent {
                username: request.username,
                email: request.email,
                mobile: request.mobile,
                password_hash,
                verification_token_hash: hash_token(&token),
                verification_expires: Utc::now() + self.verification_ttl,
            })
            .await?;

        tracing::info!("Registered student {}", student.id);
        self.send_verification(&student, &token);

        Ok(student)
    }

    pub async fn login(&self, email: &str, password: &str) -> Result<(Student, String)> {
        let email = email.trim().to_lowercase();
        let invalid = || AppError::Unauthorized("Invalid credentials".to_string());

        let hash = self.repo.get_password_hash(&email).await?.ok_or_else(invalid)?;
        if !AuthService::verify_password(password, &hash).await? {
            return Err(invalid());
        }

        let student = self.repo.find_by_email(&email).await?.ok_or_else(invalid)?;
        if !student.is_verified {
            return Err(AppError::Forbidden(
                "Account not verified. Please check your email.".to_string(),
            ));
        }

        let token = self.tokens.issue_student(&student)?;
        Ok((student, token))
    }

    pub async fn verify(&self, token: &str) -> Result<Student> {
        let token = token.trim();
        if token.is_empty() {
            return Err(AppError::Validation("Verification token is required".to_string()));
        }

        let student = self
            .repo
            .find_by_verification_hash(&hash_token(token))
            .await?
            .ok_or_else(|| AppError::Validation("Invalid verification link".to_string()))?;

        let expired = student
            .verification_expires
            .map(|expires| expires < Utc::now())
            .unwrap_or(true);
        if expired {
            return Err(AppError::Validation("Verification link has expired".to_string()));
        }

        self.repo.mark_verified(student.id).await?;
        tracing::info!("Student {} verified", student.id);

        self.get(student.id).await
    }

    pub async fn resend_verification(&self, email: &str) -> Result<()> {
        let email = sanitize(email).to_lowercase();
        if email.is_empty() {
            return Err(AppError::Validation("Email is required".to_string()));
        }

        let student = self
            .repo
            .find_by_email(&email)
            .await?
            .ok_or_else(|| AppError::Validation("User not found".to_string()))?;

        if student.is_verified {
            return Err(AppError::Validation("Account already verified".to_string()));
        }

        let token = generate_verification_token();
        self.repo
            .set_verification(student.id, &hash_token(&token), Utc::now() + self.verification_ttl)
            .await?;
        self.send_verification(&student, &token);

        Ok(())
    }

    pub async fn get(&self, id: i64) -> Result<Student> {
        self.repo
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::NotFound("Student not found".to_string()))
    }

    fn send_verification(&self, student: &Student, token: &str) {
        self.notifier.notify(Notification::StudentVerification {
            email: student.email.clone(),
            username: student.username.clone(),
            verify_url: format!("{}/student/auth/verify?token={}", self.base_url, token),
        });
    }
}
