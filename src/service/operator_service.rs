use std::sync::Arc;
use subtle::ConstantTimeEq;
use validator::Validate;
use crate::{
    auth::{AuthService, TokenService},
    domain::*,
    error::{AppError, Result},
    repository::OperatorRepository,
};

pub struct OperatorService {
    repo: Arc<dyn OperatorRepository>,
    tokens: Arc<TokenService>,
    admin_create_key: Option<String>,
}

impl OperatorService {
    pub fn new(
        repo: Arc<dyn OperatorRepository>,
        tokens: Arc<TokenService>,
        admin_create_key: Option<String>,
    ) -> Self {
        Self {
            repo,
            tokens,
            admin_create_key: admin_create_key.filter(|k| !k.is_empty()),
        }
    }

    /// New operators default to `developer`. Registering an `admin` requires
    /// the configured admin key.
    pub async fn register(&self, request: RegisterOperatorRequest) -> Result<Operator> {
        let username = request.username.trim().to_string();
        let request = RegisterOperatorRequest { username, ..request };
        request.validate()?;

        let role = match request.role.as_deref().map(str::trim) {
            None | Some("") => Role::Developer,
            Some(r) => Role::from_str(&r.to_lowercase())
                .ok_or_else(|| AppError::Validation(format!("Invalid role: {}", r)))?,
        };

        if role == Role::Admin && !self.admin_key_matches(request.admin_key.as_deref()) {
            tracing::warn!("Rejected admin registration for {}", request.username);
            return Err(AppError::Forbidden("Admin registration not permitted".to_string()));
        }

        if self.repo.find_by_username(&request.username).await?.is_some() {
            return Err(AppError::Validation("User already exists".to_string()));
        }

        let password_hash = AuthService::hash_password(&request.password).await?;
        let operator = self
            .repo
            .create(NewOperator {
                username: request.username,
                password_hash,
                role: Some(role),
            })
            .await?;

        tracing::info!("Registered operator {} as {}", operator.username, role.as_str());
        Ok(operator)
    }

    pub async fn login(&self, username: &str, password: &str) -> Result<(Operator, String)> {
        let username = username.trim();
        let invalid = || AppError::Unauthorized("Invalid credentials".to_string());

        let hash = self.repo.get_password_hash(username).await?.ok_or_else(invalid)?;
        if !AuthService::verify_password(password, &hash).await? {
            return Err(invalid());
        }

        let operator = self.repo.find_by_username(username).await?.ok_or_else(invalid)?;
        let token = self.tokens.issue_operator(&operator)?;
        Ok((operator, token))
    }

    pub async fn get(&self, id: i64) -> Result<Operator> {
        self.repo
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::NotFound("Operator not found".to_string()))
    }

    fn admin_key_matches(&self, supplied: Option<&str>) -> bool {
        match (self.admin_create_key.as_deref(), supplied) {
            (Some(expected), Some(supplied)) => {
                bool::from(expected.as_bytes().ct_eq(supplied.as_bytes()))
            }
            _ => false,
        }
    }
}
