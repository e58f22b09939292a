use axum::{
    extract::{Request, State},
    http::{header, HeaderMap},
    middleware::Next,
    response::Response,
};

use crate::{
    api::state::AppState,
    auth::{authorize, Capability},
    domain::Operator,
    error::AppError,
};

#[derive(Clone)]
pub struct CurrentOperator {
    pub operator: Operator,
}

#[derive(Clone)]
pub struct CurrentStudent {
    pub student_id: i64,
    pub email: String,
}

fn bearer_token(headers: &HeaderMap) -> Result<String, AppError> {
    headers
        .get(header::AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.strip_prefix("Bearer "))
        .map(str::trim)
        .filter(|token| !token.is_empty())
        .map(str::to_string)
        .ok_or_else(|| AppError::Unauthorized("Authorization token required".to_string()))
}

/// Resolve the operator from the bearer token. The row is reloaded so role
/// changes apply without waiting for the token to expire.
pub async fn require_operator(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Result<Response, AppError> {
    let token = bearer_token(request.headers())?;
    let claims = state.service_context.token_service.verify_operator(&token)?;

    let operator = state
        .service_context
        .operator_repo
        .find_by_id(claims.sub)
        .await?
        .ok_or_else(|| AppError::Unauthorized("Operator not found".to_string()))?;

    request.extensions_mut().insert(CurrentOperator { operator });

    Ok(next.run(request).await)
}

/// Must run inside `require_operator`.
pub async fn require_capability(
    State(capability): State<Capability>,
    request: Request,
    next: Next,
) -> Result<Response, AppError> {
    let current = request
        .extensions()
        .get::<CurrentOperator>()
        .ok_or_else(|| AppError::Unauthorized("Authorization token required".to_string()))?;

    if let Err(e) = authorize(current.operator.role, capability.required_roles()) {
        tracing::warn!(
            "Operator {} denied {:?}",
            current.operator.username,
            capability
        );
        return Err(e);
    }

    Ok(next.run(request).await)
}

pub async fn require_student(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Result<Response, AppError> {
    let token = bearer_token(request.headers())?;
    let claims = state.service_context.token_service.verify_student(&token)?;

    request.extensions_mut().insert(CurrentStudent {
        student_id: claims.sub,
        email: claims.email,
    });

    Ok(next.run(request).await)
}
