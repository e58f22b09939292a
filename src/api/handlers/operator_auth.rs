use axum::{
    extract::{Extension, State},
    http::StatusCode,
    Json,
};
use serde::Serialize;

use crate::{
    api::{extract::JsonBody, middleware::auth::CurrentOperator, state::AppState},
    domain::{Operator, OperatorLoginRequest, RegisterOperatorRequest},
    error::Result,
};

#[derive(Debug, Serialize)]
pub struct OperatorLoginResponse {
    pub token: String,
    pub operator: Operator,
}

pub async fn register(
    State(state): State<AppState>,
    JsonBody(request): JsonBody<RegisterOperatorRequest>,
) -> Result<(StatusCode, Json<Operator>)> {
    let operator = state.service_context.operator_service.register(request).await?;
    Ok((StatusCode::CREATED, Json(operator)))
}

pub async fn login(
    State(state): State<AppState>,
    JsonBody(request): JsonBody<OperatorLoginRequest>,
) -> Result<Json<OperatorLoginResponse>> {
    let (operator, token) = state
        .service_context
        .operator_service
        .login(&request.username, &request.password)
        .await?;

    Ok(Json(OperatorLoginResponse { token, operator }))
}

pub async fn me(Extension(current): Extension<CurrentOperator>) -> Json<Operator> {
    Json(current.operator)
}
