use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use serde_json::{json, Value};

use crate::{
    api::{extract::JsonBody, state::AppState},
    domain::{BulkDeleteRequest, CreateApplicationRequest, JobApplication},
    error::Result,
};

pub async fn submit(
    State(state): State<AppState>,
    JsonBody(request): JsonBody<CreateApplicationRequest>,
) -> Result<(StatusCode, Json<JobApplication>)> {
    let application = state.service_context.application_service.submit(request).await?;
    Ok((StatusCode::CREATED, Json(application)))
}

pub async fn list(State(state): State<AppState>) -> Result<Json<Vec<JobApplication>>> {
    let applications = state.service_context.application_service.list().await?;
    Ok(Json(applications))
}

pub async fn get(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<JobApplication>> {
    let application = state.service_context.application_service.get(id).await?;
    Ok(Json(application))
}

pub async fn delete(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<StatusCode> {
    state.service_context.application_service.delete(id).await?;
    Ok(StatusCode::NO_CONTENT)
}

pub async fn bulk_delete(
    State(state): State<AppState>,
    JsonBody(request): JsonBody<BulkDeleteRequest>,
) -> Result<Json<Value>> {
    let deleted = state
        .service_context
        .application_service
        .delete_many(&request.ids)
        .await?;

    Ok(Json(json!({ "deleted": deleted })))
}
