use std::net::SocketAddr;

use axum::{
    extract::{ConnectInfo, Path, State},
    http::{HeaderMap, StatusCode},
    Json,
};

use crate::{
    api::{extract::JsonBody, middleware::rate_limit::client_identifier, state::AppState},
    domain::{CreateFranchiseRequest, FranchiseLead, FranchiseStats, FranchiseStatusUpdate},
    error::Result,
};

pub async fn submit(
    State(state): State<AppState>,
    connect_info: Option<ConnectInfo<SocketAddr>>,
    headers: HeaderMap,
    JsonBody(request): JsonBody<CreateFranchiseRequest>,
) -> Result<(StatusCode, Json<FranchiseLead>)> {
    let client = client_identifier(&headers, connect_info.map(|ConnectInfo(addr)| addr));
    let ip = Some(client).filter(|c| c != "unknown");

    let lead = state.service_context.franchise_service.submit(request, ip).await?;
    Ok((StatusCode::CREATED, Json(lead)))
}

pub async fn list(State(state): State<AppState>) -> Result<Json<Vec<FranchiseLead>>> {
    let leads = state.service_context.franchise_service.list().await?;
    Ok(Json(leads))
}

pub async fn stats(State(state): State<AppState>) -> Result<Json<FranchiseStats>> {
    let stats = state.service_context.franchise_service.stats().await?;
    Ok(Json(stats))
}

pub async fn get(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<FranchiseLead>> {
    let lead = state.service_context.franchise_service.get(id).await?;
    Ok(Json(lead))
}

pub async fn update_status(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    JsonBody(update): JsonBody<FranchiseStatusUpdate>,
) -> Result<Json<FranchiseLead>> {
    let lead = state.service_context.franchise_service.update_status(id, update).await?;
    Ok(Json(lead))
}

pub async fn delete(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<StatusCode> {
    state.service_context.franchise_service.delete(id).await?;
    Ok(StatusCode::NO_CONTENT)
}
