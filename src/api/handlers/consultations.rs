use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};

use crate::{
    api::{extract::JsonBody, handlers::enrollments::StatusUpdate, state::AppState},
    domain::{Consultation, CreateConsultationRequest},
    error::Result,
};

pub async fn create(
    State(state): State<AppState>,
    JsonBody(request): JsonBody<CreateConsultationRequest>,
) -> Result<(StatusCode, Json<Consultation>)> {
    let consultation = state.service_context.consultation_service.create(request).await?;
    Ok((StatusCode::CREATED, Json(consultation)))
}

pub async fn list(State(state): State<AppState>) -> Result<Json<Vec<Consultation>>> {
    let consultations = state.service_context.consultation_service.list().await?;
    Ok(Json(consultations))
}

pub async fn update_status(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    JsonBody(update): JsonBody<StatusUpdate>,
) -> Result<Json<Consultation>> {
    let consultation = state
        .service_context
        .consultation_service
        .update_status(id, &update.status)
        .await?;

    Ok(Json(consultation))
}
