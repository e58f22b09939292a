use axum::{
    extract::{Extension, Path, State},
    Json,
};
use serde::Deserialize;

use crate::{
    api::{extract::JsonBody, middleware::auth::CurrentStudent, state::AppState},
    domain::{Course, Enrollment},
    error::Result,
};

#[derive(Debug, Deserialize)]
pub struct StatusUpdate {
    pub status: String,
}

/// Courses the calling student is actively enrolled in.
pub async fn student_courses(
    State(state): State<AppState>,
    Extension(current): Extension<CurrentStudent>,
) -> Result<Json<Vec<Course>>> {
    let courses = state
        .service_context
        .enrollment_service
        .active_courses(current.student_id)
        .await?;

    Ok(Json(courses))
}

pub async fn list_all(State(state): State<AppState>) -> Result<Json<Vec<Enrollment>>> {
    let enrollments = state.service_context.enrollment_service.list_enrollments().await?;
    Ok(Json(enrollments))
}

pub async fn update_status(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    JsonBody(update): JsonBody<StatusUpdate>,
) -> Result<Json<Enrollment>> {
    let enrollment = state
        .service_context
        .enrollment_service
        .update_enrollment_status(id, &update.status)
        .await?;

    Ok(Json(enrollment))
}
