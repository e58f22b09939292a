use axum::{
    extract::{Extension, Query, State},
    http::StatusCode,
    Json,
};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

use crate::{
    api::{extract::JsonBody, middleware::auth::CurrentStudent, state::AppState},
    domain::{RegisterStudentRequest, ResendVerificationRequest, Student, StudentLoginRequest},
    error::Result,
};

#[derive(Debug, Serialize)]
pub struct StudentLoginResponse {
    pub token: String,
    pub student: Student,
}

#[derive(Debug, Deserialize)]
pub struct VerifyParams {
    #[serde(default)]
    token: String,
}

pub async fn register(
    State(state): State<AppState>,
    JsonBody(request): JsonBody<RegisterStudentRequest>,
) -> Result<(StatusCode, Json<Value>)> {
    let student = state.service_context.student_service.register(request).await?;

    Ok((
        StatusCode::CREATED,
        Json(json!({
            "message": "Registration successful. Please check your email to verify your account.",
            "student": student,
        })),
    ))
}

pub async fn login(
    State(state): State<AppState>,
    JsonBody(request): JsonBody<StudentLoginRequest>,
) -> Result<Json<StudentLoginResponse>> {
    let (student, token) = state
        .service_context
        .student_service
        .login(&request.email, &request.password)
        .await?;

    Ok(Json(StudentLoginResponse { token, student }))
}

pub async fn verify(
    State(state): State<AppState>,
    Query(params): Query<VerifyParams>,
) -> Result<Json<Value>> {
    let student = state.service_context.student_service.verify(&params.token).await?;

    Ok(Json(json!({
        "message": "Email verified. You can now log in.",
        "student": student,
    })))
}

pub async fn resend_verification(
    State(state): State<AppState>,
    JsonBody(request): JsonBody<ResendVerificationRequest>,
) -> Result<Json<Value>> {
    state
        .service_context
        .student_service
        .resend_verification(&request.email)
        .await?;

    Ok(Json(json!({ "message": "Verification email sent" })))
}

pub async fn me(
    State(state): State<AppState>,
    Extension(current): Extension<CurrentStudent>,
) -> Result<Json<Student>> {
    let student = state.service_context.student_service.get(current.student_id).await?;
    Ok(Json(student))
}
