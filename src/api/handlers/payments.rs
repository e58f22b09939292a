use axum::{
    extract::{Extension, State},
    http::StatusCode,
    Json,
};

use crate::{
    api::{extract::JsonBody, middleware::auth::CurrentStudent, state::AppState},
    domain::{ConfirmPaymentRequest, CreatePaymentRequest, Payment},
    error::Result,
    service::{ConfirmedPayment, PaymentIntent, PaymentSummary},
};

pub async fn create(
    State(state): State<AppState>,
    Extension(current): Extension<CurrentStudent>,
    JsonBody(request): JsonBody<CreatePaymentRequest>,
) -> Result<(StatusCode, Json<PaymentIntent>)> {
    let intent = state
        .service_context
        .enrollment_service
        .create_payment(current.student_id, request)
        .await?;

    Ok((StatusCode::CREATED, Json(intent)))
}

pub async fn confirm(
    State(state): State<AppState>,
    Extension(current): Extension<CurrentStudent>,
    JsonBody(request): JsonBody<ConfirmPaymentRequest>,
) -> Result<Json<ConfirmedPayment>> {
    let confirmed = state
        .service_context
        .enrollment_service
        .confirm_payment(current.student_id, request)
        .await?;

    Ok(Json(confirmed))
}

pub async fn mine(
    State(state): State<AppState>,
    Extension(current): Extension<CurrentStudent>,
) -> Result<Json<Vec<Payment>>> {
    let payments = state
        .service_context
        .enrollment_service
        .payments_for_student(current.student_id)
        .await?;

    Ok(Json(payments))
}

pub async fn list_all(State(state): State<AppState>) -> Result<Json<Vec<PaymentSummary>>> {
    let payments = state.service_context.enrollment_service.recent_payments().await?;
    Ok(Json(payments))
}
