use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use serde::Deserialize;

use crate::{
    api::{extract::JsonBody, state::AppState},
    domain::{Course, CourseInput},
    error::Result,
};

#[derive(Debug, Deserialize)]
pub struct RelatedParams {
    limit: Option<i64>,
}

pub async fn list(State(state): State<AppState>) -> Result<Json<Vec<Course>>> {
    let courses = state.service_context.course_service.list().await?;
    Ok(Json(courses))
}

pub async fn get(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<Course>> {
    let course = state.service_context.course_service.get(id).await?;
    Ok(Json(course))
}

pub async fn get_by_slug(
    State(state): State<AppState>,
    Path(slug): Path<String>,
) -> Result<Json<Course>> {
    let course = state.service_context.course_service.get_by_slug(&slug).await?;
    Ok(Json(course))
}

pub async fn related(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Query(params): Query<RelatedParams>,
) -> Result<Json<Vec<Course>>> {
    let courses = state.service_context.course_service.related(id, params.limit).await?;
    Ok(Json(courses))
}

pub async fn create(
    State(state): State<AppState>,
    JsonBody(input): JsonBody<CourseInput>,
) -> Result<(StatusCode, Json<Course>)> {
    let course = state.service_context.course_service.create(input).await?;
    Ok((StatusCode::CREATED, Json(course)))
}

pub async fn update(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    JsonBody(input): JsonBody<CourseInput>,
) -> Result<Json<Course>> {
    let course = state.service_context.course_service.update(id, input).await?;
    Ok(Json(course))
}

pub async fn delete(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<StatusCode> {
    state.service_context.course_service.delete(id).await?;
    Ok(StatusCode::NO_CONTENT)
}
