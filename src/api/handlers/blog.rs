use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};

use crate::{
    api::{extract::JsonBody, state::AppState},
    domain::{BlogInput, BlogPost},
    error::Result,
};

pub async fn list(State(state): State<AppState>) -> Result<Json<Vec<BlogPost>>> {
    let posts = state.service_context.blog_service.list().await?;
    Ok(Json(posts))
}

pub async fn get_by_slug(
    State(state): State<AppState>,
    Path(slug): Path<String>,
) -> Result<Json<BlogPost>> {
    let post = state.service_context.blog_service.get_by_slug(&slug).await?;
    Ok(Json(post))
}

pub async fn create(
    State(state): State<AppState>,
    JsonBody(input): JsonBody<BlogInput>,
) -> Result<(StatusCode, Json<BlogPost>)> {
    let post = state.service_context.blog_service.create(input).await?;
    Ok((StatusCode::CREATED, Json(post)))
}

pub async fn update(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    JsonBody(input): JsonBody<BlogInput>,
) -> Result<Json<BlogPost>> {
    let post = state.service_context.blog_service.update(id, input).await?;
    Ok(Json(post))
}

pub async fn delete(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<StatusCode> {
    state.service_context.blog_service.delete(id).await?;
    Ok(StatusCode::NO_CONTENT)
}
