//! 明星处理器

use axum::{
    extract::{rejection::QueryRejection, Path, Query, State},
    http::StatusCode,
    response::Json,
};
use tracing::warn;

use super::{
    model::{ListQuery, NewStar, Star, StarPatch},
    service::StarService,
};
use crate::core::{
    error::CoreError,
    extract::JsonOrForm,
    response::{MessageResponse, Paginated},
};

#[derive(Clone)]
pub struct AppState {
    pub star_service: StarService,
}

pub async fn create_star(
    State(state): State<AppState>,
    JsonOrForm(payload): JsonOrForm<NewStar>,
) -> Result<(StatusCode, Json<Star>), CoreError> {
    let star = state.star_service.create(payload).await?;
    Ok((StatusCode::CREATED, Json(star)))
}

pub async fn get_star(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Star>, CoreError> {
    let star = state.star_service.get_one(&id).await?;
    Ok(Json(star))
}

pub async fn list_stars(
    State(state): State<AppState>,
    query: Result<Query<Vec<(String, String)>>, QueryRejection>,
) -> Result<Json<Paginated<Star>>, CoreError> {
    let Query(pairs) = query?;
    let query = ListQuery::from_pairs(pairs);
    let page = state.star_service.get_paginated(&query).await?;
    Ok(Json(page))
}

pub async fn update_star(
    State(state): State<AppState>,
    Path(id): Path<String>,
    JsonOrForm(patch): JsonOrForm<StarPatch>,
) -> Result<Json<MessageResponse>, CoreError> {
    let response = state.star_service.update(&id, patch).await?;
    Ok(Json(response))
}

pub async fn delete_star(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<MessageResponse>, CoreError> {
    let response = state.star_service.delete(&id).await?;
    Ok(Json(response))
}

/// 健康检查
pub async fn health_check(State(state): State<AppState>) -> (StatusCode, Json<serde_json::Value>) {
    match state.star_service.ping().await {
        Ok(()) => (
            StatusCode::OK,
            Json(serde_json::json!({
                "status": "healthy",
                "store": "connected",
                "timestamp": chrono::Utc::now().to_rfc3339()
            })),
        ),
        Err(e) => {
            warn!("Health check failed: {}", e);
            (
                StatusCode::SERVICE_UNAVAILABLE,
                Json(serde_json::json!({
                    "status": "unhealthy",
                    "store": e.to_string(),
                    "timestamp": chrono::Utc::now().to_rfc3339()
                })),
            )
        }
    }
}
