//! Category handlers.

use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;

use kasir_core::validation::validate_new_category;
use kasir_core::{Category, NewCategory};

use crate::error::ApiError;
use crate::extract::{ApiJson, ApiPath};
use crate::state::AppState;

pub async fn list(State(state): State<AppState>) -> Result<Json<Vec<Category>>, ApiError> {
    Ok(Json(state.db.categories().list().await?))
}

pub async fn create(
    State(state): State<AppState>,
    ApiJson(category): ApiJson<NewCategory>,
) -> Result<(StatusCode, Json<Category>), ApiError> {
    validate_new_category(&category)?;
    let category = state.db.categories().insert(&category).await?;
    Ok((StatusCode::CREATED, Json(category)))
}

pub async fn get(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<i64>,
) -> Result<Json<Category>, ApiError> {
    state
        .db
        .categories()
        .get_by_id(id)
        .await?
        .map(Json)
        .ok_or_else(|| ApiError::not_found("Category", id))
}

pub async fn update(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<i64>,
    ApiJson(category): ApiJson<NewCategory>,
) -> Result<Json<Category>, ApiError> {
    validate_new_category(&category)?;
    Ok(Json(state.db.categories().update(id, &category).await?))
}

/// Products in the category keep existing with no category.
pub async fn delete(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<i64>,
) -> Result<StatusCode, ApiError> {
    state.db.categories().delete(id).await?;
    Ok(StatusCode::NO_CONTENT)
}
