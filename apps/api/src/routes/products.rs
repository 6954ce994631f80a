//! Product catalogue handlers.

use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use serde::Deserialize;

use kasir_core::validation::{validate_new_product, validate_search_query};
use kasir_core::{NewProduct, Product};

use crate::error::ApiError;
use crate::extract::{ApiJson, ApiPath, ApiQuery};
use crate::state::AppState;

#[derive(Debug, Default, Deserialize)]
pub struct ListParams {
    /// Case-insensitive substring of the product name.
    pub name: Option<String>,
}

pub async fn list(
    State(state): State<AppState>,
    ApiQuery(params): ApiQuery<ListParams>,
) -> Result<Json<Vec<Product>>, ApiError> {
    let filter = validate_search_query(params.name.as_deref())?;
    let products = state.db.products().list(filter.as_deref()).await?;
    Ok(Json(products))
}

pub async fn create(
    State(state): State<AppState>,
    ApiJson(product): ApiJson<NewProduct>,
) -> Result<(StatusCode, Json<Product>), ApiError> {
    validate_new_product(&product)?;
    let product = state.db.products().insert(&product).await?;
    tracing::info!(product_id = product.id, name = %product.name, "Product created");
    Ok((StatusCode::CREATED, Json(product)))
}

pub async fn get(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<i64>,
) -> Result<Json<Product>, ApiError> {
    state
        .db
        .products()
        .get_by_id(id)
        .await?
        .map(Json)
        .ok_or_else(|| ApiError::not_found("Product", id))
}

pub async fn update(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<i64>,
    ApiJson(product): ApiJson<NewProduct>,
) -> Result<Json<Product>, ApiError> {
    validate_new_product(&product)?;
    let product = state.db.products().update(id, &product).await?;
    Ok(Json(product))
}

pub async fn delete(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<i64>,
) -> Result<StatusCode, ApiError> {
    state.db.products().delete(id).await?;
    tracing::info!(product_id = id, "Product deleted");
    Ok(StatusCode::NO_CONTENT)
}
