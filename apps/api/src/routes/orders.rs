//! Order lookup.

use axum::extract::State;
use axum::Json;

use kasir_core::Order;

use crate::error::ApiError;
use crate::extract::ApiPath;
use crate::state::AppState;

pub async fn get(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<i64>,
) -> Result<Json<Order>, ApiError> {
    state
        .db
        .orders()
        .get_by_id(id)
        .await?
        .map(Json)
        .ok_or_else(|| ApiError::not_found("Order", id))
}
