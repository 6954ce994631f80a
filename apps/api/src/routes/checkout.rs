//! Checkout handler.

use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;

use kasir_core::{CheckoutRequest, Order};

use crate::error::ApiError;
use crate::extract::ApiJson;
use crate::state::AppState;

/// Commits the request's lines as one order.
///
/// Either every line is priced and deducted from stock and the order is
/// returned with `201`, or nothing changes and the error names the first
/// failing line's product.
pub async fn checkout(
    State(state): State<AppState>,
    ApiJson(request): ApiJson<CheckoutRequest>,
) -> Result<(StatusCode, Json<Order>), ApiError> {
    let order = state.checkout.checkout(&request.items).await?;
    Ok((StatusCode::CREATED, Json(order)))
}
