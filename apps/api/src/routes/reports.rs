//! Sales report handlers.

use axum::extract::State;
use axum::Json;
use chrono::NaiveDate;
use serde::Deserialize;

use kasir_core::validation::{parse_report_date, validate_date_range};
use kasir_core::SalesReport;

use crate::error::ApiError;
use crate::extract::ApiQuery;
use crate::state::AppState;

#[derive(Debug, Default, Deserialize)]
pub struct RangeParams {
    pub start_date: Option<String>,
    pub end_date: Option<String>,
}

/// Report for the current UTC day.
pub async fn today(State(state): State<AppState>) -> Result<Json<SalesReport>, ApiError> {
    Ok(Json(state.db.reports().today().await?))
}

/// Report for `start_date..=end_date` (`YYYY-MM-DD`).
///
/// Falls back to today's report unless both dates are given.
pub async fn range(
    State(state): State<AppState>,
    ApiQuery(params): ApiQuery<RangeParams>,
) -> Result<Json<SalesReport>, ApiError> {
    let (Some(start), Some(end)) = (params.start_date.as_deref(), params.end_date.as_deref())
    else {
        return today(State(state)).await;
    };

    let start: NaiveDate = parse_report_date("start_date", start)?;
    let end: NaiveDate = parse_report_date("end_date", end)?;
    validate_date_range(start, end)?;

    Ok(Json(state.db.reports().summary(start, end).await?))
}
