//! Request extractors that reject with [`ApiError`] bodies.
//!
//! axum's own `Json`, `Path` and `Query` answer malformed input with plain
//! text. These wrappers keep the `{ code, message }` shape for every failure.

use axum::extract::{FromRequest, FromRequestParts};

use crate::error::ApiError;

/// JSON request body.
#[derive(Debug, FromRequest)]
#[from_request(via(axum::Json), rejection(ApiError))]
pub struct ApiJson<T>(pub T);

/// Path parameters.
#[derive(Debug, FromRequestParts)]
#[from_request(via(axum::extract::Path), rejection(ApiError))]
pub struct ApiPath<T>(pub T);

/// Query string.
#[derive(Debug, FromRequestParts)]
#[from_request(via(axum::extract::Query), rejection(ApiError))]
pub struct ApiQuery<T>(pub T);
