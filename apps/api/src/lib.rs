//! # kasir-api: HTTP Server for Kasir POS
//!
//! Thin axum layer over `kasir-db`. Handlers validate input with
//! `kasir-core`, call a repository or the checkout service, and map
//! errors through [`ApiError`].
//!
//! ## Request Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  POST /api/checkout { items: [...] }                                   │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  TraceLayer ──► ApiJson<CheckoutRequest> ──► CheckoutService::checkout │
//! │                        │                              │                 │
//! │                        ▼                              ▼                 │
//! │                 400 VALIDATION_ERROR          201 Order / ApiError     │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

pub mod config;
pub mod error;
pub mod extract;
pub mod routes;
pub mod state;

use axum::Router;
use tower_http::trace::TraceLayer;

pub use config::{ApiConfig, ConfigError};
pub use error::{ApiError, ErrorCode};
pub use state::AppState;

/// Builds the application router.
pub fn router(state: AppState) -> Router {
    routes::routes()
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
