//! Shared application state.

use kasir_db::{CheckoutService, Database};

/// State handed to every handler.
///
/// Both fields are cheap handles over the same connection pool.
#[derive(Debug, Clone)]
pub struct AppState {
    pub db: Database,
    pub checkout: CheckoutService,
}

impl AppState {
    pub fn new(db: Database, checkout: CheckoutService) -> Self {
        AppState { db, checkout }
    }
}
