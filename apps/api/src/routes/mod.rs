//! # HTTP Routes
//!
//! | Method | Path                    | Handler                  |
//! |--------|-------------------------|--------------------------|
//! | GET    | `/health`               | [`health::health`]       |
//! | GET    | `/health/ready`         | [`health::ready`]        |
//! | GET    | `/api/produk`           | [`products::list`]       |
//! | POST   | `/api/produk`           | [`products::create`]     |
//! | GET    | `/api/produk/{id}`      | [`products::get`]        |
//! | PUT    | `/api/produk/{id}`      | [`products::update`]     |
//! | DELETE | `/api/produk/{id}`      | [`products::delete`]     |
//! | GET    | `/api/categories`       | [`categories::list`]     |
//! | POST   | `/api/categories`       | [`categories::create`]   |
//! | GET    | `/api/categories/{id}`  | [`categories::get`]      |
//! | PUT    | `/api/categories/{id}`  | [`categories::update`]   |
//! | DELETE | `/api/categories/{id}`  | [`categories::delete`]   |
//! | POST   | `/api/checkout`         | [`checkout::checkout`]   |
//! | GET    | `/api/orders/{id}`      | [`orders::get`]          |
//! | GET    | `/api/report/hari-ini`  | [`reports::today`]       |
//! | GET    | `/api/report`           | [`reports::range`]       |

pub mod categories;
pub mod checkout;
pub mod health;
pub mod orders;
pub mod products;
pub mod reports;

use axum::routing::{get, post};
use axum::Router;

use crate::state::AppState;

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/health", get(health::health))
        .route("/health/ready", get(health::ready))
        .route("/api/produk", get(products::list).post(products::create))
        .route(
            "/api/produk/{id}",
            get(products::get)
                .put(products::update)
                .delete(products::delete),
        )
        .route(
            "/api/categories",
            get(categories::list).post(categories::create),
        )
        .route(
            "/api/categories/{id}",
            get(categories::get)
                .put(categories::update)
                .delete(categories::delete),
        )
        .route("/api/checkout", post(checkout::checkout))
        .route("/api/orders/{id}", get(orders::get))
        .route("/api/report/hari-ini", get(reports::today))
        .route("/api/report", get(reports::range))
}
