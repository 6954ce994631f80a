//! Liveness and readiness probes.

use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use serde_json::{json, Value};

use crate::state::AppState;

/// Liveness: the process is up.
pub async fn health() -> Json<Value> {
    Json(json!({ "status": "OK", "message": "API Running" }))
}

/// Readiness: the database answers and every embedded migration is applied.
pub async fn ready(State(state): State<AppState>) -> (StatusCode, Json<Value>) {
    if !state.db.health_check().await {
        tracing::warn!("Readiness check failed: database unreachable");
        return (
            StatusCode::SERVICE_UNAVAILABLE,
            Json(json!({ "status": "UNAVAILABLE", "database": "unreachable" })),
        );
    }

    match kasir_db::migrations::migration_status(state.db.pool()).await {
        Ok((total, applied)) if applied >= total => (
            StatusCode::OK,
            Json(json!({ "status": "OK", "database": "ok", "migrations": applied })),
        ),
        Ok((total, applied)) => {
            tracing::warn!(total, applied, "Readiness check failed: pending migrations");
            (
                StatusCode::SERVICE_UNAVAILABLE,
                Json(json!({ "status": "UNAVAILABLE", "database": "pending migrations" })),
            )
        }
        Err(e) => {
            tracing::warn!(error = %e, "Readiness check failed: migration status");
            (
                StatusCode::SERVICE_UNAVAILABLE,
                Json(json!({ "status": "UNAVAILABLE", "database": "error" })),
            )
        }
    }
}

#[cfg(test)]
mod tests {
    use axum::http::{Method, StatusCode};

    use crate::testing::{app, call};

    #[tokio::test]
    async fn test_health() {
        let (app, _db) = app().await;
        let (status, body) = call(&app, Method::GET, "/health", None).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["status"], "OK");
        assert_eq!(body["message"], "API Running");
    }

    #[tokio::test]
    async fn test_ready_then_unavailable_after_close() {
        let (app, db) = app().await;

        let (status, body) = call(&app, Method::GET, "/health/ready", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["database"], "ok");

        db.close().await;
        let (status, _) = call(&app, Method::GET, "/health/ready", None).await;
        assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
    }
}
