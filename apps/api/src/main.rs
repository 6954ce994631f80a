//! Kasir POS HTTP server.
//!
//! ```bash
//! PORT=8080 DB_CONN=./kasir.db cargo run -p kasir-api
//! ```

use tokio::net::TcpListener;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use kasir_api::{router, ApiConfig, AppState};
use kasir_db::Database;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config = ApiConfig::from_env()?;

    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "kasir_api=info,kasir_db=info,tower_http=debug".into());
    tracing_subscriber::registry()
        .with(env_filter)
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!(
        database = %config.database_path.display(),
        stock_policy = %config.stock_policy,
        "Starting Kasir POS API"
    );

    let db = Database::new(config.db_config()).await?;
    let state = AppState::new(db.clone(), db.checkout(config.stock_policy));

    let addr = config.socket_addr();
    let listener = TcpListener::bind(addr).await?;
    info!(%addr, "Listening");

    axum::serve(listener, router(state))
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    db.close().await;
    info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %e, "Failed to listen for Ctrl+C");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "Failed to listen for SIGTERM");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    info!("Shutdown signal received");
}
