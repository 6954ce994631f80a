//! # Pool and Database Handle
//!
//! [`DbConfig`] describes how to open the store; [`Database`] owns the pool
//! and hands out repositories and the checkout service.
//!
//! ## Concurrent Checkouts
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  SqlitePool (WAL)                                                      │
//! │                                                                         │
//! │  GET  /api/produk   ──► conn A  reads a snapshot, never waits          │
//! │  POST /api/checkout ──► conn B  first UPDATE takes the write lock      │
//! │  POST /api/checkout ──► conn C  first UPDATE waits up to busy_timeout  │
//! │                                  then re-reads stock committed by B     │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! A checkout that waits longer than `busy_timeout` fails with a storage
//! error and commits nothing.

use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions, SqliteSynchronous};
use sqlx::SqlitePool;
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;
use tracing::info;

use kasir_core::StockPolicy;

use crate::checkout::CheckoutService;
use crate::error::{DbError, DbResult};
use crate::migrations;
use crate::repository::category::CategoryRepository;
use crate::repository::order::OrderRepository;
use crate::repository::product::ProductRepository;
use crate::repository::report::ReportRepository;

const IN_MEMORY_PATH: &str = ":memory:";

// =============================================================================
// Configuration
// =============================================================================

/// How to open the store.
///
/// ```rust,ignore
/// let config = DbConfig::new("./kasir.db")
///     .max_connections(5)
///     .busy_timeout(Duration::from_secs(5));
/// ```
#[derive(Debug, Clone)]
pub struct DbConfig {
    /// SQLite file, created on first use, or `:memory:`.
    pub database_path: PathBuf,

    pub max_connections: u32,
    pub min_connections: u32,

    /// Wait for a free pooled connection.
    pub connect_timeout: Duration,

    /// Wait for another connection's write lock.
    pub busy_timeout: Duration,

    /// Close pooled connections idle for this long. Ignored in memory.
    pub idle_timeout: Duration,

    /// Apply embedded migrations in [`Database::new`].
    pub run_migrations: bool,
}

impl DbConfig {
    /// File-backed store with pool defaults: 5 connections, 5 s busy timeout.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        DbConfig {
            database_path: path.into(),
            max_connections: 5,
            min_connections: 1,
            connect_timeout: Duration::from_secs(30),
            busy_timeout: Duration::from_secs(5),
            idle_timeout: Duration::from_secs(600),
            run_migrations: true,
        }
    }

    pub fn max_connections(mut self, max: u32) -> Self {
        self.max_connections = max;
        self
    }

    pub fn min_connections(mut self, min: u32) -> Self {
        self.min_connections = min;
        self
    }

    pub fn connect_timeout(mut self, timeout: Duration) -> Self {
        self.connect_timeout = timeout;
        self
    }

    /// Sets the SQLite busy timeout.
    pub fn busy_timeout(mut self, timeout: Duration) -> Self {
        self.busy_timeout = timeout;
        self
    }

    pub fn run_migrations(mut self, run: bool) -> Self {
        self.run_migrations = run;
        self
    }

    /// Private in-memory store, used by tests.
    ///
    /// The pool holds exactly one connection: a second connection would open
    /// a second, empty database.
    pub fn in_memory() -> Self {
        DbConfig {
            database_path: PathBuf::from(IN_MEMORY_PATH),
            max_connections: 1,
            min_connections: 1,
            connect_timeout: Duration::from_secs(5),
            busy_timeout: Duration::from_secs(5),
            idle_timeout: Duration::from_secs(60),
            run_migrations: true,
        }
    }

    /// True when the database lives only in the pool's connection.
    pub fn is_in_memory(&self) -> bool {
        self.database_path.as_os_str() == IN_MEMORY_PATH
    }

    fn connect_options(&self) -> DbResult<SqliteConnectOptions> {
        let options = if self.is_in_memory() {
            SqliteConnectOptions::from_str("sqlite::memory:")
                .map_err(|e| DbError::ConnectionFailed(e.to_string()))?
        } else {
            SqliteConnectOptions::new()
                .filename(&self.database_path)
                .create_if_missing(true)
                .journal_mode(SqliteJournalMode::Wal)
                // Safe with WAL; the last commit may be lost on power failure.
                .synchronous(SqliteSynchronous::Normal)
        };

        Ok(options
            .foreign_keys(true)
            .busy_timeout(self.busy_timeout))
    }
}

// =============================================================================
// Database
// =============================================================================

/// Handle to the store. Clones share one pool.
///
/// ```rust,ignore
/// let db = Database::new(DbConfig::new("./kasir.db")).await?;
/// let kopi = db.products().list(Some("kopi")).await?;
/// let order = db.checkout(StockPolicy::Reject).checkout(&lines).await?;
/// ```
#[derive(Debug, Clone)]
pub struct Database {
    pool: SqlitePool,
}

impl Database {
    /// Opens the pool and, unless disabled, applies pending migrations.
    pub async fn new(config: DbConfig) -> DbResult<Self> {
        let connect_options = config.connect_options()?;

        let pool_options = SqlitePoolOptions::new()
            .max_connections(config.max_connections)
            .min_connections(config.min_connections)
            .acquire_timeout(config.connect_timeout);

        // An in-memory database disappears with its last connection.
        let pool_options = if config.is_in_memory() {
            pool_options.idle_timeout(None).max_lifetime(None)
        } else {
            pool_options.idle_timeout(Some(config.idle_timeout))
        };

        let pool = pool_options
            .connect_with(connect_options)
            .await
            .map_err(|e| DbError::ConnectionFailed(e.to_string()))?;

        info!(
            path = %config.database_path.display(),
            max_connections = config.max_connections,
            busy_timeout_ms = config.busy_timeout.as_millis() as u64,
            "Database opened"
        );

        let db = Database { pool };

        if config.run_migrations {
            db.run_migrations().await?;
        }

        Ok(db)
    }

    pub async fn run_migrations(&self) -> DbResult<()> {
        migrations::run_migrations(&self.pool).await
    }

    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    pub fn products(&self) -> ProductRepository {
        ProductRepository::new(self.pool.clone())
    }

    pub fn categories(&self) -> CategoryRepository {
        CategoryRepository::new(self.pool.clone())
    }

    pub fn orders(&self) -> OrderRepository {
        OrderRepository::new(self.pool.clone())
    }

    pub fn reports(&self) -> ReportRepository {
        ReportRepository::new(self.pool.clone())
    }

    /// Returns a checkout service bound to this pool.
    pub fn checkout(&self, policy: StockPolicy) -> CheckoutService {
        CheckoutService::new(self.pool.clone(), policy)
    }

    /// Waits for checked-out connections to return, then closes the pool.
    /// Later queries fail with [`DbError::ConnectionFailed`].
    pub async fn close(&self) {
        info!("Closing database connection pool");
        self.pool.close().await;
    }

    /// True when a trivial query succeeds.
    pub async fn health_check(&self) -> bool {
        sqlx::query("SELECT 1")
            .execute(&self.pool)
            .await
            .is_ok()
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_in_memory_database() {
        let config = DbConfig::in_memory();
        assert!(config.is_in_memory());

        let db = Database::new(config).await.unwrap();
        assert!(db.health_check().await);

        let (total, applied) = migrations::migration_status(db.pool()).await.unwrap();
        assert_eq!(total, applied);
    }

    #[tokio::test]
    async fn test_config_builder() {
        let config = DbConfig::new("/tmp/test.db")
            .max_connections(10)
            .min_connections(2)
            .busy_timeout(Duration::from_millis(250));

        assert_eq!(config.max_connections, 10);
        assert_eq!(config.min_connections, 2);
        assert_eq!(config.busy_timeout, Duration::from_millis(250));
        assert!(!config.is_in_memory());
    }

    #[tokio::test]
    async fn test_health_check_fails_after_close() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        db.close().await;
        assert!(!db.health_check().await);
    }
}
