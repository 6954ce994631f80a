//! # Schema Migrations
//!
//! The SQL files under `migrations/sqlite/` are compiled into the binary and
//! applied on [`Database::new`](crate::Database::new) unless
//! [`DbConfig::run_migrations`](crate::DbConfig::run_migrations) turns it off.
//!
//! ```text
//! migrations/sqlite/
//! └── 001_initial_schema.sql   categories, products, orders, order_lines
//! ```
//!
//! Applied files are recorded with their checksum in `_sqlx_migrations`.
//! Editing an applied file makes the next startup fail, so schema changes
//! always go into a new `NNN_description.sql`.

use sqlx::migrate::Migrator;
use sqlx::SqlitePool;
use tracing::info;

use crate::error::DbResult;

static MIGRATOR: Migrator = sqlx::migrate!("../../migrations/sqlite");

/// Applies every embedded migration not yet recorded in the database.
pub async fn run_migrations(pool: &SqlitePool) -> DbResult<()> {
    let embedded = MIGRATOR.migrations.len();
    info!(embedded, "Applying schema migrations");

    MIGRATOR.run(pool).await?;

    info!(embedded, "Schema is up to date");
    Ok(())
}

/// `(embedded, applied)` migration counts. Readiness probes compare the two.
pub async fn migration_status(pool: &SqlitePool) -> DbResult<(usize, usize)> {
    let applied: i64 =
        sqlx::query_scalar("SELECT COUNT(*) FROM _sqlx_migrations WHERE success = 1")
            .fetch_one(pool)
            .await?;

    Ok((MIGRATOR.migrations.len(), applied.max(0) as usize))
}
