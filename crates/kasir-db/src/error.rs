//! # Database Error Types
//!
//! Error types for database operations and the checkout transaction.
//!
//! ## Error Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Error Propagation                                    │
//! │                                                                         │
//! │  SQLite Error (sqlx::Error)                                            │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  DbError (this module) ← Adds context and categorization               │
//! │       │                                                                 │
//! │       │        CoreError (kasir-core) ← rule violations                │
//! │       │             │                                                   │
//! │       ▼             ▼                                                   │
//! │  CheckoutError { Storage(DbError) | Rejected(CoreError) }              │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  ApiError (in HTTP app) ← Serialized for the client                    │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use kasir_core::CoreError;
use thiserror::Error;

/// Database operation errors.
///
/// These errors wrap sqlx errors and provide additional context
/// for debugging and user feedback.
#[derive(Debug, Error)]
pub enum DbError {
    /// Entity not found in database.
    ///
    /// ## When This Occurs
    /// - `fetch_one` returns no rows
    /// - UPDATE/DELETE by id touched zero rows
    #[error("{entity} not found: {id}")]
    NotFound { entity: String, id: String },

    /// Unique constraint violation.
    ///
    /// ## When This Occurs
    /// - Duplicate (order_id, position) pair in order_lines
    /// - Any UNIQUE index violation
    #[error("Duplicate {field}: '{value}' already exists")]
    UniqueViolation { field: String, value: String },

    /// Foreign key constraint violation.
    ///
    /// ## When This Occurs
    /// - Product references a category that does not exist
    /// - Order line references an order that does not exist
    #[error("Foreign key violation: {message}")]
    ForeignKeyViolation { message: String },

    /// Database connection failed.
    ///
    /// ## When This Occurs
    /// - Database file doesn't exist and can't be created
    /// - File permissions issue
    /// - Disk full
    #[error("Connection failed: {0}")]
    ConnectionFailed(String),

    /// Migration failed.
    #[error("Migration failed: {0}")]
    MigrationFailed(String),

    /// Query execution failed.
    ///
    /// ## When This Occurs
    /// - Runtime SQL error, including CHECK constraint failures
    /// - `database is locked` after the busy timeout elapsed
    #[error("Query failed: {0}")]
    QueryFailed(String),

    /// Transaction could not be started or committed.
    #[error("Transaction failed: {0}")]
    TransactionFailed(String),

    /// Pool exhausted (all connections in use).
    #[error("Connection pool exhausted")]
    PoolExhausted,

    /// Internal database error.
    #[error("Internal database error: {0}")]
    Internal(String),
}

impl DbError {
    /// Creates a NotFound error for a given entity type and ID.
    pub fn not_found(entity: impl Into<String>, id: impl ToString) -> Self {
        DbError::NotFound {
            entity: entity.into(),
            id: id.to_string(),
        }
    }

    /// Wraps a failed BEGIN or COMMIT.
    pub fn transaction(err: sqlx::Error) -> Self {
        match DbError::from(err) {
            DbError::PoolExhausted => DbError::PoolExhausted,
            other => DbError::TransactionFailed(other.to_string()),
        }
    }
}

/// Convert sqlx errors to DbError.
///
/// ## Error Mapping
/// ```text
/// sqlx::Error::RowNotFound    → DbError::NotFound
/// sqlx::Error::Database       → Analyze message for constraint type
/// sqlx::Error::PoolTimedOut   → DbError::PoolExhausted
/// Other                       → DbError::Internal
/// ```
impl From<sqlx::Error> for DbError {
    fn from(err: sqlx::Error) -> Self {
        match err {
            sqlx::Error::RowNotFound => DbError::NotFound {
                entity: "Record".to_string(),
                id: "unknown".to_string(),
            },

            sqlx::Error::Database(db_err) => {
                let msg = db_err.message();

                // UNIQUE constraint: "UNIQUE constraint failed: <table>.<column>"
                // FK constraint: "FOREIGN KEY constraint failed"
                if let Some(field) = msg.strip_prefix("UNIQUE constraint failed: ") {
                    DbError::UniqueViolation {
                        field: field.to_string(),
                        value: "unknown".to_string(),
                    }
                } else if msg.contains("FOREIGN KEY constraint failed") {
                    DbError::ForeignKeyViolation {
                        message: msg.to_string(),
                    }
                } else {
                    DbError::QueryFailed(msg.to_string())
                }
            }

            sqlx::Error::PoolTimedOut => DbError::PoolExhausted,

            sqlx::Error::PoolClosed => DbError::ConnectionFailed("Pool is closed".to_string()),

            _ => DbError::Internal(err.to_string()),
        }
    }
}

impl From<sqlx::migrate::MigrateError> for DbError {
    fn from(err: sqlx::migrate::MigrateError) -> Self {
        DbError::MigrationFailed(err.to_string())
    }
}

/// Result type for database operations.
pub type DbResult<T> = Result<T, DbError>;

// =============================================================================
// Checkout Error
// =============================================================================

/// Why a checkout did not commit.
///
/// Either way the transaction was rolled back: no stock changed and no
/// order row exists.
#[derive(Debug, Error)]
pub enum CheckoutError {
    /// The request broke a checkout rule (unknown product, not enough stock,
    /// invalid quantity). Caused by the client.
    #[error(transparent)]
    Rejected(#[from] CoreError),

    /// The store failed while the checkout was running.
    #[error(transparent)]
    Storage(#[from] DbError),
}

impl CheckoutError {
    /// True when the client can fix the request and retry.
    pub fn is_client_error(&self) -> bool {
        matches!(self, CheckoutError::Rejected(_))
    }
}

impl From<kasir_core::ValidationError> for CheckoutError {
    fn from(err: kasir_core::ValidationError) -> Self {
        CheckoutError::Rejected(CoreError::Validation(err))
    }
}

/// Result type for checkout operations.
pub type CheckoutResult<T> = Result<T, CheckoutError>;
