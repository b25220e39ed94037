//! # Application Error Type
//!
//! Unified error type for UI-facing operations.
//!
//! ## Error Handling Strategy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Error Flow in Gemstock                               │
//! │                                                                         │
//! │  UI                          AppContext                                 │
//! │  ──                          ──────────                                 │
//! │                                                                         │
//! │  ctx.mark_sold(id, sale)                                                │
//! │         │                                                               │
//! │         ▼                                                               │
//! │  ┌──────────────────────────────────────────────────────────────────┐  │
//! │  │  Unknown id? ─────── CoreError::ProductNotFound ──┐              │  │
//! │  │  Already sold? ───── CoreError::InvalidTransition ┤              │  │
//! │  │  Bad form input? ─── CoreError::Validation ───────┼─► AppError ─►│  │
//! │  │  Store down? ─────── DbError ─────────────────────┘              │  │
//! │  │                                                                  │  │
//! │  │  Saved? ── push ── SyncError ──► SyncNotice (never an AppError)  │  │
//! │  └──────────────────────────────────────────────────────────────────┘  │
//! │                                                                         │
//! │  Err(e) → e.code = "NOT_FOUND", e.message = "Product not found: …"     │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use serde::Serialize;
use thiserror::Error;
use ts_rs::TS;

use gemstock_core::CoreError;
use gemstock_db::DbError;
use gemstock_sync::SyncError;

/// Result type alias for application operations.
pub type AppResult<T> = Result<T, AppError>;

/// Error returned from a UI-facing operation.
///
/// ## Serialization
/// ```json
/// {
///   "code": "NOT_FOUND",
///   "message": "Product not found: m1x2k3"
/// }
/// ```
#[derive(Debug, Clone, Serialize, Error, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
#[error("[{code:?}] {message}")]
pub struct AppError {
    /// Machine-readable error code for programmatic handling
    pub code: ErrorCode,

    /// Human-readable error message for display
    pub message: String,
}

/// Error codes for the UI.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, TS)]
#[ts(export)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    /// No product with that id
    NotFound,

    /// Form input failed validation
    ValidationError,

    /// Status change not allowed from the current status
    InvalidTransition,

    /// Import file rejected
    ImportRejected,

    /// Local Store failure
    DatabaseError,

    /// Sync settings could not be applied
    SyncError,

    /// Configuration problem
    ConfigError,

    /// Anything else
    Internal,
}

impl AppError {
    /// Creates a new error.
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        AppError {
            code,
            message: message.into(),
        }
    }

    /// Creates a not found error.
    pub fn not_found(resource: &str, id: &str) -> Self {
        AppError::new(ErrorCode::NotFound, format!("{} not found: {}", resource, id))
    }

    /// Creates an internal error.
    pub fn internal(message: impl Into<String>) -> Self {
        AppError::new(ErrorCode::Internal, message)
    }
}

impl From<CoreError> for AppError {
    fn from(err: CoreError) -> Self {
        match err {
            CoreError::ProductNotFound(id) => AppError::not_found("Product", &id),
            e @ CoreError::InvalidTransition { .. } => {
                AppError::new(ErrorCode::InvalidTransition, e.to_string())
            }
            CoreError::Validation(e) => AppError::new(ErrorCode::ValidationError, e.to_string()),
            CoreError::Import(e) => AppError::new(ErrorCode::ImportRejected, e.to_string()),
        }
    }
}

impl From<DbError> for AppError {
    fn from(err: DbError) -> Self {
        match err {
            DbError::ConnectionFailed(_) => {
                AppError::new(ErrorCode::DatabaseError, "Database connection failed")
            }
            DbError::MigrationFailed(_) => {
                AppError::new(ErrorCode::DatabaseError, "Database migration failed")
            }
            DbError::PoolExhausted => {
                AppError::new(ErrorCode::DatabaseError, "Database pool exhausted")
            }
            other => {
                // Detail goes to the log, not the UI
                tracing::error!(error = %other, "Local Store operation failed");
                AppError::new(ErrorCode::DatabaseError, "Saving data failed")
            }
        }
    }
}

impl From<SyncError> for AppError {
    fn from(err: SyncError) -> Self {
        match err {
            SyncError::Storage(db) => db.into(),
            e if e.is_config_error() => AppError::new(ErrorCode::ConfigError, e.to_string()),
            e => AppError::new(ErrorCode::SyncError, e.user_message()),
        }
    }
}

impl From<serde_json::Error> for AppError {
    fn from(err: serde_json::Error) -> Self {
        AppError::internal(format!("Serialization failed: {}", err))
    }
}
