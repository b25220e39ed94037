//! # Sync Error Types
//!
//! Error types for sync operations.
//!
//! ## Error Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                       Sync Error Categories                             │
//! │                                                                         │
//! │  ┌─────────────────┐  ┌─────────────────┐  ┌─────────────────────────┐ │
//! │  │  Configuration  │  │     Remote      │  │      Corruption         │ │
//! │  │                 │  │                 │  │                         │ │
//! │  │  NotConfigured  │  │  RemoteError    │  │  CorruptRemote          │ │
//! │  │  InvalidConfig  │  │  DocumentGone   │  │  CorruptLocal           │ │
//! │  │  InvalidUrl     │  │  Transport      │  │                         │ │
//! │  └─────────────────┘  └─────────────────┘  └─────────────────────────┘ │
//! │                                                                         │
//! │  ┌─────────────────┐  ┌─────────────────┐                             │
//! │  │     Storage     │  │  Serialization  │                             │
//! │  │  (DbError)      │  │  (serde_json)   │                             │
//! │  └─────────────────┘  └─────────────────┘                             │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Propagation
//! Every sync error belongs to the attempt that produced it. None of them
//! leaves the local collection modified, and the application layer turns
//! them into transient notices rather than failing the user's operation.

use thiserror::Error;

use gemstock_db::DbError;

/// Result type alias for sync operations.
pub type SyncResult<T> = Result<T, SyncError>;

/// Sync error type covering all possible sync failures.
#[derive(Debug, Error)]
pub enum SyncError {
    // =========================================================================
    // Configuration Errors
    // =========================================================================
    /// Sync attempted without the credential / document id it needs.
    /// Never touches the network.
    #[error("Sync not configured: {0}")]
    NotConfigured(&'static str),

    /// Invalid configuration value.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// Unparseable or unsupported URL.
    #[error("Invalid URL: {0}")]
    InvalidUrl(String),

    /// Failed to load config file.
    #[error("Failed to load config: {0}")]
    ConfigLoadFailed(String),

    // =========================================================================
    // Remote Errors
    // =========================================================================
    /// The document service answered with a non-success status.
    #[error("Remote service returned {status}: {message}")]
    RemoteError { status: u16, message: String },

    /// The stored document id no longer resolves. The id has been cleared;
    /// the next push creates a fresh document.
    #[error("Remote document {document_id} no longer exists")]
    DocumentGone { document_id: String },

    /// The request never got an HTTP answer (DNS, TLS, connection reset).
    #[error("Transport error: {0}")]
    Transport(String),

    // =========================================================================
    // Corruption
    // =========================================================================
    /// The remote document content is not a readable collection.
    #[error("Remote document is unreadable: {0}")]
    CorruptRemote(String),

    /// The local snapshot is not a readable collection.
    #[error("Local snapshot is unreadable: {0}")]
    CorruptLocal(String),

    // =========================================================================
    // Local Errors
    // =========================================================================
    /// Local Store failure.
    #[error("Storage error: {0}")]
    Storage(DbError),

    /// Failed to serialize the collection.
    #[error("Serialization failed: {0}")]
    SerializationFailed(String),
}

// =============================================================================
// Error Conversions
// =============================================================================

impl From<DbError> for SyncError {
    fn from(err: DbError) -> Self {
        match err {
            DbError::CorruptSnapshot(reason) => SyncError::CorruptLocal(reason),
            other => SyncError::Storage(other),
        }
    }
}

impl From<reqwest::Error> for SyncError {
    fn from(err: reqwest::Error) -> Self {
        match err.status() {
            Some(status) => SyncError::RemoteError {
                status: status.as_u16(),
                message: err.to_string(),
            },
            None => SyncError::Transport(err.to_string()),
        }
    }
}

impl From<serde_json::Error> for SyncError {
    fn from(err: serde_json::Error) -> Self {
        SyncError::SerializationFailed(err.to_string())
    }
}

impl From<url::ParseError> for SyncError {
    fn from(err: url::ParseError) -> Self {
        SyncError::InvalidUrl(err.to_string())
    }
}

impl From<std::io::Error> for SyncError {
    fn from(err: std::io::Error) -> Self {
        SyncError::ConfigLoadFailed(err.to_string())
    }
}

impl From<toml::de::Error> for SyncError {
    fn from(err: toml::de::Error) -> Self {
        SyncError::ConfigLoadFailed(err.to_string())
    }
}

// =============================================================================
// Error Categorization
// =============================================================================

impl SyncError {
    /// Sync is simply not set up. Skipped silently, never reported as a failure.
    pub fn is_not_configured(&self) -> bool {
        matches!(self, SyncError::NotConfigured(_))
    }


    /// Returns true if this error indicates a configuration problem.
    pub fn is_config_error(&self) -> bool {
        matches!(
            self,
            SyncError::InvalidConfig(_)
                | SyncError::InvalidUrl(_)
                | SyncError::ConfigLoadFailed(_)
        )
    }

    /// Short text for a transient notification.
    pub fn user_message(&self) -> String {
        match self {
            SyncError::NotConfigured(_) => "Sync is not set up".to_string(),
            SyncError::RemoteError { status: 401, .. } | SyncError::RemoteError { status: 403, .. } => {
                "Sync credential was rejected".to_string()
            }
            SyncError::RemoteError { status, .. } => {
                format!("Sync service error ({})", status)
            }
            SyncError::DocumentGone { .. } => {
                "Remote copy was not found; a new one will be created on the next sync".to_string()
            }
            SyncError::Transport(_) => "Sync service is unreachable".to_string(),
            SyncError::CorruptRemote(_) => "Remote copy is unreadable; local data kept".to_string(),
            SyncError::CorruptLocal(_) => "Saved data was unreadable and has been reset".to_string(),
            other => other.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_categories() {
        assert!(SyncError::NotConfigured("no credential").is_not_configured());
        assert!(!SyncError::Transport("reset".into()).is_not_configured());
        assert!(SyncError::InvalidUrl("x".into()).is_config_error());
    }

    #[test]
    fn test_db_error_mapping() {
        assert!(matches!(
            SyncError::from(DbError::CorruptSnapshot("eof".into())),
            SyncError::CorruptLocal(_)
        ));
        assert!(matches!(
            SyncError::from(DbError::PoolExhausted),
            SyncError::Storage(DbError::PoolExhausted)
        ));
    }

    #[test]
    fn test_user_messages() {
        let unauthorized = SyncError::RemoteError { status: 401, message: "Bad credentials".into() };
        assert_eq!(unauthorized.user_message(), "Sync credential was rejected");
        let server = SyncError::RemoteError { status: 502, message: String::new() };
        assert!(server.user_message().contains("502"));
    }
}
