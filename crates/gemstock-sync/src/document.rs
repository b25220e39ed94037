//! # Remote Document Store
//!
//! The seam between the engine and the document service. The engine only
//! needs three calls; `GistClient` is the production implementation and
//! tests substitute an in-memory one.
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  create(credential, content)           → new document id               │
//! │  get(credential, id)                   → content of the named block    │
//! │  replace(credential, id, content)      → full overwrite                │
//! │                                                                         │
//! │  Errors: RemoteError { status } for any non-success answer (404        │
//! │  included; the engine decides what a 404 means), Transport when no     │
//! │  answer arrived.                                                        │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use async_trait::async_trait;

use crate::error::SyncResult;

/// A fetched remote document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RemoteDocument {
    pub id: String,
    /// Text of the named content block; `None` when the block is missing.
    pub content: Option<String>,
}

/// Authenticated access to single remote documents.
#[async_trait]
pub trait DocumentStore: Send + Sync {
    /// Creates a document holding `content`; returns its id.
    async fn create(&self, credential: &str, content: &str) -> SyncResult<String>;

    /// Fetches a document.
    async fn get(&self, credential: &str, document_id: &str) -> SyncResult<RemoteDocument>;

    /// Overwrites a document's content block in full.
    async fn replace(&self, credential: &str, document_id: &str, content: &str) -> SyncResult<()>;
}
