//! # gemstock-sync: Sync Engine for Gemstock
//!
//! Keeps the inventory on one device in step with a single remote JSON
//! document, so a second device (or a fresh install) can pick it up.
//!
//! ## Architecture Overview
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        Sync Engine Architecture                         │
//! │                                                                         │
//! │  ┌──────────────────────────────────────────────────────────────────┐  │
//! │  │                    SyncEngine<D: DocumentStore>                  │  │
//! │  │                                                                  │  │
//! │  │  push(collection)   never sends an empty collection              │  │
//! │  │  pull()             remote wins by id, local-only appended       │  │
//! │  │  reconcile()        push last saved snapshot, then pull          │  │
//! │  │  update_settings()  persist, push when newly enabled             │  │
//! │  └──────────┬──────────────────────────────────┬────────────────────┘  │
//! │             │                                  │                        │
//! │             ▼                                  ▼                        │
//! │  ┌────────────────────────┐        ┌────────────────────────────┐      │
//! │  │  DocumentStore         │        │  LocalStore (gemstock-db)  │      │
//! │  │  GistClient (reqwest)  │        │  snapshot + sync settings  │      │
//! │  │  create / get / replace│        │                            │      │
//! │  └────────────────────────┘        └────────────────────────────┘      │
//! │                                                                         │
//! │  GemstockConfig: [remote] [storage] [sync] from TOML + environment     │
//! │  bootstrap_credential: one-time credential from a launch URL           │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Module Organization
//! - [`bootstrap`] - Launch-URL credential hand-off
//! - [`config`] - File and environment configuration
//! - [`document`] - `DocumentStore` trait
//! - [`engine`] - `SyncEngine`, push / pull / reconcile
//! - [`error`] - Sync error types
//! - [`gist`] - `GistClient`, the HTTP document store
//!
//! ## Usage
//!
//! ```rust,ignore
//! use gemstock_sync::{GemstockConfig, GistClient, SyncEngine};
//! use gemstock_db::{Database, DbConfig};
//!
//! let config = GemstockConfig::load_or_default(None);
//! let db = Database::new(DbConfig::new(config.database_path())).await?;
//!
//! let client = GistClient::new(&config.remote)?;
//! let engine = SyncEngine::new(client, db.local_store()).await?;
//!
//! let report = engine.reconcile().await;
//! for failure in report.failures() {
//!     eprintln!("{}", failure.user_message());
//! }
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod bootstrap;
pub mod config;
pub mod document;
pub mod engine;
pub mod error;
pub mod gist;

// =============================================================================
// Re-exports
// =============================================================================

pub use bootstrap::{bootstrap_credential, BootstrapCredential};
pub use config::{GemstockConfig, RemoteConfig, StorageConfig, SyncSchedule};
pub use document::{DocumentStore, RemoteDocument};
pub use engine::{
    MergeOutcome, PushOutcome, ReconcileReport, SettingsChange, SettingsUpdate, SyncEngine,
    SyncStatus,
};
pub use error::{SyncError, SyncResult};
pub use gist::GistClient;
