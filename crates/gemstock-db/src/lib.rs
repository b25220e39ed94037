//! # gemstock-db: Local Store for Gemstock
//!
//! Durable key-value slots on SQLite, accessed through sqlx.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        Gemstock Data Flow                               │
//! │                                                                         │
//! │  AppContext mutation          SyncEngine pull / reconcile              │
//! │       │                              │                                  │
//! │       ▼                              ▼                                  │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                   gemstock-db (THIS CRATE)                      │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────────┐    ┌───────────────┐    ┌──────────────┐  │   │
//! │  │   │   Database    │    │  LocalStore   │    │  Migrations  │  │   │
//! │  │   │   (pool.rs)   │◄───│  load / save  │    │  (embedded)  │  │   │
//! │  │   │  SqlitePool   │    │  settings     │    │ 001_local_   │  │   │
//! │  │   │               │    │               │    │  store.sql   │  │   │
//! │  │   └───────────────┘    └───────────────┘    └──────────────┘  │   │
//! │  │                                                                 │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  <platform data dir>/gemstock.db                                       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! The Local Store knows nothing about sync; it only holds slots.
//!
//! ## Usage
//!
//! ```rust,ignore
//! use gemstock_db::{Database, DbConfig};
//!
//! let db = Database::new(DbConfig::new("path/to/gemstock.db")).await?;
//! let store = db.local_store();
//!
//! let mut products = store.load().await?;
//! store.save(&products).await?;
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod error;
pub mod migrations;
pub mod pool;
pub mod repository;

// =============================================================================
// Re-exports
// =============================================================================

pub use error::{DbError, DbResult};
pub use pool::{Database, DbConfig};
pub use repository::local_store::{keys, LocalStore};
