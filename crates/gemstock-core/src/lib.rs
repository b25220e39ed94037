//! # gemstock-core: Pure Domain Logic for Gemstock
//!
//! Product records, money, the lifecycle operations, the id-based merge,
//! statistics and bulk import/export. Nothing in this crate touches a disk
//! or a socket.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        Gemstock Architecture                            │
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                 UI collaborator (browser / host)                │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │ snapshot in, snapshot out              │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │                 apps/gemstock (AppContext)                      │   │
//! │  └──────────────┬──────────────────────────────┬───────────────────┘   │
//! │                 │                              │                        │
//! │  ┌──────────────▼──────────────┐  ┌────────────▼────────────────────┐  │
//! │  │ gemstock-db (Local Store)   │  │ gemstock-sync (Sync Engine)     │  │
//! │  └──────────────┬──────────────┘  └────────────┬────────────────────┘  │
//! │                 │                              │                        │
//! │  ┌──────────────▼──────────────────────────────▼───────────────────┐   │
//! │  │               ★ gemstock-core (THIS CRATE) ★                    │   │
//! │  │   types • money • collection • merge • stats • transfer        │   │
//! │  │   NO I/O • NO DATABASE • NO NETWORK                             │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`types`] - Product record, status enums, sync settings
//! - [`money`] - Integer money with a decimal wire format
//! - [`collection`] - The ordered collection and its lifecycle operations
//! - [`merge`] - Remote-wins union by id
//! - [`stats`] - Dashboard numbers and chart series
//! - [`transfer`] - JSON import / export
//! - [`validation`] - Form input rules
//! - [`error`] - Domain error types
//!
//! ## Example Usage
//!
//! ```rust
//! use gemstock_core::{merge, Collection, Product};
//!
//! let remote: Collection = serde_json::from_str(r#"[{"id": "a", "name": "Ring"}]"#).unwrap();
//! let local: Collection = serde_json::from_str(r#"[{"id": "b", "name": "Chain"}]"#).unwrap();
//!
//! let merged = merge(&remote, &local);
//! let ids: Vec<&str> = merged.iter().map(|p: &Product| p.id.as_str()).collect();
//! assert_eq!(ids, vec!["a", "b"]);
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod collection;
pub mod error;
pub mod id;
pub mod merge;
pub mod money;
pub mod stats;
pub mod transfer;
pub mod types;
pub mod validation;

// =============================================================================
// Re-exports for Convenience
// =============================================================================

pub use collection::{Collection, ReturnDetails, SaleDetails};
pub use error::{CoreError, CoreResult, ImportError, ValidationError};
pub use id::generate_product_id;
pub use merge::{merge, plan_pull, PullPlan};
pub use money::Money;
pub use stats::{InventoryStats, StatusFilter};
pub use transfer::ImportMode;
pub use types::*;

/// Number of bars in the top-products chart.
pub const TOP_PRODUCTS_COUNT: usize = 5;
