//! # Operations Module
//!
//! Everything the UI can ask of the application, as methods on
//! [`AppContext`](crate::state::AppContext).
//!
//! ## Organization
//! ```text
//! commands/
//! ├── mod.rs       ◄─── You are here
//! ├── product.rs   ◄─── add / edit / delete / sell / return / ship, search
//! ├── report.rs    ◄─── statistics for the dashboard
//! ├── transfer.rs  ◄─── export and import files
//! └── sync.rs      ◄─── sync_now, settings, launch-URL credential
//! ```
//!
//! ## How Operations Report
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  ctx.mark_sold(id, sale).await                                          │
//! │         │                                                               │
//! │         ├── Err(AppError { code, message })   nothing was changed       │
//! │         │                                                               │
//! │         └── Ok(Saved { value, notice })       saved to the Local Store  │
//! │                              │                                          │
//! │                              └── Some(SyncNotice) when the push had     │
//! │                                  something to say                       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

pub mod product;
pub mod report;
pub mod sync;
pub mod transfer;

pub use report::Statistics;
pub use sync::SyncRun;
pub use transfer::{ExportFile, ImportSummary};
