//! # Gemstock Application Library
//!
//! The application layer of the jewelry inventory tracker: one context
//! object, the operations the UI calls on it, and the host loop.
//!
//! ## Module Organization
//! ```text
//! gemstock_app/
//! ├── lib.rs          ◄─── You are here (startup helpers, re-exports)
//! ├── state/
//! │   ├── mod.rs      ◄─── State exports
//! │   ├── context.rs  ◄─── AppContext, the mutation pipeline
//! │   └── notice.rs   ◄─── SyncNotice toasts
//! ├── commands/
//! │   ├── product.rs  ◄─── Product lifecycle and search
//! │   ├── report.rs   ◄─── Statistics
//! │   ├── transfer.rs ◄─── Import / export
//! │   └── sync.rs     ◄─── Manual sync, settings, launch URL
//! └── error.rs        ◄─── AppError for operations
//! ```
//!
//! ## Startup Sequence
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  1. init_tracing()            RUST_LOG or "info,gemstock_app=debug"     │
//! │  2. GemstockConfig            defaults ─► gemstock.toml ─► GEMSTOCK_*   │
//! │  3. AppContext::initialize    open SQLite, migrate, load collection     │
//! │  4. apply_launch_url          optional one-time credential              │
//! │  5. sync_now                  push saved snapshot, pull, reload         │
//! │  6. periodic sync_now         only when sync.interval_secs > 0          │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

pub mod commands;
pub mod error;
pub mod state;

#[cfg(test)]
mod test_support;

use tracing_subscriber::EnvFilter;

pub use commands::{ExportFile, ImportSummary, Statistics, SyncRun};
pub use error::{AppError, AppResult, ErrorCode};
pub use state::{AppContext, NoticeLevel, Saved, SyncNotice};

/// Installs the global tracing subscriber.
///
/// ## Log Levels
/// - `RUST_LOG=debug` - Show debug messages
/// - `RUST_LOG=gemstock_sync=trace` - Trace the sync engine only
/// - Default: INFO, DEBUG for the gemstock crates
pub fn init_tracing() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,gemstock_app=debug,gemstock_sync=debug,sqlx=warn"));

    tracing_subscriber::fmt().with_env_filter(filter).init();
}
