//! # State Module
//!
//! One `AppContext` owns everything the operations need. There are no
//! globals: the binary builds the context and hands out references.
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    State Architecture                                   │
//! │                                                                         │
//! │  main.rs ──► AppContext::initialize(config)                            │
//! │                    │                                                    │
//! │          ┌─────────┼──────────────┬─────────────────┐                  │
//! │          ▼         ▼              ▼                 ▼                   │
//! │  ┌────────────┐ ┌────────────┐ ┌──────────────┐ ┌──────────────┐       │
//! │  │ Collection │ │ LocalStore │ │ SyncEngine   │ │ Config       │       │
//! │  │ (RwLock)   │ │ (sqlx pool)│ │ (RwLock'd    │ │ (read-only)  │       │
//! │  │            │ │            │ │  settings)   │ │              │       │
//! │  └────────────┘ └────────────┘ └──────────────┘ └──────────────┘       │
//! │                                                                         │
//! │  SyncNotice: what a sync attempt reports instead of failing            │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

mod context;
mod notice;

pub use context::{AppContext, Saved};
pub use notice::{NoticeLevel, SyncNotice};
