//! # Repository Module
//!
//! Repositories over the Local Store tables.
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  AppContext / SyncEngine                                               │
//! │       │                                                                 │
//! │       │  db.local_store().load()                                       │
//! │       ▼                                                                 │
//! │  LocalStore                                                            │
//! │  ├── load / save            (collection snapshot)                      │
//! │  ├── load_settings / save_settings                                     │
//! │  └── get / put / remove     (raw slots)                                │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  kv_slots                                                              │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

pub mod local_store;
