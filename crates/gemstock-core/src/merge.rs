//! # Merge
//!
//! Id-based reconciliation of the remote and local collections.
//!
//! ## Policy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                                                                         │
//! │   R = remote collection            L = local collection                │
//! │                                                                         │
//! │   |R| == 0  ──────────────────────►  KeptLocal (L untouched)           │
//! │                                                                         │
//! │   |R| >  0  ──────────────────────►  R ++ [l in L | id(l) ∉ ids(R)]    │
//! │                                                                         │
//! │   Shared ids resolve to the REMOTE record. Local-only records keep     │
//! │   their relative order and land after every remote record.            │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! There is no field-level conflict resolution and no tombstones: a record
//! deleted on one device comes back from any device that still holds it.

use crate::collection::Collection;

/// Merges `local` into `remote`.
///
/// Remote records are kept verbatim and in order; every local record whose
/// id the remote does not carry is appended in local order. `merge([], L)`
/// is `L`.
pub fn merge(remote: &Collection, local: &Collection) -> Collection {
    let remote_ids = remote.ids();
    remote
        .iter()
        .chain(local.iter().filter(|p| !remote_ids.contains(p.id.as_str())))
        .cloned()
        .collect()
}

/// What a pull should do with the local snapshot.
#[derive(Debug, Clone, PartialEq)]
pub enum PullPlan {
    /// The remote is empty: keep the local snapshot and write nothing.
    KeptLocal,
    /// Replace the local snapshot with `collection`.
    Apply {
        collection: Collection,
        remote_count: usize,
        local_only_count: usize,
    },
}

/// Decides the outcome of a pull without touching storage.
pub fn plan_pull(remote: &Collection, local: &Collection) -> PullPlan {
    if remote.is_empty() {
        return PullPlan::KeptLocal;
    }

    let collection = merge(remote, local);
    let remote_count = remote.len();
    PullPlan::Apply {
        local_only_count: collection.len() - remote_count,
        remote_count,
        collection,
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
