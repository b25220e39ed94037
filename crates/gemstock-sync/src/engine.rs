//! # Sync Engine
//!
//! Mirrors the collection to a single remote document and merges it back.
//!
//! ## Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                                                                         │
//! │  push(collection)                                                       │
//! │     empty? ─────────────────────────────────────────► Skipped           │
//! │     !enabled / no credential ───────────────────────► NotConfigured     │
//! │     no document id ──► create ──► persist new id ───► Created           │
//! │     document id ─────► replace ─────────────────────► Updated           │
//! │                           └── 404 ──► clear id ─────► DocumentGone      │
//! │                                                                         │
//! │  pull()                                                                 │
//! │     no credential / no document id ─────────────────► NotConfigured     │
//! │     get ── 404 ──► clear id ────────────────────────► DocumentGone      │
//! │         └─ unreadable content ──────────────────────► CorruptRemote     │
//! │     plan_pull(remote, last saved local)                                 │
//! │         remote empty ───────────────────────────────► KeptLocal         │
//! │         otherwise ──► save merged to Local Store ───► Merged            │
//! │                                                                         │
//! │  reconcile() = push(last saved) then pull()                             │
//! │     (pull skipped when the push failed on the remote side)              │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Concurrency
//! Settings sit behind an async `RwLock`; the lock is never held across a
//! network call. Overlapping pushes are not deduplicated: the remote holds
//! whichever finished last.

use serde::Serialize;
use tokio::sync::RwLock;
use tracing::{debug, error, info, warn};

use gemstock_core::{plan_pull, Collection, PullPlan, SyncSettings};
use gemstock_db::LocalStore;

use crate::document::DocumentStore;
use crate::error::{SyncError, SyncResult};

// =============================================================================
// Outcomes
// =============================================================================

/// Result of a successful push.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum PushOutcome {
    /// A new remote document was created; its id is now stored.
    #[serde(rename_all = "camelCase")]
    Created { document_id: String },
    /// The existing remote document was overwritten.
    #[serde(rename_all = "camelCase")]
    Updated { document_id: String },
    /// Nothing was sent because the collection is empty.
    Skipped,
}

/// Result of a successful pull.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum MergeOutcome {
    /// The merged collection replaced the local snapshot.
    #[serde(rename_all = "camelCase")]
    Merged {
        final_count: usize,
        remote_count: usize,
        local_only_count: usize,
    },
    /// The remote document was empty; local data left as it was.
    KeptLocal,
}

/// Both halves of a reconcile.
#[derive(Debug)]
pub struct ReconcileReport {
    pub push: SyncResult<PushOutcome>,
    /// `None` when the pull was not attempted.
    pub pull: Option<SyncResult<MergeOutcome>>,
}

impl ReconcileReport {
    /// True when the local snapshot was replaced by a merge.
    pub fn merged(&self) -> bool {
        matches!(self.pull, Some(Ok(MergeOutcome::Merged { .. })))
    }

    /// Errors worth telling the user about. `NotConfigured` is not one.
    pub fn failures(&self) -> impl Iterator<Item = &SyncError> {
        self.push
            .as_ref()
            .err()
            .into_iter()
            .chain(self.pull.as_ref().and_then(|p| p.as_ref().err()))
            .filter(|e| !e.is_not_configured())
    }
}

/// Patch for the persisted sync settings.
///
/// `None` leaves a field as it is. An empty or blank string clears the
/// credential or the document id.
#[derive(Debug, Clone, Default)]
pub struct SettingsUpdate {
    pub credential: Option<String>,
    pub remote_document_id: Option<String>,
    pub enabled: Option<bool>,
}

/// Settings after an update, plus the push it triggered, if any.
#[derive(Debug)]
pub struct SettingsChange {
    pub settings: SyncSettings,
    pub push: Option<SyncResult<PushOutcome>>,
}

/// What the UI shows about sync.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SyncStatus {
    pub configured: bool,
    pub enabled: bool,
    pub has_document: bool,
    pub document_id: Option<String>,
}

// =============================================================================
// Engine
// =============================================================================

/// Push, pull and reconcile against one remote document.
pub struct SyncEngine<D: DocumentStore> {
    store: D,
    local: LocalStore,
    settings: RwLock<SyncSettings>,
}

impl<D: DocumentStore> SyncEngine<D> {
    /// Creates an engine with the settings persisted in `local`.
    pub async fn new(store: D, local: LocalStore) -> SyncResult<Self> {
        let settings = local.load_settings().await?;
        debug!(settings = ?settings, "Loaded sync settings");
        Ok(Self::with_settings(store, local, settings))
    }

    /// Creates an engine with explicit settings. Nothing is persisted.
    pub fn with_settings(store: D, local: LocalStore, settings: SyncSettings) -> Self {
        SyncEngine {
            store,
            local,
            settings: RwLock::new(settings),
        }
    }

    /// The remote document store.
    pub fn store(&self) -> &D {
        &self.store
    }

    /// The Local Store merged collections are written to.
    pub fn local(&self) -> &LocalStore {
        &self.local
    }

    /// Current settings.
    pub async fn settings(&self) -> SyncSettings {
        self.settings.read().await.clone()
    }

    pub async fn status(&self) -> SyncStatus {
        let settings = self.settings.read().await;
        SyncStatus {
            configured: settings.has_credential(),
            enabled: settings.enabled,
            has_document: settings.remote_document_id.is_some(),
            document_id: settings.remote_document_id.clone(),
        }
    }

    // =========================================================================
    // Push
    // =========================================================================

    /// Writes `collection` to the remote document.
    ///
    /// An empty collection is never sent, whatever the settings say.
    pub async fn push(&self, collection: &Collection) -> SyncResult<PushOutcome> {
        if collection.is_empty() {
            debug!("Empty collection, push skipped");
            return Ok(PushOutcome::Skipped);
        }

        let settings = self.settings().await;
        if !settings.can_push() {
            return Err(missing(&settings, "sync is disabled"));
        }
        let credential = settings.credential.as_deref().unwrap_or_default();
        let content = serde_json::to_string_pretty(collection)?;

        match settings.remote_document_id.clone() {
            None => {
                let document_id = self
                    .store
                    .create(credential, &content)
                    .await
                    .inspect_err(|e| warn!(error = %e, "Creating remote document failed"))?;
                self.store_document_id(&document_id).await?;
                info!(document_id = %document_id, count = collection.len(), "Pushed to new remote document");
                Ok(PushOutcome::Created { document_id })
            }
            Some(document_id) => match self.store.replace(credential, &document_id, &content).await {
                Ok(()) => {
                    info!(document_id = %document_id, count = collection.len(), "Pushed to remote document");
                    Ok(PushOutcome::Updated { document_id })
                }
                Err(SyncError::RemoteError { status: 404, .. }) => Err(self.document_gone(document_id).await),
                Err(e) => {
                    warn!(document_id = %document_id, error = %e, "Push failed");
                    Err(e)
                }
            },
        }
    }

    // =========================================================================
    // Pull
    // =========================================================================

    /// Fetches the remote collection and merges it into the last saved one.
    pub async fn pull(&self) -> SyncResult<MergeOutcome> {
        let settings = self.settings().await;
        if !settings.can_pull() {
            return Err(missing(&settings, "no remote document"));
        }
        let credential = settings.credential.as_deref().unwrap_or_default();
        let document_id = settings.remote_document_id.clone().unwrap_or_default();

        let document = match self.store.get(credential, &document_id).await {
            Ok(document) => document,
            Err(SyncError::RemoteError { status: 404, .. }) => {
                return Err(self.document_gone(document_id).await)
            }
            Err(e) => {
                warn!(document_id = %document_id, error = %e, "Pull failed");
                return Err(e);
            }
        };

        let remote = parse_remote(&document_id, document.content.as_deref())?;
        let local = self.local.load().await?;

        match plan_pull(&remote, &local) {
            PullPlan::KeptLocal => {
                info!(local_count = local.len(), "Remote document is empty, keeping local data");
                Ok(MergeOutcome::KeptLocal)
            }
            PullPlan::Apply {
                collection,
                remote_count,
                local_only_count,
            } => {
                self.local.save(&collection).await?;
                info!(
                    final_count = collection.len(),
                    remote_count,
                    local_only_count,
                    "Merged remote document"
                );
                Ok(MergeOutcome::Merged {
                    final_count: collection.len(),
                    remote_count,
                    local_only_count,
                })
            }
        }
    }

    // =========================================================================
    // Reconcile
    // =========================================================================

    /// Pushes the last saved snapshot, then pulls.
    pub async fn reconcile(&self) -> ReconcileReport {
        let push = match self.local.load().await {
            Ok(snapshot) => self.push(&snapshot).await,
            Err(e) => Err(e.into()),
        };

        let aborted = matches!(push, Err(SyncError::RemoteError { .. } | SyncError::Transport(_)));
        let pull = if aborted {
            debug!("Push failed on the remote side, pull not attempted");
            None
        } else {
            Some(self.pull().await)
        };

        ReconcileReport { push, pull }
    }

    // =========================================================================
    // Settings
    // =========================================================================

    /// Applies `update`, persists the result and pushes the last saved
    /// snapshot when sync was just switched on with a credential.
    pub async fn update_settings(&self, update: SettingsUpdate) -> SyncResult<SettingsChange> {
        let (settings, newly_enabled) = {
            let mut current = self.settings.write().await;
            let mut next = current.clone();

            if let Some(credential) = update.credential {
                next.credential = non_blank(credential);
            }
            if let Some(document_id) = update.remote_document_id {
                next.remote_document_id = non_blank(document_id);
            }
            if let Some(enabled) = update.enabled {
                next.enabled = enabled;
            }

            self.local.save_settings(&next).await?;
            let newly_enabled = next.enabled && !current.enabled;
            *current = next.clone();
            (next, newly_enabled)
        };
        info!(settings = ?settings, "Sync settings updated");

        let push = if newly_enabled && settings.has_credential() {
            Some(match self.local.load().await {
                Ok(snapshot) => self.push(&snapshot).await,
                Err(e) => Err(e.into()),
            })
        } else {
            None
        };

        Ok(SettingsChange { settings, push })
    }

    async fn store_document_id(&self, document_id: &str) -> SyncResult<()> {
        let mut settings = self.settings.write().await;
        settings.remote_document_id = Some(document_id.to_string());
        self.local.save_settings(&settings).await?;
        Ok(())
    }

    /// Forgets a document id the service no longer knows. Returns the
    /// `DocumentGone` error to hand back.
    async fn document_gone(&self, document_id: String) -> SyncError {
        warn!(document_id = %document_id, "Remote document no longer exists, clearing id");
        let mut settings = self.settings.write().await;
        if settings.remote_document_id.as_deref() == Some(document_id.as_str()) {
            settings.remote_document_id = None;
            if let Err(e) = self.local.save_settings(&settings).await {
                error!(error = %e, "Failed to persist cleared document id");
            }
        }
        SyncError::DocumentGone { document_id }
    }
}

/// `NotConfigured` naming the credential when it is the missing piece,
/// `otherwise` when it is not.
fn missing(settings: &SyncSettings, otherwise: &'static str) -> SyncError {
    if settings.has_credential() {
        SyncError::NotConfigured(otherwise)
    } else {
        SyncError::NotConfigured("no credential")
    }
}

fn non_blank(value: String) -> Option<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}

fn parse_remote(document_id: &str, content: Option<&str>) -> SyncResult<Collection> {
    let content = content.ok_or_else(|| {
        error!(document_id, "Remote document has no inventory content");
        SyncError::CorruptRemote("content block missing".to_string())
    })?;
    serde_json::from_str(content).map_err(|e| {
        error!(document_id, error = %e, "Remote document is unreadable");
        SyncError::CorruptRemote(e.to_string())
    })
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::RemoteDocument;
    use async_trait::async_trait;
    use gemstock_core::Product;
    use gemstock_db::{Database, DbConfig};
    use std::collections::HashMap;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Mutex;

    const TOKEN: &str = "secret";

    /// In-memory document service.
    #[derive(Default)]
    struct FakeStore {
        docs: Mutex<HashMap<String, String>>,
        writes: AtomicUsize,
        fail_status: Mutex<Option<u16>>,
    }

    impl FakeStore {
        fn seed(&self, id: &str, content: &str) {
            self.docs.lock().unwrap().insert(id.to_string(), content.to_string());
        }

        fn content(&self, id: &str) -> Option<String> {
            self.docs.lock().unwrap().get(id).cloned()
        }

        fn writes(&self) -> usize {
            self.writes.load(Ordering::SeqCst)
        }

        fn fail_with(&self, status: u16) {
            *self.fail_status.lock().unwrap() = Some(status);
        }

        fn check(&self, credential: &str) -> SyncResult<()> {
            if let Some(status) = *self.fail_status.lock().unwrap() {
                return Err(SyncError::RemoteError { status, message: String::new() });
            }
            if credential != TOKEN {
                return Err(SyncError::RemoteError { status: 401, message: "Bad credentials".into() });
            }
            Ok(())
        }
    }

    #[async_trait]
    impl DocumentStore for FakeStore {
        async fn create(&self, credential: &str, content: &str) -> SyncResult<String> {
            self.check(credential)?;
            self.writes.fetch_add(1, Ordering::SeqCst);
            let mut docs = self.docs.lock().unwrap();
            let id = format!("doc-{}", docs.len() + 1);
            docs.insert(id.clone(), content.to_string());
            Ok(id)
        }

        async fn get(&self, credential: &str, document_id: &str) -> SyncResult<RemoteDocument> {
            self.check(credential)?;
            match self.content(document_id) {
                Some(content) => Ok(RemoteDocument { id: document_id.to_string(), content: Some(content) }),
                None => Err(SyncError::RemoteError { status: 404, message: "Not Found".into() }),
            }
        }

        async fn replace(&self, credential: &str, document_id: &str, content: &str) -> SyncResult<()> {
            self.check(credential)?;
            let mut docs = self.docs.lock().unwrap();
            match docs.get_mut(document_id) {
                Some(slot) => {
                    self.writes.fetch_add(1, Ordering::SeqCst);
                    *slot = content.to_string();
                    Ok(())
                }
                None => Err(SyncError::RemoteError { status: 404, message: "Not Found".into() }),
            }
        }
    }

    fn product(id: &str, selling: i64) -> Product {
        serde_json::from_value(serde_json::json!({
            "id": id,
            "date": "2024-03-10",
            "name": format!("Ring {}", id),
            "weight": 2.5,
            "article": format!("R-{}", id),
            "purchasePrice": 100,
            "sellingPrice": selling,
            "status": "in-stock"
        }))
        .unwrap()
    }

    fn collection(ids: &[&str]) -> Collection {
        ids.iter().map(|id| product(id, 200)).collect()
    }

    fn json(c: &Collection) -> String {
        serde_json::to_string(c).unwrap()
    }

    fn ids(c: &Collection) -> Vec<String> {
        c.iter().map(|p| p.id.clone()).collect()
    }

    fn enabled(document_id: Option<&str>) -> SyncSettings {
        SyncSettings {
            credential: Some(TOKEN.to_string()),
            remote_document_id: document_id.map(str::to_string),
            enabled: true,
        }
    }

    async fn engine(settings: SyncSettings) -> SyncEngine<FakeStore> {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let local = db.local_store();
        local.save_settings(&settings).await.unwrap();
        SyncEngine::new(FakeStore::default(), local).await.unwrap()
    }

    #[tokio::test]
    async fn test_empty_push_is_skipped_without_network() {
        let engine = engine(enabled(Some("doc-1"))).await;
        engine.store().seed("doc-1", &json(&collection(&["a", "b", "c", "d", "e", "f", "g", "h", "i", "j"])));

        let outcome = engine.push(&Collection::new()).await.unwrap();

        assert_eq!(outcome, PushOutcome::Skipped);
        assert_eq!(engine.store().writes(), 0);
        let remote: Collection = serde_json::from_str(&engine.store().content("doc-1").unwrap()).unwrap();
        assert_eq!(remote.len(), 10);
    }

    #[tokio::test]
    async fn test_empty_push_skipped_even_when_unconfigured() {
        let engine = engine(SyncSettings::default()).await;
        assert_eq!(engine.push(&Collection::new()).await.unwrap(), PushOutcome::Skipped);
    }

    #[tokio::test]
    async fn test_push_requires_enabled_and_credential() {
        let engine = engine(SyncSettings {
            credential: Some(TOKEN.into()),
            remote_document_id: None,
            enabled: false,
        })
        .await;
        assert!(engine.push(&collection(&["a"])).await.unwrap_err().is_not_configured());

        let engine = self::engine(SyncSettings {
            credential: Some("  ".into()),
            remote_document_id: None,
            enabled: true,
        })
        .await;
        assert!(engine.push(&collection(&["a"])).await.unwrap_err().is_not_configured());
        assert_eq!(engine.store().writes(), 0);
    }

    #[tokio::test]
    async fn test_first_push_creates_and_persists_id() {
        let engine = engine(enabled(None)).await;

        let document_id = match engine.push(&collection(&["a", "b"])).await.unwrap() {
            PushOutcome::Created { document_id } => document_id,
            other => panic!("expected Created, got {:?}", other),
        };

        assert_eq!(engine.settings().await.remote_document_id.as_deref(), Some(document_id.as_str()));
        let persisted = engine.local().load_settings().await.unwrap();
        assert_eq!(persisted.remote_document_id.as_deref(), Some(document_id.as_str()));

        let second = engine.push(&collection(&["a", "b", "c"])).await.unwrap();
        assert_eq!(second, PushOutcome::Updated { document_id: document_id.clone() });
        let remote: Collection = serde_json::from_str(&engine.store().content(&document_id).unwrap()).unwrap();
        assert_eq!(remote.len(), 3);
    }

    #[tokio::test]
    async fn test_push_to_missing_document_clears_id() {
        let engine = engine(enabled(Some("gone"))).await;

        let err = engine.push(&collection(&["a"])).await.unwrap_err();
        assert!(matches!(err, SyncError::DocumentGone { ref document_id } if document_id == "gone"));
        assert_eq!(engine.settings().await.remote_document_id, None);
        assert_eq!(engine.local().load_settings().await.unwrap().remote_document_id, None);

        assert!(matches!(
            engine.push(&collection(&["a"])).await.unwrap(),
            PushOutcome::Created { .. }
        ));
    }

    #[tokio::test]
    async fn test_pull_requires_document() {
        let engine = engine(enabled(None)).await;
        assert!(engine.pull().await.unwrap_err().is_not_configured());
    }

    #[tokio::test]
    async fn test_pull_remote_wins_and_keeps_local_only() {
        let engine = engine(enabled(Some("doc-1"))).await;
        engine.local().save(&collection(&["a", "b", "c"])).await.unwrap();
        let remote: Collection = vec![product("a", 999), product("d", 200)].into();
        engine.store().seed("doc-1", &json(&remote));

        let outcome = engine.pull().await.unwrap();
        assert_eq!(
            outcome,
            MergeOutcome::Merged { final_count: 4, remote_count: 2, local_only_count: 2 }
        );

        let saved = engine.local().load().await.unwrap();
        assert_eq!(ids(&saved), ["a", "d", "b", "c"]);
        assert_eq!(saved.find("a").unwrap().selling_price, product("a", 999).selling_price);
    }

    #[tokio::test]
    async fn test_pull_into_empty_local_copies_remote() {
        let engine = engine(enabled(Some("doc-1"))).await;
        let remote = collection(&["a", "b", "c", "d", "e"]);
        engine.store().seed("doc-1", &json(&remote));

        let outcome = engine.pull().await.unwrap();
        assert_eq!(
            outcome,
            MergeOutcome::Merged { final_count: 5, remote_count: 5, local_only_count: 0 }
        );
        assert_eq!(engine.local().load().await.unwrap(), remote);
    }

    #[tokio::test]
    async fn test_repeated_pull_of_records_without_ids_does_not_duplicate() {
        let engine = engine(SyncSettings {
            credential: Some(TOKEN.into()),
            remote_document_id: Some("doc-1".into()),
            enabled: false,
        })
        .await;
        engine
            .store()
            .seed("doc-1", r#"[{"date": "2024-03-10", "name": "Ring", "sellingPrice": 200}]"#);

        engine.pull().await.unwrap();
        let first = engine.local().load().await.unwrap();
        let outcome = engine.pull().await.unwrap();
        let second = engine.local().load().await.unwrap();

        assert_eq!(second.len(), 1);
        assert_eq!(ids(&first), ids(&second));
        assert_eq!(
            outcome,
            MergeOutcome::Merged { final_count: 1, remote_count: 1, local_only_count: 0 }
        );
        assert_eq!(engine.store().writes(), 0);
    }

    #[tokio::test]
    async fn test_pull_of_empty_remote_keeps_local() {
        let engine = engine(enabled(Some("doc-1"))).await;
        let local = collection(&["a", "b", "c", "d", "e"]);
        engine.local().save(&local).await.unwrap();
        engine.store().seed("doc-1", "[]");

        assert_eq!(engine.pull().await.unwrap(), MergeOutcome::KeptLocal);
        assert_eq!(engine.local().load().await.unwrap(), local);
    }

    #[tokio::test]
    async fn test_corrupt_remote_leaves_local_untouched() {
        let engine = engine(enabled(Some("doc-1"))).await;
        let local = collection(&["a"]);
        engine.local().save(&local).await.unwrap();
        engine.store().seed("doc-1", "{not json");

        assert!(matches!(engine.pull().await, Err(SyncError::CorruptRemote(_))));
        assert_eq!(engine.local().load().await.unwrap(), local);
        assert_eq!(engine.settings().await.remote_document_id.as_deref(), Some("doc-1"));
    }

    #[tokio::test]
    async fn test_pull_of_missing_document_clears_id() {
        let engine = engine(enabled(Some("gone"))).await;
        assert!(matches!(engine.pull().await, Err(SyncError::DocumentGone { .. })));
        assert!(!engine.status().await.has_document);
    }

    #[tokio::test]
    async fn test_remote_error_leaves_everything() {
        let engine = engine(enabled(Some("doc-1"))).await;
        engine.store().seed("doc-1", "[]");
        engine.store().fail_with(500);

        let err = engine.pull().await.unwrap_err();
        assert!(matches!(err, SyncError::RemoteError { status: 500, .. }));
        assert_eq!(engine.settings().await.remote_document_id.as_deref(), Some("doc-1"));
    }

    #[tokio::test]
    async fn test_reconcile_pushes_then_pulls() {
        let engine = engine(enabled(None)).await;
        engine.local().save(&collection(&["a", "b"])).await.unwrap();

        let report = engine.reconcile().await;
        assert!(matches!(report.push, Ok(PushOutcome::Created { .. })));
        assert_eq!(
            report.pull.unwrap().unwrap(),
            MergeOutcome::Merged { final_count: 2, remote_count: 2, local_only_count: 0 }
        );
    }

    #[tokio::test]
    async fn test_reconcile_skips_pull_after_remote_failure() {
        let engine = engine(enabled(Some("doc-1"))).await;
        engine.local().save(&collection(&["a"])).await.unwrap();
        engine.store().seed("doc-1", "[]");
        engine.store().fail_with(503);

        let report = engine.reconcile().await;
        assert!(report.pull.is_none());
        assert_eq!(report.failures().count(), 1);
    }

    #[tokio::test]
    async fn test_reconcile_with_empty_local_still_pulls() {
        let engine = engine(enabled(Some("doc-1"))).await;
        engine.store().seed("doc-1", &json(&collection(&["x", "y"])));

        let report = engine.reconcile().await;
        assert_eq!(*report.push.as_ref().unwrap(), PushOutcome::Skipped);
        assert!(report.merged());
        assert_eq!(engine.local().load().await.unwrap().len(), 2);
    }

    #[tokio::test]
    async fn test_enabling_sync_pushes_immediately() {
        let engine = engine(SyncSettings::default()).await;
        engine.local().save(&collection(&["a"])).await.unwrap();

        let change = engine
            .update_settings(SettingsUpdate {
                credential: Some(format!(" {} ", TOKEN)),
                enabled: Some(true),
                ..Default::default()
            })
            .await
            .unwrap();

        assert_eq!(change.settings.credential.as_deref(), Some(TOKEN));
        assert!(matches!(change.push, Some(Ok(PushOutcome::Created { .. }))));
        assert_eq!(engine.store().writes(), 1);

        let persisted = engine.local().load_settings().await.unwrap();
        assert!(persisted.enabled);
        assert!(persisted.remote_document_id.is_some());
    }

    #[tokio::test]
    async fn test_settings_update_without_enable_does_not_push() {
        let engine = engine(enabled(Some("doc-1"))).await;
        engine.local().save(&collection(&["a"])).await.unwrap();

        let change = engine
            .update_settings(SettingsUpdate {
                remote_document_id: Some(String::new()),
                ..Default::default()
            })
            .await
            .unwrap();

        assert!(change.push.is_none());
        assert_eq!(change.settings.remote_document_id, None);
        assert_eq!(change.settings.credential.as_deref(), Some(TOKEN));
        assert_eq!(engine.store().writes(), 0);
    }

    #[tokio::test]
    async fn test_status() {
        let engine = engine(enabled(Some("doc-9"))).await;
        let status = engine.status().await;
        assert!(status.configured && status.enabled && status.has_document);
        assert_eq!(status.document_id.as_deref(), Some("doc-9"));
    }
}
