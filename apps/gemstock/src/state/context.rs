//! # Application Context
//!
//! Everything the UI-facing operations share, built once at startup and
//! passed by reference.
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         AppContext                                      │
//! │                                                                         │
//! │  products: RwLock<Collection>   what the UI renders                    │
//! │  store:    LocalStore           last saved snapshot + sync settings    │
//! │  engine:   SyncEngine<D>        push / pull / reconcile                │
//! │  config:   GemstockConfig       [remote] [storage] [sync]              │
//! │                                                                         │
//! │  Every mutation:                                                        │
//! │    clone ─► apply ─► save ─► swap in ─► push (if enabled)              │
//! │                        │                    │                           │
//! │                   Err: nothing         Err: SyncNotice only             │
//! │                   changed                                               │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! The in-memory collection is only replaced after the save succeeded, so
//! memory and the Local Store never disagree.

use serde::Serialize;
use tokio::sync::RwLock;
use tracing::{error, info, warn};

use gemstock_core::{Collection, CoreResult};
use gemstock_db::{Database, DbConfig, DbError, LocalStore};
use gemstock_sync::{DocumentStore, GemstockConfig, GistClient, SettingsUpdate, SyncEngine};

use super::notice::SyncNotice;
use crate::error::AppResult;

/// Result of a successful operation plus whatever sync had to say.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Saved<T> {
    pub value: T,
    pub notice: Option<SyncNotice>,
}

/// Shared application state.
pub struct AppContext<D: DocumentStore = GistClient> {
    pub(crate) config: GemstockConfig,
    pub(crate) db: Database,
    pub(crate) store: LocalStore,
    pub(crate) engine: SyncEngine<D>,
    pub(crate) products: RwLock<Collection>,
    startup_notice: Option<SyncNotice>,
}

impl AppContext<GistClient> {
    /// Opens the database named by `config` and wires the HTTP document
    /// store.
    pub async fn initialize(config: GemstockConfig) -> AppResult<Self> {
        config.validate()?;

        let db_path = config.database_path();
        info!(path = %db_path.display(), "Opening Local Store");
        let db = Database::new(DbConfig::new(db_path)).await?;
        let client = GistClient::new(&config.remote)?;

        Self::open(config, db, client).await
    }
}

impl<D: DocumentStore> AppContext<D> {
    /// Builds a context over an open database and any document store.
    pub async fn open(config: GemstockConfig, db: Database, document_store: D) -> AppResult<Self> {
        let store = db.local_store();

        let (products, startup_notice) = match store.load_strict().await {
            Ok(products) => (products, None),
            Err(DbError::CorruptSnapshot(reason)) => {
                error!(reason = %reason, "Saved collection is unreadable, starting empty");
                let notice = SyncNotice::from_error(&gemstock_sync::SyncError::CorruptLocal(reason));
                (Collection::new(), notice)
            }
            Err(e) => return Err(e.into()),
        };
        info!(count = products.len(), "Loaded collection");

        let engine = SyncEngine::new(document_store, store.clone()).await?;

        let ctx = AppContext {
            config,
            db,
            store,
            engine,
            products: RwLock::new(products),
            startup_notice,
        };
        ctx.apply_configured_credential().await?;
        Ok(ctx)
    }

    /// A credential from the environment replaces the stored one and turns
    /// sync on. Unchanged credentials are left alone.
    async fn apply_configured_credential(&self) -> AppResult<()> {
        let Some(credential) = self.config.sync.bootstrap_credential.clone() else {
            return Ok(());
        };
        if self.engine.settings().await.credential.as_deref() == Some(credential.trim()) {
            return Ok(());
        }

        info!("Applying sync credential from the environment");
        let change = self
            .engine
            .update_settings(SettingsUpdate {
                credential: Some(credential),
                enabled: Some(true),
                ..Default::default()
            })
            .await?;
        if let Some(Err(e)) = &change.push {
            warn!(error = %e, "Initial push failed");
        }
        Ok(())
    }

    pub fn config(&self) -> &GemstockConfig {
        &self.config
    }

    pub fn database(&self) -> &Database {
        &self.db
    }

    pub fn engine(&self) -> &SyncEngine<D> {
        &self.engine
    }

    /// Notice produced while opening, e.g. a reset of unreadable saved data.
    pub fn startup_notice(&self) -> Option<&SyncNotice> {
        self.startup_notice.as_ref()
    }

    /// Closes the database pool.
    pub async fn shutdown(&self) {
        self.db.close().await;
    }

    // =========================================================================
    // Mutation Pipeline
    // =========================================================================

    /// Applies `change` to a copy of the collection, saves it, swaps it in
    /// and pushes it.
    ///
    /// A failed change or save leaves memory and storage as they were.
    pub(crate) async fn mutate<T, F>(&self, change: F) -> AppResult<Saved<T>>
    where
        F: FnOnce(&mut Collection) -> CoreResult<T>,
    {
        let (value, saved) = {
            let mut products = self.products.write().await;
            let mut next = products.clone();
            let value = change(&mut next)?;
            self.store.save(&next).await?;
            *products = next;
            (value, products.clone())
        };

        let notice = self.push(&saved).await;
        Ok(Saved { value, notice })
    }

    /// Pushes if sync is on. Failures become a notice.
    async fn push(&self, collection: &Collection) -> Option<SyncNotice> {
        let result = self.engine.push(collection).await;
        if let Err(e) = &result {
            if !e.is_not_configured() {
                warn!(error = %e, "Push after save failed");
            }
        }
        SyncNotice::from_push_result(&result)
    }

    /// Reloads the in-memory collection from the Local Store.
    pub(crate) async fn reload(&self, products: &mut Collection) -> AppResult<()> {
        *products = self.store.load().await?;
        Ok(())
    }
}
