//! # Sync Operations
//!
//! Manual sync, settings and the launch-URL credential.
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  sync_now()                                                             │
//! │    lock collection ─► reconcile (push saved, pull) ─► reload from store │
//! │    mutations wait for the lock, so none lands between pull and reload  │
//! │                                                                         │
//! │  update_sync_settings(update)                                           │
//! │    persist ─► push when sync was just enabled                          │
//! │                                                                         │
//! │  apply_launch_url(url)                                                  │
//! │    ?token=… present ─► store credential, enable ─► stripped url         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use serde::Serialize;
use tracing::info;

use gemstock_sync::{
    bootstrap_credential, DocumentStore, MergeOutcome, PushOutcome, SettingsUpdate, SyncStatus,
};

use crate::error::AppResult;
use crate::state::{AppContext, Saved, SyncNotice};

/// What a manual sync did.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SyncRun {
    pub push: Option<PushOutcome>,
    pub pull: Option<MergeOutcome>,
    pub notices: Vec<SyncNotice>,
    pub product_count: usize,
}

impl<D: DocumentStore> AppContext<D> {
    pub async fn sync_status(&self) -> SyncStatus {
        self.engine.status().await
    }

    /// Push then pull, and show whatever the Local Store holds afterwards.
    ///
    /// Sync failures come back as notices; only a Local Store failure is an
    /// error.
    pub async fn sync_now(&self) -> AppResult<SyncRun> {
        let mut products = self.products.write().await;

        let report = self.engine.reconcile().await;
        let notices = SyncNotice::from_report(&report);
        self.reload(&mut products).await?;

        info!(
            count = products.len(),
            merged = report.merged(),
            failures = report.failures().count(),
            "Sync finished"
        );
        Ok(SyncRun {
            push: report.push.ok(),
            pull: report.pull.and_then(Result::ok),
            notices,
            product_count: products.len(),
        })
    }

    pub async fn update_sync_settings(&self, update: SettingsUpdate) -> AppResult<Saved<SyncStatus>> {
        let change = self.engine.update_settings(update).await?;
        let notice = change.push.as_ref().and_then(SyncNotice::from_push_result);
        Ok(Saved {
            value: self.engine.status().await,
            notice,
        })
    }

    /// Takes a credential from the launch URL, if it carries one.
    ///
    /// Returns the URL to show instead, with the credential removed.
    pub async fn apply_launch_url(&self, url: &str) -> AppResult<Option<Saved<String>>> {
        let Some(found) = bootstrap_credential(url, &self.config.sync.bootstrap_param)? else {
            return Ok(None);
        };

        let change = self
            .engine
            .update_settings(SettingsUpdate {
                credential: Some(found.credential),
                enabled: Some(true),
                ..Default::default()
            })
            .await?;

        Ok(Some(Saved {
            value: found.stripped_url,
            notice: change.push.as_ref().and_then(SyncNotice::from_push_result),
        }))
    }
}
