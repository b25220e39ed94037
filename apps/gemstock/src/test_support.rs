//! Fixtures shared by the operation tests.

use async_trait::async_trait;
use chrono::NaiveDate;
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Mutex;
use tempfile::TempDir;

use gemstock_core::{Money, ProductDraft, ProductStatus, SyncSettings};
use gemstock_db::{Database, DbConfig};
use gemstock_sync::{DocumentStore, GemstockConfig, RemoteDocument, SyncError, SyncResult};

use crate::state::AppContext;

pub const TOKEN: &str = "test-token";

/// In-memory document service that can be taken offline.
#[derive(Default)]
pub struct FakeRemote {
    docs: Mutex<HashMap<String, String>>,
    writes: AtomicUsize,
    offline: AtomicBool,
}

impl FakeRemote {
    pub fn seed(&self, id: &str, content: &str) {
        self.docs.lock().unwrap().insert(id.to_string(), content.to_string());
    }

    pub fn writes(&self) -> usize {
        self.writes.load(Ordering::SeqCst)
    }

    pub fn go_offline(&self) {
        self.offline.store(true, Ordering::SeqCst);
    }

    fn reachable(&self, credential: &str) -> SyncResult<()> {
        if self.offline.load(Ordering::SeqCst) {
            return Err(SyncError::Transport("connection refused".into()));
        }
        if credential != TOKEN {
            return Err(SyncError::RemoteError { status: 401, message: "Bad credentials".into() });
        }
        Ok(())
    }
}

#[async_trait]
impl DocumentStore for FakeRemote {
    async fn create(&self, credential: &str, content: &str) -> SyncResult<String> {
        self.reachable(credential)?;
        self.writes.fetch_add(1, Ordering::SeqCst);
        let mut docs = self.docs.lock().unwrap();
        let id = format!("gist-{}", docs.len() + 1);
        docs.insert(id.clone(), content.to_string());
        Ok(id)
    }

    async fn get(&self, credential: &str, document_id: &str) -> SyncResult<RemoteDocument> {
        self.reachable(credential)?;
        match self.docs.lock().unwrap().get(document_id) {
            Some(content) => Ok(RemoteDocument { id: document_id.to_string(), content: Some(content.clone()) }),
            None => Err(SyncError::RemoteError { status: 404, message: "Not Found".into() }),
        }
    }

    async fn replace(&self, credential: &str, document_id: &str, content: &str) -> SyncResult<()> {
        self.reachable(credential)?;
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

pub fn draft(name: &str, article: &str) -> ProductDraft {
    ProductDraft {
        acquisition_date: NaiveDate::from_ymd_opt(2024, 1, 15).unwrap(),
        name: name.to_string(),
        weight_grams: 3.5,
        article_code: article.to_string(),
        purchase_price: Money::from_cents(10_000),
        selling_price: Money::from_cents(25_000),
        status: ProductStatus::InStock,
        payment_type: None,
        sale_date: None,
        expenses: Money::zero(),
    }
}

async fn open(remote: FakeRemote, settings: Option<SyncSettings>) -> (AppContext<FakeRemote>, TempDir) {
    let dir = TempDir::new().unwrap();
    let db = Database::new(DbConfig::new(dir.path().join("gemstock.db"))).await.unwrap();
    if let Some(settings) = settings {
        db.local_store().save_settings(&settings).await.unwrap();
    }
    let ctx = AppContext::open(GemstockConfig::default(), db, remote).await.unwrap();
    (ctx, dir)
}

/// Context with sync off.
pub async fn context(remote: FakeRemote) -> (AppContext<FakeRemote>, TempDir) {
    open(remote, None).await
}

/// Context with a valid credential and sync on, no remote document yet.
pub async fn syncing_context(remote: FakeRemote) -> (AppContext<FakeRemote>, TempDir) {
    let settings = SyncSettings {
        credential: Some(TOKEN.to_string()),
        remote_document_id: None,
        enabled: true,
    };
    open(remote, Some(settings)).await
}
