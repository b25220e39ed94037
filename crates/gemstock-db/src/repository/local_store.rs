//! # Local Store Repository
//!
//! Durable key-value slots holding the collection snapshot and the sync
//! settings.
//!
//! ## Slots
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  kv_slots                                                               │
//! │  ─────────────────────────────────────────────────────────────────────  │
//! │  jewelryProducts   [ {...}, {...} ]     full collection, one JSON array │
//! │  syncToken         ghp_...              credential (absent = none)      │
//! │  syncDocumentId    4f1c...              remote document id              │
//! │  syncEnabled       true | false         auto-push flag                  │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Atomicity
//! `save` is one upsert statement: a later `load` sees the old snapshot or
//! the new one, never a torn write. `save_settings` writes its three slots
//! in one transaction.

use chrono::Utc;
use sqlx::{Sqlite, SqlitePool};
use tracing::{debug, error};

use crate::error::{DbError, DbResult};
use gemstock_core::{Collection, SyncSettings};

/// Slot names. Kept identical to the keys earlier versions of the tracker
/// wrote, so existing data keeps loading.
pub mod keys {
    pub const PRODUCTS: &str = "jewelryProducts";
    pub const SYNC_TOKEN: &str = "syncToken";
    pub const SYNC_DOCUMENT_ID: &str = "syncDocumentId";
    pub const SYNC_ENABLED: &str = "syncEnabled";
}

/// Repository for the key-value slots.
#[derive(Debug, Clone)]
pub struct LocalStore {
    pool: SqlitePool,
}

impl LocalStore {
    /// Creates a new LocalStore.
    pub fn new(pool: SqlitePool) -> Self {
        LocalStore { pool }
    }

    // =========================================================================
    // Collection Snapshot
    // =========================================================================

    /// Loads the last saved collection.
    ///
    /// A missing slot is an empty collection. So is an unparseable one: the
    /// corruption is logged and the slot left as it is until the next save
    /// overwrites it. Only a database failure comes back as `Err`.
    pub async fn load(&self) -> DbResult<Collection> {
        match self.load_strict().await {
            Err(DbError::CorruptSnapshot(reason)) => {
                error!(%reason, "CorruptLocal: saved collection is unreadable, starting empty");
                Ok(Collection::new())
            }
            other => other,
        }
    }

    /// Like `load`, but reports an unreadable snapshot as
    /// `DbError::CorruptSnapshot` instead of hiding it.
    pub async fn load_strict(&self) -> DbResult<Collection> {
        let Some(raw) = self.get(keys::PRODUCTS).await? else {
            debug!("No saved collection, starting empty");
            return Ok(Collection::new());
        };

        let collection = serde_json::from_str::<Collection>(&raw)
            .map_err(|e| DbError::CorruptSnapshot(e.to_string()))?;
        debug!(count = collection.len(), "Loaded collection");
        Ok(collection)
    }

    /// Replaces the saved collection.
    pub async fn save(&self, collection: &Collection) -> DbResult<()> {
        let raw = serde_json::to_string(collection)?;
        self.put(keys::PRODUCTS, &raw).await?;
        debug!(count = collection.len(), "Saved collection");
        Ok(())
    }

    // =========================================================================
    // Sync Settings
    // =========================================================================

    /// Loads the sync settings. Missing slots read as "not configured".
    pub async fn load_settings(&self) -> DbResult<SyncSettings> {
        let credential = self
            .get(keys::SYNC_TOKEN)
            .await?
            .filter(|c| !c.trim().is_empty());
        let remote_document_id = self
            .get(keys::SYNC_DOCUMENT_ID)
            .await?
            .filter(|id| !id.trim().is_empty());
        let enabled = self.get(keys::SYNC_ENABLED).await?.as_deref() == Some("true");

        Ok(SyncSettings {
            credential,
            remote_document_id,
            enabled,
        })
    }

    /// Persists all three settings slots in one transaction.
    ///
    /// `None` removes the slot.
    pub async fn save_settings(&self, settings: &SyncSettings) -> DbResult<()> {
        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(|e| DbError::TransactionFailed(e.to_string()))?;

        write_slot(&mut *tx, keys::SYNC_TOKEN, settings.credential.as_deref()).await?;
        write_slot(
            &mut *tx,
            keys::SYNC_DOCUMENT_ID,
            settings.remote_document_id.as_deref(),
        )
        .await?;
        let enabled = if settings.enabled { "true" } else { "false" };
        write_slot(&mut *tx, keys::SYNC_ENABLED, Some(enabled)).await?;

        tx.commit()
            .await
            .map_err(|e| DbError::TransactionFailed(e.to_string()))?;

        debug!(?settings, "Saved sync settings");
        Ok(())
    }

    // =========================================================================
    // Raw Slots
    // =========================================================================

    /// Reads a slot.
    pub async fn get(&self, key: &str) -> DbResult<Option<String>> {
        let value: Option<String> = sqlx::query_scalar("SELECT value FROM kv_slots WHERE key = ?1")
            .bind(key)
            .fetch_optional(&self.pool)
            .await?;
        Ok(value)
    }

    /// Writes a slot, replacing any previous value.
    pub async fn put(&self, key: &str, value: &str) -> DbResult<()> {
        write_slot(&self.pool, key, Some(value)).await
    }
}

async fn write_slot<'e, E>(executor: E, key: &str, value: Option<&str>) -> DbResult<()>
where
    E: sqlx::Executor<'e, Database = Sqlite>,
{
    match value {
        Some(value) => {
            sqlx::query(
                r#"
                INSERT INTO kv_slots (key, value, updated_at)
                VALUES (?1, ?2, ?3)
                ON CONFLICT(key) DO UPDATE SET
                    value = excluded.value,
                    updated_at = excluded.updated_at
                "#,
            )
            .bind(key)
            .bind(value)
            .bind(Utc::now().to_rfc3339())
            .execute(executor)
            .await?;
        }
        None => {
            sqlx::query("DELETE FROM kv_slots WHERE key = ?1")
                .bind(key)
                .execute(executor)
                .await?;
        }
    }
    Ok(())
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pool::{Database, DbConfig};

    async fn store() -> LocalStore {
        Database::new(DbConfig::in_memory())
            .await
            .unwrap()
            .local_store()
    }

    fn sample() -> Collection {
        serde_json::from_str(
            r#"[
                {"id": "a", "date": "2024-05-01", "name": "Ring", "weight": 2, "article": "R1",
                 "purchasePrice": 100, "sellingPrice": 150.5},
                {"id": "b", "date": "2024-05-02", "name": "Chain", "weight": 7, "article": "C1",
                 "purchasePrice": 300, "sellingPrice": 420, "status": "sold",
                 "paymentType": "cash", "saleDate": "2024-05-10"}
            ]"#,
        )
        .unwrap()
    }

    #[tokio::test]
    async fn test_missing_slot_loads_empty() {
        let store = store().await;
        assert!(store.load().await.unwrap().is_empty());
        assert_eq!(store.get(keys::PRODUCTS).await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_save_then_load() {
        let store = store().await;
        let collection = sample();
        store.save(&collection).await.unwrap();

        assert_eq!(store.load().await.unwrap(), collection);
    }

    #[tokio::test]
    async fn test_save_replaces_previous_snapshot() {
        let store = store().await;
        store.save(&sample()).await.unwrap();
        store.save(&Collection::new()).await.unwrap();
        assert!(store.load().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_corrupt_slot_loads_empty() {
        let store = store().await;
        store.put(keys::PRODUCTS, "{ this is not json").await.unwrap();
        assert!(store.load().await.unwrap().is_empty());

        store.put(keys::PRODUCTS, r#"{"id": "a"}"#).await.unwrap();
        assert!(store.load().await.unwrap().is_empty());
        assert!(matches!(
            store.load_strict().await,
            Err(DbError::CorruptSnapshot(_))
        ));

        // The next save heals the slot.
        store.save(&sample()).await.unwrap();
        assert_eq!(store.load_strict().await.unwrap().len(), 2);
    }

    #[tokio::test]
    async fn test_legacy_snapshot_loads_with_defaults() {
        let store = store().await;
        store
            .put(
                keys::PRODUCTS,
                r#"[{"id": "x", "name": "Old", "date": "", "purchasePrice": "99.9", "saleDate": ""}]"#,
            )
            .await
            .unwrap();

        let loaded = store.load().await.unwrap();
        let p = loaded.find("x").unwrap();
        assert_eq!(p.purchase_price.cents(), 9990);
        assert_eq!(p.sale_date, None);
    }

    #[tokio::test]
    async fn test_settings_default_when_missing() {
        let store = store().await;
        assert_eq!(store.load_settings().await.unwrap(), SyncSettings::default());
    }

    #[tokio::test]
    async fn test_settings_round_trip_and_clear() {
        let store = store().await;
        let settings = SyncSettings {
            credential: Some("ghp_token".into()),
            remote_document_id: Some("doc-1".into()),
            enabled: true,
        };
        store.save_settings(&settings).await.unwrap();
        assert_eq!(store.load_settings().await.unwrap(), settings);
        assert_eq!(store.get(keys::SYNC_ENABLED).await.unwrap().as_deref(), Some("true"));

        let cleared = SyncSettings {
            remote_document_id: None,
            enabled: false,
            ..settings
        };
        store.save_settings(&cleared).await.unwrap();
        assert_eq!(store.load_settings().await.unwrap(), cleared);
        assert_eq!(store.get(keys::SYNC_DOCUMENT_ID).await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_raw_slots() {
        let store = store().await;
        store.put("k", "v1").await.unwrap();
        store.put("k", "v2").await.unwrap();
        assert_eq!(store.get("k").await.unwrap().as_deref(), Some("v2"));
        assert_eq!(store.get("missing").await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_settings_do_not_touch_collection() {
        let store = store().await;
        store.save(&sample()).await.unwrap();
        store.save_settings(&SyncSettings::default()).await.unwrap();
        assert_eq!(store.load().await.unwrap().len(), 2);
    }
}
