//! # Bulk Import / Export
//!
//! ```text
//! export() ──► { fileName: "jewelry_inventory_2024-05-01.json", content }
//!
//! import(text, mode)
//!   parse ── not JSON / not an array / empty ──► ImportRejected, nothing changed
//!     │
//!     ▼
//!   replace or append ──► save ──► push (if enabled)
//! ```

use serde::Serialize;
use tracing::info;
use ts_rs::TS;

use gemstock_core::transfer::{apply_import, export_file_name, export_json, parse_import};
use gemstock_core::{today, CoreError, ImportMode};
use gemstock_sync::DocumentStore;

use crate::error::AppResult;
use crate::state::{AppContext, Saved};

/// A ready-to-download export.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct ExportFile {
    pub file_name: String,
    pub content: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct ImportSummary {
    pub imported: usize,
    pub total: usize,
}

impl<D: DocumentStore> AppContext<D> {
    pub async fn export(&self) -> AppResult<ExportFile> {
        let products = self.products.read().await;
        let content = export_json(&products)?;
        let file_name = export_file_name(today());
        info!(count = products.len(), file = %file_name, "Exported collection");
        Ok(ExportFile { file_name, content })
    }

    /// Reads an export file and merges it in per `mode`.
    pub async fn import(&self, text: &str, mode: ImportMode) -> AppResult<Saved<ImportSummary>> {
        let imported = parse_import(text).map_err(CoreError::from)?;
        let count = imported.len();

        let saved = self
            .mutate(move |products| {
                let current = std::mem::take(products);
                *products = apply_import(current, imported, mode);
                Ok(ImportSummary {
                    imported: count,
                    total: products.len(),
                })
            })
            .await?;

        info!(imported = count, total = saved.value.total, ?mode, "Imported products");
        Ok(saved)
    }
}
