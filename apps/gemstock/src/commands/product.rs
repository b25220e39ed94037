//! # Product Operations
//!
//! Stock-record lifecycle as the UI drives it.
//!
//! ## Lifecycle
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                                                                         │
//! │   add_product ──► in-stock ──mark_sold──► sold ──mark_returned──► sold  │
//! │                      ▲                     │                  + return  │
//! │                      └────revert_sale──────┘                     │      │
//! │                                            ▲                     │      │
//! │                                            └───revert_return─────┘      │
//! │                                                                         │
//! │   edit_product / record_shipment / set_expenses: any status             │
//! │   delete_product: any status                                            │
//! │                                                                         │
//! │   Each one: save to Local Store, then push if sync is enabled.         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use chrono::{NaiveDate, Utc};
use tracing::{debug, info};

use gemstock_core::stats::filter;
use gemstock_core::{
    today, Collection, Money, Product, ProductDraft, ReturnDetails, SaleDetails, StatusFilter,
};
use gemstock_sync::DocumentStore;

use crate::error::AppResult;
use crate::state::{AppContext, Saved};

impl<D: DocumentStore> AppContext<D> {
    /// The whole collection, in stored order.
    pub async fn products(&self) -> Collection {
        self.products.read().await.clone()
    }

    pub async fn product(&self, id: &str) -> Option<Product> {
        self.products.read().await.find(id).cloned()
    }

    /// Table rows matching `term` (name or article) and `status`.
    pub async fn search(&self, term: &str, status: StatusFilter) -> Vec<Product> {
        let products = self.products.read().await;
        let rows: Vec<Product> = filter(products.iter(), term, status).into_iter().cloned().collect();
        debug!(term, ?status, matches = rows.len(), "Filtered products");
        rows
    }

    pub async fn add_product(&self, draft: ProductDraft) -> AppResult<Saved<Product>> {
        let saved = self.mutate(|c| c.add(draft, today()).cloned()).await?;
        info!(id = %saved.value.id, "Product added");
        Ok(saved)
    }

    pub async fn edit_product(&self, id: &str, draft: ProductDraft) -> AppResult<Saved<Product>> {
        let saved = self.mutate(|c| c.edit(id, draft, today()).cloned()).await?;
        info!(id, "Product updated");
        Ok(saved)
    }

    pub async fn delete_product(&self, id: &str) -> AppResult<Saved<()>> {
        let saved = self.mutate(|c| c.delete(id)).await?;
        info!(id, "Product deleted");
        Ok(saved)
    }

    pub async fn mark_sold(&self, id: &str, sale: SaleDetails) -> AppResult<Saved<Product>> {
        let saved = self.mutate(|c| c.mark_sold(id, sale, Utc::now()).cloned()).await?;
        info!(id, payment = ?saved.value.payment_type, "Product sold");
        Ok(saved)
    }

    pub async fn revert_sale(&self, id: &str) -> AppResult<Saved<Product>> {
        let saved = self.mutate(|c| c.revert_sale(id).cloned()).await?;
        info!(id, "Sale reverted");
        Ok(saved)
    }

    pub async fn mark_returned(&self, id: &str, details: ReturnDetails) -> AppResult<Saved<Product>> {
        let saved = self.mutate(|c| c.mark_returned(id, details, today()).cloned()).await?;
        info!(id, "Product returned");
        Ok(saved)
    }

    pub async fn revert_return(&self, id: &str) -> AppResult<Saved<Product>> {
        let saved = self.mutate(|c| c.revert_return(id).cloned()).await?;
        info!(id, "Return reverted");
        Ok(saved)
    }

    /// Sets or clears (with `date = None`) the shipment of a record.
    pub async fn record_shipment(
        &self,
        id: &str,
        date: Option<NaiveDate>,
        amount: Option<Money>,
    ) -> AppResult<Saved<Product>> {
        self.mutate(|c| c.record_shipment(id, date, amount).cloned()).await
    }

    pub async fn set_expenses(&self, id: &str, amount: Money) -> AppResult<Saved<Product>> {
        self.mutate(|c| c.set_expenses(id, amount).cloned()).await
    }
}
