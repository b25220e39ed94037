//! # Collection
//!
//! The ordered set of product records for one device, plus the lifecycle
//! operations the UI drives.
//!
//! ## Product Lifecycle
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                                                                         │
//! │   add ──► IN-STOCK ──── mark_sold ────► SOLD ──── mark_returned ──┐    │
//! │              ▲    ◄──── revert_sale ───  │ ▲                      │    │
//! │              │                           │ └──── revert_return ───┘    │
//! │              │                           │       (SOLD + isReturn)     │
//! │   edit: full-field replacement, id kept, any state                     │
//! │   delete: gone for good (no tombstone)                                 │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Order and Identity
//! Insertion order is display order. The merge ignores order and keys on
//! `id`; when a naive concatenation produced duplicates, id lookups resolve
//! to the LAST record carrying that id.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use std::collections::HashSet;
use std::ops::Deref;

use crate::error::{CoreError, CoreResult};
use crate::id::{fill_missing_ids, generate_product_id};
use crate::money::Money;
use crate::types::{PaymentType, Product, ProductDraft, ProductStatus};
use crate::validation::{validate_amount, validate_date_order, validate_draft};

// =============================================================================
// Collection
// =============================================================================

/// Ordered sequence of product records. Serializes as a bare JSON array.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct Collection(Vec<Product>);

impl Collection {
    /// Creates an empty collection.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set of ids present.
    pub fn ids(&self) -> HashSet<&str> {
        self.0.iter().map(|p| p.id.as_str()).collect()
    }

    /// Looks up a product by id (last duplicate wins).
    pub fn find(&self, id: &str) -> Option<&Product> {
        self.0.iter().rev().find(|p| p.id == id)
    }

    /// Mutable lookup by id (last duplicate wins).
    pub fn find_mut(&mut self, id: &str) -> Option<&mut Product> {
        self.0.iter_mut().rev().find(|p| p.id == id)
    }

    fn require(&mut self, id: &str) -> CoreResult<&mut Product> {
        self.find_mut(id)
            .ok_or_else(|| CoreError::ProductNotFound(id.to_string()))
    }

    /// Appends a record as-is (sync and import paths; no validation).
    pub fn push(&mut self, product: Product) {
        self.0.push(product);
    }

    /// Appends every record of `other`, keeping both orders.
    pub fn extend(&mut self, other: Collection) {
        self.0.extend(other.0);
    }

    // =========================================================================
    // Lifecycle Operations
    // =========================================================================

    /// Creates a product from a validated draft.
    ///
    /// A fresh id is assigned. A draft marked `sold` gets the same sale
    /// defaults as `mark_sold` (payment `cash`, sale date `today`).
    pub fn add(&mut self, draft: ProductDraft, today: NaiveDate) -> CoreResult<&Product> {
        validate_draft(&draft)?;

        let mut product = Product {
            id: generate_product_id(),
            acquisition_date: draft.acquisition_date,
            name: String::new(),
            weight_grams: 0.0,
            article_code: String::new(),
            purchase_price: Money::zero(),
            selling_price: Money::zero(),
            status: ProductStatus::InStock,
            payment_type: None,
            sale_date: None,
            sold_by: None,
            sold_at: None,
            shipment_date: None,
            shipment_amount: None,
            expenses: Money::zero(),
            is_return: false,
            return_date: None,
            return_amount: None,
        };
        apply_draft(&mut product, draft, today);

        self.0.push(product);
        let last = self.0.len() - 1;
        Ok(&self.0[last])
    }

    /// Replaces every editable field of a product, keeping its id.
    ///
    /// Editing an item back to `in-stock` drops its sale and return data.
    pub fn edit(&mut self, id: &str, draft: ProductDraft, today: NaiveDate) -> CoreResult<&Product> {
        validate_draft(&draft)?;
        let product = self.require(id)?;
        apply_draft(product, draft, today);
        Ok(product)
    }

    /// Removes every record with this id.
    pub fn delete(&mut self, id: &str) -> CoreResult<()> {
        let before = self.0.len();
        self.0.retain(|p| p.id != id);
        if self.0.len() == before {
            return Err(CoreError::ProductNotFound(id.to_string()));
        }
        Ok(())
    }

    /// Marks an in-stock item as sold.
    ///
    /// An existing sale date / payment type (left behind by an edit) is
    /// kept; otherwise `cash` and the date of `now` are used.
    pub fn mark_sold(&mut self, id: &str, sale: SaleDetails, now: DateTime<Utc>) -> CoreResult<&Product> {
        let product = self.require(id)?;
        if product.is_sold() {
            return Err(transition(product, "sell"));
        }

        let sale_date = sale
            .sale_date
            .or(product.sale_date)
            .unwrap_or_else(|| now.date_naive());
        validate_date_order("saleDate", sale_date, "date", product.acquisition_date)?;

        product.status = ProductStatus::Sold;
        product.sale_date = Some(sale_date);
        product.payment_type = Some(
            sale.payment_type
                .or(product.payment_type)
                .unwrap_or_default(),
        );
        product.sold_by = sale.sold_by;
        product.sold_at = Some(now);
        Ok(product)
    }

    /// Puts a sold item back in stock, erasing the sale.
    pub fn revert_sale(&mut self, id: &str) -> CoreResult<&Product> {
        let product = self.require(id)?;
        if !product.is_sold() {
            return Err(transition(product, "revert the sale of"));
        }
        clear_sale(product);
        Ok(product)
    }

    /// Records a customer return on a sold item. Sold history is kept.
    ///
    /// The refund defaults to the selling price, the date to `today`.
    pub fn mark_returned(&mut self, id: &str, details: ReturnDetails, today: NaiveDate) -> CoreResult<&Product> {
        let product = self.require(id)?;
        if !product.is_sold() || product.is_return {
            return Err(transition(product, "return"));
        }

        let return_date = details.return_date.unwrap_or(today);
        if let Some(sale_date) = product.sale_date {
            validate_date_order("returnDate", return_date, "saleDate", sale_date)?;
        }
        let return_amount = details.return_amount.unwrap_or(product.selling_price);
        validate_amount("returnAmount", return_amount)?;

        product.is_return = true;
        product.return_date = Some(return_date);
        product.return_amount = Some(return_amount);
        Ok(product)
    }

    /// Cancels a recorded return; the item counts as sold again.
    pub fn revert_return(&mut self, id: &str) -> CoreResult<&Product> {
        let product = self.require(id)?;
        if !product.is_return {
            return Err(transition(product, "revert the return of"));
        }
        clear_return(product);
        Ok(product)
    }

    /// Sets shipment logistics. Passing `None` for the date clears both fields.
    pub fn record_shipment(
        &mut self,
        id: &str,
        date: Option<NaiveDate>,
        amount: Option<Money>,
    ) -> CoreResult<&Product> {
        if let Some(amount) = amount {
            validate_amount("shipmentAmount", amount)?;
        }
        let product = self.require(id)?;
        product.shipment_date = date;
        product.shipment_amount = date.and(amount);
        Ok(product)
    }

    /// Replaces the expenses booked against a product.
    pub fn set_expenses(&mut self, id: &str, amount: Money) -> CoreResult<&Product> {
        validate_amount("expenses", amount)?;
        let product = self.require(id)?;
        product.expenses = amount;
        Ok(product)
    }
}

// =============================================================================
// Operation Inputs
// =============================================================================

/// Optional details supplied when marking an item sold.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SaleDetails {
    #[serde(default)]
    pub payment_type: Option<PaymentType>,
    #[serde(default)]
    pub sale_date: Option<NaiveDate>,
    #[serde(default)]
    pub sold_by: Option<String>,
}

/// Optional details supplied when recording a return.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReturnDetails {
    #[serde(default)]
    pub return_date: Option<NaiveDate>,
    #[serde(default)]
    pub return_amount: Option<Money>,
}

// =============================================================================
// Helpers
// =============================================================================

fn apply_draft(product: &mut Product, draft: ProductDraft, today: NaiveDate) {
    product.acquisition_date = draft.acquisition_date;
    product.name = draft.name.trim().to_string();
    product.weight_grams = draft.weight_grams;
    product.article_code = draft.article_code.trim().to_string();
    product.purchase_price = draft.purchase_price;
    product.selling_price = draft.selling_price;
    product.expenses = draft.expenses;

    match draft.status {
        ProductStatus::Sold => {
            product.status = ProductStatus::Sold;
            product.payment_type = Some(
                draft
                    .payment_type
                    .or(product.payment_type)
                    .unwrap_or_default(),
            );
            product.sale_date = Some(draft.sale_date.or(product.sale_date).unwrap_or(today));
        }
        ProductStatus::InStock => clear_sale(product),
    }
}

fn clear_sale(product: &mut Product) {
    product.status = ProductStatus::InStock;
    product.payment_type = None;
    product.sale_date = None;
    product.sold_by = None;
    product.sold_at = None;
    clear_return(product);
}

fn clear_return(product: &mut Product) {
    product.is_return = false;
    product.return_date = None;
    product.return_amount = None;
}

fn transition(product: &Product, action: &'static str) -> CoreError {
    CoreError::InvalidTransition {
        id: product.id.clone(),
        action,
        status: product.status,
    }
}

// =============================================================================
// Trait Implementations
// =============================================================================

impl<'de> Deserialize<'de> for Collection {
    /// Reads a JSON array of records, filling missing ids from content.
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let mut records = Vec::<Value>::deserialize(deserializer)?;
        fill_missing_ids(&mut records);
        records
            .into_iter()
            .map(|record| serde_json::from_value::<Product>(record).map_err(serde::de::Error::custom))
            .collect()
    }
}

impl Deref for Collection {
    type Target = [Product];

    fn deref(&self) -> &[Product] {
        &self.0
    }
}

impl From<Vec<Product>> for Collection {
    fn from(products: Vec<Product>) -> Self {
        Collection(products)
    }
}

impl FromIterator<Product> for Collection {
    fn from_iter<I: IntoIterator<Item = Product>>(iter: I) -> Self {
        Collection(iter.into_iter().collect())
    }
}

impl IntoIterator for Collection {
    type Item = Product;
    type IntoIter = std::vec::IntoIter<Product>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

impl<'a> IntoIterator for &'a Collection {
    type Item = &'a Product;
    type IntoIter = std::slice::Iter<'a, Product>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
