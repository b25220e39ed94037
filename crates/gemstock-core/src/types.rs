//! # Domain Types
//!
//! Core domain types used throughout Gemstock.
//!
//! ## Type Overview
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Domain Types                                    │
//! │                                                                         │
//! │  ┌───────────────────────┐   ┌─────────────────┐   ┌────────────────┐  │
//! │  │       Product         │   │  ProductStatus  │   │  PaymentType   │  │
//! │  │  ───────────────────  │   │  ─────────────  │   │  ────────────  │  │
//! │  │  id (merge key)       │   │  in-stock       │   │  cash          │  │
//! │  │  date, name, weight   │   │  sold           │   │  cashless      │  │
//! │  │  article, prices      │   └─────────────────┘   │  installment   │  │
//! │  │  sale / shipment /    │                         └────────────────┘  │
//! │  │  return sub-records   │   ┌─────────────────┐                       │
//! │  └───────────────────────┘   │  SyncSettings   │                       │
//! │                              │  credential     │                       │
//! │  ┌───────────────────────┐   │  document id    │                       │
//! │  │    ProductDraft       │   │  enabled        │                       │
//! │  │  (form input)         │   └─────────────────┘                       │
//! │  └───────────────────────┘                                             │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Defaults at the Boundary
//! Every optional field gets its default exactly once, while deserializing.
//! Records written by older versions of the tracker (missing `date`, empty
//! `saleDate`, no return fields at all) come out of serde fully populated,
//! and nothing downstream has to second-guess a field.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;
use ts_rs::TS;

use crate::money::Money;

// =============================================================================
// Product Status
// =============================================================================

/// Whether the item is still on the shelf.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "kebab-case")]
pub enum ProductStatus {
    /// On hand, available for sale.
    #[default]
    InStock,
    /// Sold (possibly returned later; see `Product::is_return`).
    Sold,
}

impl fmt::Display for ProductStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ProductStatus::InStock => write!(f, "in-stock"),
            ProductStatus::Sold => write!(f, "sold"),
        }
    }
}

// =============================================================================
// Payment Type
// =============================================================================

/// How a sold item was paid for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "lowercase")]
pub enum PaymentType {
    /// Physical cash.
    #[default]
    Cash,
    /// Card or bank transfer.
    Cashless,
    /// Paid in installments.
    Installment,
}

// =============================================================================
// Product
// =============================================================================

/// A single stock record: the unit of replication.
///
/// JSON keys follow the files the tracker has always written (`date`,
/// `weight`, `article`); the descriptive spellings are accepted as aliases.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    /// Opaque client-assigned id. Immutable; the merge key.
    ///
    /// Required here. Collections and import files fill in missing ids
    /// before records reach this type (see `id::fill_missing_ids`).
    pub id: String,

    /// Date the item was acquired.
    #[serde(
        rename = "date",
        alias = "acquisitionDate",
        default = "today",
        deserialize_with = "date_or_today"
    )]
    #[ts(as = "String")]
    pub acquisition_date: NaiveDate,

    /// Display name.
    pub name: String,

    /// Weight in grams.
    #[serde(rename = "weight", alias = "weightGrams", default)]
    pub weight_grams: f64,

    /// Article (catalogue) code.
    #[serde(rename = "article", alias = "articleCode", default)]
    pub article_code: String,

    /// What the shop paid.
    #[serde(default)]
    #[ts(type = "number")]
    pub purchase_price: Money,

    /// Asking / realized price.
    #[serde(default)]
    #[ts(type = "number")]
    pub selling_price: Money,

    /// Shelf status.
    #[serde(default)]
    pub status: ProductStatus,

    /// Only meaningful when `status` is `Sold`.
    #[serde(default)]
    pub payment_type: Option<PaymentType>,

    /// Set when the item transitions to `Sold`.
    #[serde(default, deserialize_with = "optional_date")]
    #[ts(as = "Option<String>")]
    pub sale_date: Option<NaiveDate>,

    /// Who recorded the sale.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sold_by: Option<String>,

    /// When the sale was recorded.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[ts(as = "Option<String>")]
    pub sold_at: Option<DateTime<Utc>>,

    /// Date the item was shipped to the buyer.
    #[serde(default, deserialize_with = "optional_date")]
    #[ts(as = "Option<String>")]
    pub shipment_date: Option<NaiveDate>,

    /// Shipping cost.
    #[serde(default)]
    #[ts(type = "number | null")]
    pub shipment_amount: Option<Money>,

    /// Costs that reduce realized profit (cleaning, sizing, commission).
    #[serde(default)]
    #[ts(type = "number")]
    pub expenses: Money,

    /// The sale was reversed by a customer return. Sold history is kept.
    #[serde(default)]
    pub is_return: bool,

    /// Date of the return.
    #[serde(default, deserialize_with = "optional_date")]
    #[ts(as = "Option<String>")]
    pub return_date: Option<NaiveDate>,

    /// Amount refunded to the customer.
    #[serde(default)]
    #[ts(type = "number | null")]
    pub return_amount: Option<Money>,
}

impl Product {
    /// Returns true when the item is sold and the sale still stands.
    #[inline]
    pub fn is_sold(&self) -> bool {
        self.status == ProductStatus::Sold
    }

    /// Margin between selling and purchase price, before expenses.
    #[inline]
    pub fn gross_margin(&self) -> Money {
        self.selling_price - self.purchase_price
    }

    /// Profit the sale actually realized.
    ///
    /// Zero for unsold and returned items.
    pub fn realized_profit(&self) -> Money {
        if self.is_sold() && !self.is_return {
            self.gross_margin() - self.expenses
        } else {
            Money::zero()
        }
    }
}

// =============================================================================
// Product Draft
// =============================================================================

/// Form input for creating or fully editing a product.
///
/// Carries no id: `add` assigns one, `edit` keeps the existing one.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct ProductDraft {
    #[serde(rename = "date", alias = "acquisitionDate")]
    #[ts(as = "String")]
    pub acquisition_date: NaiveDate,
    pub name: String,
    #[serde(rename = "weight", alias = "weightGrams")]
    pub weight_grams: f64,
    #[serde(rename = "article", alias = "articleCode")]
    pub article_code: String,
    #[ts(type = "number")]
    pub purchase_price: Money,
    #[ts(type = "number")]
    pub selling_price: Money,
    #[serde(default)]
    pub status: ProductStatus,
    #[serde(default)]
    pub payment_type: Option<PaymentType>,
    #[serde(default, deserialize_with = "optional_date")]
    #[ts(as = "Option<String>")]
    pub sale_date: Option<NaiveDate>,
    #[serde(default)]
    #[ts(type = "number")]
    pub expenses: Money,
}

// =============================================================================
// Sync Settings
// =============================================================================

/// Persisted sync configuration.
///
/// Lives in the Local Store, never in the TOML config file, and changes only
/// through the sync engine's settings update.
#[derive(Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SyncSettings {
    /// Bearer secret for the remote document service.
    pub credential: Option<String>,
    /// Id of the remote document mirroring the collection.
    pub remote_document_id: Option<String>,
    /// Whether mutations push automatically.
    pub enabled: bool,
}

impl SyncSettings {
    /// Sync is on and there is something to authenticate with.
    pub fn can_push(&self) -> bool {
        self.enabled && self.has_credential()
    }

    /// There is a credential and a document to read from.
    pub fn can_pull(&self) -> bool {
        self.has_credential() && self.remote_document_id.is_some()
    }

    /// Blank credentials count as absent.
    pub fn has_credential(&self) -> bool {
        self.credential
            .as_deref()
            .map(|c| !c.trim().is_empty())
            .unwrap_or(false)
    }
}

/// The credential is redacted so settings can be logged.
impl fmt::Debug for SyncSettings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SyncSettings")
            .field("credential", &self.credential.as_ref().map(|_| "<redacted>"))
            .field("remote_document_id", &self.remote_document_id)
            .field("enabled", &self.enabled)
            .finish()
    }
}

// =============================================================================
// Date Helpers
// =============================================================================

/// Today's date in UTC.
pub fn today() -> NaiveDate {
    Utc::now().date_naive()
}

/// Parses the date forms found in stored records: `YYYY-MM-DD`, or a full
/// ISO timestamp of which only the date part is kept.
pub fn parse_record_date(raw: &str) -> Option<NaiveDate> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }
    let date_part = raw.get(..10).unwrap_or(raw);
    NaiveDate::parse_from_str(date_part, "%Y-%m-%d").ok()
}

/// `null`, missing and `""` all mean "no date".
fn optional_date<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<NaiveDate>, D::Error> {
    let raw: Option<String> = Option::deserialize(deserializer)?;
    match raw.as_deref().map(str::trim) {
        None | Some("") => Ok(None),
        Some(value) => parse_record_date(value)
            .map(Some)
            .ok_or_else(|| serde::de::Error::custom(format!("invalid date: {:?}", value))),
    }
}

/// Acquisition date, falling back to today for blank values.
fn date_or_today<'de, D: Deserializer<'de>>(deserializer: D) -> Result<NaiveDate, D::Error> {
    Ok(optional_date(deserializer)?.unwrap_or_else(today))
}

// =============================================================================
// Unit Tests
// =============================================================================
