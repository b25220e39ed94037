//! # Statistics
//!
//! Aggregates over a collection for the dashboard cards and charts.
//! Everything here is a pure function of the snapshot; drawing is the UI's
//! business.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use ts_rs::TS;

use crate::money::Money;
use crate::types::{PaymentType, Product, ProductStatus};

/// Length at which chart labels are cut.
pub const TOP_NAME_LEN: usize = 20;

// =============================================================================
// Summary Cards
// =============================================================================

/// Headline numbers for the dashboard.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct InventoryStats {
    pub total: usize,
    pub sold: usize,
    pub in_stock: usize,
    pub returned: usize,
    /// Selling − purchase − expenses over sold, non-returned items.
    #[ts(type = "number")]
    pub realized_profit: Money,
    /// Purchase price of everything still on the shelf.
    #[ts(type = "number")]
    pub stock_value: Money,
    /// Refunds paid out.
    #[ts(type = "number")]
    pub returns_total: Money,
}

impl InventoryStats {
    /// Computes the summary for a set of products.
    pub fn compute<'a, I>(products: I) -> Self
    where
        I: IntoIterator<Item = &'a Product>,
    {
        let mut stats = InventoryStats::default();
        for p in products {
            stats.total += 1;
            match p.status {
                ProductStatus::Sold => stats.sold += 1,
                ProductStatus::InStock => {
                    stats.in_stock += 1;
                    stats.stock_value += p.purchase_price;
                }
            }
            if p.is_return {
                stats.returned += 1;
                stats.returns_total += p.return_amount.unwrap_or_default();
            }
            stats.realized_profit += p.realized_profit();
        }
        stats
    }
}

// =============================================================================
// Chart Series
// =============================================================================

/// Sold-item counts per payment type.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct PaymentBreakdown {
    pub cash: usize,
    pub cashless: usize,
    pub installment: usize,
}

/// Counts sold items by how they were paid. Missing payment type counts as cash.
pub fn payment_breakdown<'a, I>(products: I) -> PaymentBreakdown
where
    I: IntoIterator<Item = &'a Product>,
{
    let mut breakdown = PaymentBreakdown::default();
    for p in products.into_iter().filter(|p| p.is_sold()) {
        match p.payment_type.unwrap_or_default() {
            PaymentType::Cash => breakdown.cash += 1,
            PaymentType::Cashless => breakdown.cashless += 1,
            PaymentType::Installment => breakdown.installment += 1,
        }
    }
    breakdown
}

/// One point of the profit chart.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct MonthlyProfit {
    /// `YYYY-MM`
    pub month: String,
    #[ts(type = "number")]
    pub profit: Money,
}

/// Realized profit per sale month, oldest first.
pub fn profit_by_month<'a, I>(products: I) -> Vec<MonthlyProfit>
where
    I: IntoIterator<Item = &'a Product>,
{
    let mut by_month: BTreeMap<String, Money> = BTreeMap::new();
    for p in products.into_iter().filter(|p| p.is_sold()) {
        if let Some(sale_date) = p.sale_date {
            *by_month.entry(month_key(sale_date)).or_default() += p.realized_profit();
        }
    }
    by_month
        .into_iter()
        .map(|(month, profit)| MonthlyProfit { month, profit })
        .collect()
}

/// One point of the turnover chart.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct MonthlyTurnover {
    pub month: String,
    pub acquired: usize,
    pub sold: usize,
}

/// Items acquired and items sold per month, oldest first.
pub fn turnover_by_month<'a, I>(products: I) -> Vec<MonthlyTurnover>
where
    I: IntoIterator<Item = &'a Product>,
{
    let mut by_month: BTreeMap<String, (usize, usize)> = BTreeMap::new();
    for p in products {
        by_month.entry(month_key(p.acquisition_date)).or_default().0 += 1;
        if let (true, Some(sale_date)) = (p.is_sold(), p.sale_date) {
            by_month.entry(month_key(sale_date)).or_default().1 += 1;
        }
    }
    by_month
        .into_iter()
        .map(|(month, (acquired, sold))| MonthlyTurnover {
            month,
            acquired,
            sold,
        })
        .collect()
}

/// A bar of the top-products chart.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct TopProduct {
    pub id: String,
    /// Display label, cut to 20 characters.
    pub name: String,
    #[ts(type = "number")]
    pub profit: Money,
}

/// The `n` most profitable sold items, best first.
pub fn top_products<'a, I>(products: I, n: usize) -> Vec<TopProduct>
where
    I: IntoIterator<Item = &'a Product>,
{
    let mut ranked: Vec<TopProduct> = products
        .into_iter()
        .filter(|p| p.is_sold())
        .map(|p| TopProduct {
            id: p.id.clone(),
            name: truncate_label(&p.name),
            profit: p.realized_profit(),
        })
        .collect();
    // Stable: ties keep collection order.
    ranked.sort_by(|a, b| b.profit.cmp(&a.profit));
    ranked.truncate(n);
    ranked
}

// =============================================================================
// Table Filter
// =============================================================================

/// Status selector of the product table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "kebab-case")]
pub enum StatusFilter {
    #[default]
    All,
    InStock,
    Sold,
    Returned,
}

impl StatusFilter {
    fn matches(self, p: &Product) -> bool {
        match self {
            StatusFilter::All => true,
            StatusFilter::InStock => p.status == ProductStatus::InStock,
            StatusFilter::Sold => p.is_sold(),
            StatusFilter::Returned => p.is_return,
        }
    }
}

/// Case-insensitive search on name or article, then the status filter.
pub fn filter<'a, I>(products: I, term: &str, status: StatusFilter) -> Vec<&'a Product>
where
    I: IntoIterator<Item = &'a Product>,
{
    let term = term.trim().to_lowercase();
    products
        .into_iter()
        .filter(|p| {
            term.is_empty()
                || p.name.to_lowercase().contains(&term)
                || p.article_code.to_lowercase().contains(&term)
        })
        .filter(|p| status.matches(p))
        .collect()
}

// =============================================================================
// Helpers
// =============================================================================

fn month_key(date: chrono::NaiveDate) -> String {
    date.format("%Y-%m").to_string()
}

fn truncate_label(name: &str) -> String {
    if name.chars().count() > TOP_NAME_LEN {
        let cut: String = name.chars().take(TOP_NAME_LEN).collect();
        format!("{}...", cut)
    } else {
        name.to_string()
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
