//! # Statistics
//!
//! Numbers behind the dashboard cards and charts. Drawing them is the UI's
//! business.

use serde::Serialize;
use ts_rs::TS;

use gemstock_core::stats::{
    payment_breakdown, profit_by_month, top_products, turnover_by_month, MonthlyProfit,
    MonthlyTurnover, PaymentBreakdown, TopProduct,
};
use gemstock_core::{InventoryStats, TOP_PRODUCTS_COUNT};
use gemstock_sync::DocumentStore;

use crate::state::AppContext;

/// Everything the statistics view shows.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct Statistics {
    pub totals: InventoryStats,
    pub payments: PaymentBreakdown,
    pub monthly_profit: Vec<MonthlyProfit>,
    pub turnover: Vec<MonthlyTurnover>,
    pub top_products: Vec<TopProduct>,
}

impl<D: DocumentStore> AppContext<D> {
    pub async fn statistics(&self) -> Statistics {
        let products = self.products.read().await;
        Statistics {
            totals: InventoryStats::compute(products.iter()),
            payments: payment_breakdown(products.iter()),
            monthly_profit: profit_by_month(products.iter()),
            turnover: turnover_by_month(products.iter()),
            top_products: top_products(products.iter(), TOP_PRODUCTS_COUNT),
        }
    }
}
