use rust_decimal::Decimal;
use serde::Serialize;

use crate::domain::order::{Order, OrderStatus};

/// Aggregates the dashboard and sales figures from the current ledger
/// snapshot. Totals use each order's stored `total_amount`, never a
/// recomputation from the catalog.
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct SalesSummary {
    pub total_orders: usize,
    pub pending: usize,
    pub approved: usize,
    pub delivered: usize,
    pub suspended: usize,
    pub total_sales: Decimal,
}

impl SalesSummary {
    pub fn from_orders(orders: &[Order]) -> Self {
        let mut summary = Self { total_orders: orders.len(), ..Self::default() };
        for order in orders {
            match order.status {
                OrderStatus::Pending => summary.pending += 1,
                OrderStatus::Approved => summary.approved += 1,
                OrderStatus::Delivered => summary.delivered += 1,
                OrderStatus::Suspended => summary.suspended += 1,
            }
            if order.status.counts_as_sale() {
                summary.total_sales += order.total_amount;
            }
        }
        summary
    }
}
