use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::errors::DomainError;

#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct OrderId(pub String);

impl OrderId {
    pub fn generate() -> Self {
        Self(Uuid::new_v4().to_string())
    }
}

/// Order lifecycle states. Transitions are deliberately unconstrained: a
/// single operator curates status by hand and may move an order between any
/// two states.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OrderStatus {
    Pending,
    Approved,
    Delivered,
    Suspended,
}

impl OrderStatus {
    pub const ALL: [OrderStatus; 4] =
        [Self::Pending, Self::Approved, Self::Delivered, Self::Suspended];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Approved => "approved",
            Self::Delivered => "delivered",
            Self::Suspended => "suspended",
        }
    }

    /// Approved and delivered orders count toward sales totals.
    pub fn counts_as_sale(&self) -> bool {
        matches!(self, Self::Approved | Self::Delivered)
    }
}

impl std::str::FromStr for OrderStatus {
    type Err = DomainError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "pending" => Ok(Self::Pending),
            "approved" => Ok(Self::Approved),
            "delivered" => Ok(Self::Delivered),
            "suspended" => Ok(Self::Suspended),
            other => Err(DomainError::UnknownStatus(other.to_string())),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct OrderItem {
    pub product_code: String,
    pub product_name: String,
    pub size: String,
    pub color: String,
    pub price: Decimal,
}

/// A placed order with its priced invoice. `total_amount` is a snapshot taken
/// at creation time; later catalog or shipping edits never change it.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Order {
    pub id: OrderId,
    pub customer_name: String,
    pub customer_phone: String,
    pub address: String,
    pub governorate: String,
    pub items: Vec<OrderItem>,
    pub shipping_cost: Decimal,
    pub total_amount: Decimal,
    pub status: OrderStatus,
    pub created_at: DateTime<Utc>,
}

impl Order {
    /// Invoice subtotal before shipping, derived for display only.
    pub fn subtotal(&self) -> Decimal {
        self.total_amount - self.shipping_cost
    }
}
