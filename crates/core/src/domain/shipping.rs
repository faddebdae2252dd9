use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Delivery cost for one governorate. The governorate string is the lookup
/// key; orders keep their own free-text copy that is never validated against
/// this table.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ShippingRate {
    pub governorate: String,
    pub cost: Decimal,
}
