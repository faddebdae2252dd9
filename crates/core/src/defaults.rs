//! Hardcoded fallbacks used whenever persisted state is absent or unreadable.

use rust_decimal::Decimal;

use crate::domain::product::{Product, ProductId};
use crate::domain::shipping::ShippingRate;

/// The fixed set of regions the rate table is seeded with. One row per entry,
/// rows are never added or removed afterwards.
pub const GOVERNORATES: [&str; 27] = [
    "القاهرة",
    "الجيزة",
    "الإسكندرية",
    "الدقهلية",
    "البحر الأحمر",
    "البحيرة",
    "الفيوم",
    "الغربية",
    "الإسماعيلية",
    "المنوفية",
    "المنيا",
    "القليوبية",
    "الوادي الجديد",
    "السويس",
    "أسوان",
    "أسيوط",
    "بني سويف",
    "بورسعيد",
    "دمياط",
    "الشرقية",
    "جنوب سيناء",
    "كفر الشيخ",
    "مطروح",
    "الأقصر",
    "قنا",
    "شمال سيناء",
    "سوهاج",
];

pub const DEFAULT_APP_NAME: &str = "واتساب ذكي بلس";

/// Applied when a looked-up region has no row in the table. A miss is policy,
/// not an error.
pub fn fallback_shipping_cost() -> Decimal {
    Decimal::from(50)
}

fn metro_shipping_cost() -> Decimal {
    Decimal::from(50)
}

fn standard_shipping_cost() -> Decimal {
    Decimal::from(65)
}

/// Cairo and Giza ship at the metro rate, everywhere else at the standard one.
pub fn shipping_rates() -> Vec<ShippingRate> {
    GOVERNORATES
        .iter()
        .map(|governorate| ShippingRate {
            governorate: (*governorate).to_string(),
            cost: if *governorate == "القاهرة" || *governorate == "الجيزة" {
                metro_shipping_cost()
            } else {
                standard_shipping_cost()
            },
        })
        .collect()
}

/// Sample catalog shown on first launch so the chat assistant has something
/// to sell before the operator enters real stock.
pub fn sample_catalog() -> Vec<Product> {
    vec![
        Product {
            id: ProductId("1".to_string()),
            code: "TSH-001".to_string(),
            name: "تيشيرت صيفي قطن".to_string(),
            price: Decimal::from(250),
            sizes: vec!["M".to_string(), "L".to_string(), "XL".to_string()],
            colors: vec!["أسود".to_string(), "أبيض".to_string()],
            is_available: true,
        },
        Product {
            id: ProductId("2".to_string()),
            code: "PNTS-02".to_string(),
            name: "بنطلون جينز ليكرا".to_string(),
            price: Decimal::from(450),
            sizes: vec!["32".to_string(), "34".to_string(), "36".to_string()],
            colors: vec!["أزرق".to_string()],
            is_available: true,
        },
    ]
}
