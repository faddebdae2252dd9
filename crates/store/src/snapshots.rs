use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::warn;

use dokkan_core::defaults;
use dokkan_core::domain::order::Order;
use dokkan_core::domain::product::Product;
use dokkan_core::domain::shipping::ShippingRate;

use crate::keys::StorageKey;
use crate::kv::{KvStore, StorageError};

/// Loads one typed snapshot, falling back to `default` when the slot is empty
/// or holds an undecodable blob. Corruption is logged and absorbed, never
/// surfaced: the operator sees seed data rather than a dead dashboard.
async fn load_or_default<T, F>(
    kv: &dyn KvStore,
    key: StorageKey,
    default: F,
) -> Result<T, StorageError>
where
    T: DeserializeOwned,
    F: FnOnce() -> T,
{
    let Some(raw) = kv.get(key).await? else {
        return Ok(default());
    };

    match serde_json::from_str(&raw) {
        Ok(value) => Ok(value),
        Err(error) => {
            warn!(key = %key, %error, "discarding undecodable snapshot");
            Ok(default())
        }
    }
}

async fn save<T: Serialize>(
    kv: &dyn KvStore,
    key: StorageKey,
    value: &T,
) -> Result<(), StorageError> {
    let encoded = serde_json::to_string(value).map_err(|error| StorageError::Codec {
        key: key.as_key(),
        message: error.to_string(),
    })?;
    kv.set(key, encoded).await
}

pub async fn load_catalog(kv: &dyn KvStore) -> Result<Vec<Product>, StorageError> {
    load_or_default(kv, StorageKey::Catalog, defaults::sample_catalog).await
}

pub async fn save_catalog(kv: &dyn KvStore, products: &[Product]) -> Result<(), StorageError> {
    save(kv, StorageKey::Catalog, &products).await
}

pub async fn load_shipping_rates(kv: &dyn KvStore) -> Result<Vec<ShippingRate>, StorageError> {
    load_or_default(kv, StorageKey::ShippingRates, defaults::shipping_rates).await
}

pub async fn save_shipping_rates(
    kv: &dyn KvStore,
    rates: &[ShippingRate],
) -> Result<(), StorageError> {
    save(kv, StorageKey::ShippingRates, &rates).await
}

pub async fn load_orders(kv: &dyn KvStore) -> Result<Vec<Order>, StorageError> {
    load_or_default(kv, StorageKey::Orders, Vec::new).await
}

pub async fn save_orders(kv: &dyn KvStore, orders: &[Order]) -> Result<(), StorageError> {
    save(kv, StorageKey::Orders, &orders).await
}

pub async fn load_display_name(kv: &dyn KvStore) -> Result<String, StorageError> {
    load_or_default(kv, StorageKey::DisplayName, || defaults::DEFAULT_APP_NAME.to_string()).await
}

pub async fn save_display_name(kv: &dyn KvStore, name: &str) -> Result<(), StorageError> {
    save(kv, StorageKey::DisplayName, &name).await
}

#[cfg(test)]
mod tests {
    use chrono::Utc;
    use rust_decimal::Decimal;

    use dokkan_core::defaults;
    use dokkan_core::domain::order::{Order, OrderId, OrderItem, OrderStatus};
    use dokkan_core::domain::product::{Product, ProductId};
    use dokkan_core::domain::shipping::ShippingRate;

    use crate::keys::StorageKey;
    use crate::kv::KvStore;
    use crate::memory::InMemoryKvStore;

    use super::{
        load_catalog, load_display_name, load_orders, load_shipping_rates, save_catalog,
        save_display_name, save_orders, save_shipping_rates,
    };

    #[tokio::test]
    async fn empty_slots_load_seed_data() {
        let kv = InMemoryKvStore::default();

        let catalog = load_catalog(&kv).await.expect("catalog");
        assert_eq!(catalog.len(), defaults::sample_catalog().len());

        let rates = load_shipping_rates(&kv).await.expect("rates");
        assert_eq!(rates.len(), defaults::GOVERNORATES.len());

        let orders = load_orders(&kv).await.expect("orders");
        assert!(orders.is_empty());

        let name = load_display_name(&kv).await.expect("name");
        assert_eq!(name, defaults::DEFAULT_APP_NAME);
    }

    #[tokio::test]
    async fn corrupt_blob_falls_back_to_defaults() {
        let kv = InMemoryKvStore::default();
        kv.set(StorageKey::Catalog, "{not json".to_string()).await.expect("set");

        let catalog = load_catalog(&kv).await.expect("catalog");
        assert_eq!(catalog.len(), defaults::sample_catalog().len());
    }

    #[tokio::test]
    async fn saved_catalog_round_trips() {
        let kv = InMemoryKvStore::default();
        let products = vec![Product {
            id: ProductId("p-1".to_string()),
            code: "TSH-001".to_string(),
            name: "تيشيرت صيفي قطن".to_string(),
            price: Decimal::from(250),
            sizes: vec!["M".to_string(), "L".to_string(), "XL".to_string()],
            colors: vec!["أسود".to_string(), "أبيض".to_string()],
            is_available: true,
        }];

        save_catalog(&kv, &products).await.expect("save");
        let loaded = load_catalog(&kv).await.expect("load");

        assert_eq!(loaded, products);
    }

    #[tokio::test]
    async fn saved_orders_round_trip_with_every_field_intact() {
        let kv = InMemoryKvStore::default();
        let orders = vec![Order {
            id: OrderId("o-1".to_string()),
            customer_name: "أحمد".to_string(),
            customer_phone: "01012345678".to_string(),
            address: "١٢ شارع التحرير".to_string(),
            governorate: "القاهرة".to_string(),
            items: vec![OrderItem {
                product_code: "TSH-001".to_string(),
                product_name: "تيشيرت صيفي قطن".to_string(),
                size: "L".to_string(),
                color: "أسود".to_string(),
                price: "249.50".parse::<Decimal>().expect("decimal"),
            }],
            shipping_cost: Decimal::from(50),
            total_amount: "299.50".parse::<Decimal>().expect("decimal"),
            status: OrderStatus::Suspended,
            created_at: Utc::now(),
        }];

        save_orders(&kv, &orders).await.expect("save");
        let loaded = load_orders(&kv).await.expect("load");

        // Fractional price, status word and timestamp must all survive.
        assert_eq!(loaded, orders);
    }

    #[tokio::test]
    async fn saved_shipping_rates_round_trip() {
        let kv = InMemoryKvStore::default();
        let rates = vec![ShippingRate {
            governorate: "القاهرة".to_string(),
            cost: "57.25".parse::<Decimal>().expect("decimal"),
        }];

        save_shipping_rates(&kv, &rates).await.expect("save");
        let loaded = load_shipping_rates(&kv).await.expect("load");

        assert_eq!(loaded, rates);
    }

    #[tokio::test]
    async fn display_name_round_trips() {
        let kv = InMemoryKvStore::default();
        save_display_name(&kv, "دكان البركة").await.expect("save");
        assert_eq!(load_display_name(&kv).await.expect("load"), "دكان البركة");
    }
}
