/// Bumped whenever a persisted snapshot changes shape incompatibly. Old keys
/// are simply abandoned; stale blobs under a previous version are ignored.
pub const SCHEMA_VERSION: &str = "v1";

/// Every persisted slot of the application, one blob per key.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum StorageKey {
    Catalog,
    ShippingRates,
    Orders,
    DisplayName,
}

impl StorageKey {
    pub const ALL: [StorageKey; 4] =
        [Self::Catalog, Self::ShippingRates, Self::Orders, Self::DisplayName];

    pub fn as_key(&self) -> String {
        format!("dokkan.{SCHEMA_VERSION}.{}", self.suffix())
    }

    fn suffix(&self) -> &'static str {
        match self {
            Self::Catalog => "catalog",
            Self::ShippingRates => "shipping_rates",
            Self::Orders => "orders",
            Self::DisplayName => "display_name",
        }
    }
}

impl std::fmt::Display for StorageKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_key())
    }
}
