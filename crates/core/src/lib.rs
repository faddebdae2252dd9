pub mod config;
pub mod defaults;
pub mod domain;
pub mod errors;
pub mod sales;
pub mod stores;

pub use config::{
    AppConfig, ChatConfig, ConfigError, ConfigOverrides, LlmConfig, LoadOptions, LogFormat,
    LoggingConfig, StorageConfig,
};
pub use domain::chat::{ChatMessage, ChatRole};
pub use domain::order::{Order, OrderId, OrderItem, OrderStatus};
pub use domain::product::{NewProduct, Product, ProductId};
pub use domain::shipping::ShippingRate;
pub use errors::{ApplicationError, DomainError};
pub use sales::SalesSummary;
pub use stores::{CatalogStore, ChangeListener, OrderLedger, ShippingRateTable};
