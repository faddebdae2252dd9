pub mod chat;
pub mod order;
pub mod product;
pub mod shipping;
