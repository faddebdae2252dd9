//! In-memory stores for the three persisted collections.
//!
//! Each store exclusively owns its list and exposes a snapshot read plus a
//! whole-list replace; there are no partial updates. Mutations notify every
//! registered [`ChangeListener`] with the full post-mutation snapshot, which
//! is how the persistence write-through observes changes without the stores
//! knowing anything about storage.

pub mod catalog;
pub mod ledger;
pub mod shipping;

pub use catalog::CatalogStore;
pub use ledger::OrderLedger;
pub use shipping::ShippingRateTable;

/// Observer of a store's full snapshot after every mutation. Listeners must
/// not mutate the store re-entrantly; they receive a borrowed snapshot and
/// copy what they need.
pub trait ChangeListener<T>: Send + Sync {
    fn on_change(&self, snapshot: &[T]);
}
