use std::sync::Arc;

use rust_decimal::Decimal;

use crate::defaults;
use crate::domain::shipping::ShippingRate;

use super::ChangeListener;

/// Fixed-shape rate table: one row per seeded governorate, costs edited in
/// place, rows never inserted or removed after seeding.
pub struct ShippingRateTable {
    rates: Vec<ShippingRate>,
    listeners: Vec<Arc<dyn ChangeListener<ShippingRate>>>,
}

impl ShippingRateTable {
    /// Table with the default cost map, used on first launch and after reset.
    pub fn seeded() -> Self {
        Self::hydrate(defaults::shipping_rates())
    }

    pub fn hydrate(rates: Vec<ShippingRate>) -> Self {
        Self { rates, listeners: Vec::new() }
    }

    pub fn subscribe(&mut self, listener: Arc<dyn ChangeListener<ShippingRate>>) {
        self.listeners.push(listener);
    }

    /// Replaces the cost for a matching governorate. Unknown governorates are
    /// ignored: there is no insert-on-missing.
    pub fn set_cost(&mut self, governorate: &str, cost: Decimal) {
        let mut changed = false;
        if let Some(rate) = self.rates.iter_mut().find(|rate| rate.governorate == governorate) {
            rate.cost = cost;
            changed = true;
        }
        if changed {
            self.notify();
        }
    }

    /// Configured cost for the governorate, or the fixed fallback when the
    /// string matches no row. The fallback is policy, not an error: extracted
    /// governorates are free text and frequently miss.
    pub fn lookup(&self, governorate: &str) -> Decimal {
        self.rates
            .iter()
            .find(|rate| rate.governorate == governorate)
            .map(|rate| rate.cost)
            .unwrap_or_else(defaults::fallback_shipping_cost)
    }

    pub fn list(&self) -> &[ShippingRate] {
        &self.rates
    }

    pub fn snapshot(&self) -> Vec<ShippingRate> {
        self.rates.clone()
    }

    pub fn replace_all(&mut self, rates: Vec<ShippingRate>) {
        self.rates = rates;
        self.notify();
    }

    fn notify(&self) {
        for listener in &self.listeners {
            listener.on_change(&self.rates);
        }
    }
}

#[cfg(test)]
mod tests {
    use rust_decimal::Decimal;

    use crate::defaults::GOVERNORATES;
    use crate::stores::testing::RecordingListener;

    use super::ShippingRateTable;

    #[test]
    fn lookup_returns_configured_cost_for_every_seeded_region() {
        let table = ShippingRateTable::seeded();
        for governorate in GOVERNORATES {
            let cost = table.lookup(governorate);
            assert!(cost == Decimal::from(50) || cost == Decimal::from(65));
        }
    }

    #[test]
    fn lookup_falls_back_for_unknown_region() {
        let table = ShippingRateTable::seeded();
        assert_eq!(table.lookup("منطقة غير معروفة"), Decimal::from(50));
    }

    #[test]
    fn set_cost_edits_in_place_without_changing_table_length() {
        let mut table = ShippingRateTable::seeded();
        let before = table.list().len();

        table.set_cost("القاهرة", Decimal::from(70));

        assert_eq!(table.list().len(), before);
        assert_eq!(table.lookup("القاهرة"), Decimal::from(70));
    }

    #[test]
    fn set_cost_for_unknown_region_does_not_insert() {
        let mut table = ShippingRateTable::seeded();
        let listener = RecordingListener::shared();
        table.subscribe(listener.clone());
        let before = table.list().len();

        table.set_cost("أطلانتس", Decimal::from(10));

        assert_eq!(table.list().len(), before);
        assert_eq!(listener.change_count(), 0);
        // The miss still resolves through the fallback, untouched by the edit.
        assert_eq!(table.lookup("أطلانتس"), Decimal::from(50));
    }

    #[test]
    fn cost_edit_notifies_listeners() {
        let mut table = ShippingRateTable::seeded();
        let listener = RecordingListener::shared();
        table.subscribe(listener.clone());

        table.set_cost("الجيزة", Decimal::from(55));

        assert_eq!(listener.change_count(), 1);
    }
}
