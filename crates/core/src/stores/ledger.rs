use std::sync::Arc;

use crate::domain::order::{Order, OrderId, OrderStatus};

use super::ChangeListener;

/// The ordered collection of all placed orders, regardless of status.
pub struct OrderLedger {
    orders: Vec<Order>,
    listeners: Vec<Arc<dyn ChangeListener<Order>>>,
}

impl OrderLedger {
    pub fn hydrate(orders: Vec<Order>) -> Self {
        Self { orders, listeners: Vec::new() }
    }

    pub fn subscribe(&mut self, listener: Arc<dyn ChangeListener<Order>>) {
        self.listeners.push(listener);
    }

    pub fn add(&mut self, order: Order) {
        self.orders.push(order);
        self.notify();
    }

    pub fn remove(&mut self, id: &OrderId) {
        let before = self.orders.len();
        self.orders.retain(|order| &order.id != id);
        if self.orders.len() != before {
            self.notify();
        }
    }

    /// Any status may follow any other: a lone operator curates these by
    /// hand, and a transition table is a deliberate non-goal.
    pub fn set_status(&mut self, id: &OrderId, status: OrderStatus) {
        let mut changed = false;
        if let Some(order) = self.orders.iter_mut().find(|order| &order.id == id) {
            order.status = status;
            changed = true;
        }
        if changed {
            self.notify();
        }
    }

    pub fn find(&self, id: &OrderId) -> Option<&Order> {
        self.orders.iter().find(|order| &order.id == id)
    }

    pub fn list(&self) -> &[Order] {
        &self.orders
    }

    pub fn snapshot(&self) -> Vec<Order> {
        self.orders.clone()
    }

    pub fn replace_all(&mut self, orders: Vec<Order>) {
        self.orders = orders;
        self.notify();
    }

    fn notify(&self) {
        for listener in &self.listeners {
            listener.on_change(&self.orders);
        }
    }
}
