use std::sync::Arc;

use crate::domain::product::{NewProduct, Product, ProductId};
use crate::errors::DomainError;

use super::ChangeListener;

/// Owns the product list. Products are created and deleted whole; the only
/// in-place mutation is the availability toggle.
pub struct CatalogStore {
    products: Vec<Product>,
    listeners: Vec<Arc<dyn ChangeListener<Product>>>,
}

impl CatalogStore {
    pub fn hydrate(products: Vec<Product>) -> Self {
        Self { products, listeners: Vec::new() }
    }

    pub fn subscribe(&mut self, listener: Arc<dyn ChangeListener<Product>>) {
        self.listeners.push(listener);
    }

    /// Appends a product under a freshly generated id. An empty code or name
    /// rejects the addition without mutating the list; the caller surfaces
    /// the error inline to the operator.
    pub fn add(&mut self, draft: NewProduct) -> Result<ProductId, DomainError> {
        if draft.code.trim().is_empty() {
            return Err(DomainError::EmptyField { field: "code" });
        }
        if draft.name.trim().is_empty() {
            return Err(DomainError::EmptyField { field: "name" });
        }

        let id = ProductId::generate();
        self.products.push(Product {
            id: id.clone(),
            code: draft.code,
            name: draft.name,
            price: draft.price,
            sizes: draft.sizes,
            colors: draft.colors,
            is_available: draft.is_available,
        });
        self.notify();
        Ok(id)
    }

    /// Removes by id. Unknown ids are a no-op; no referential check is made
    /// against existing orders, which may keep referencing a deleted code.
    pub fn remove(&mut self, id: &ProductId) {
        let before = self.products.len();
        self.products.retain(|product| &product.id != id);
        if self.products.len() != before {
            self.notify();
        }
    }

    pub fn set_availability(&mut self, id: &ProductId, is_available: bool) {
        let mut changed = false;
        if let Some(product) = self.products.iter_mut().find(|product| &product.id == id) {
            if product.is_available != is_available {
                product.is_available = is_available;
                changed = true;
            }
        }
        if changed {
            self.notify();
        }
    }

    /// Case-sensitive, first match wins. Duplicate codes are allowed in the
    /// catalog, so order matters.
    pub fn find_by_code(&self, code: &str) -> Option<&Product> {
        self.products.iter().find(|product| product.code == code)
    }

    pub fn list(&self) -> &[Product] {
        &self.products
    }

    pub fn snapshot(&self) -> Vec<Product> {
        self.products.clone()
    }

    pub fn replace_all(&mut self, products: Vec<Product>) {
        self.products = products;
        self.notify();
    }

    fn notify(&self) {
        for listener in &self.listeners {
            listener.on_change(&self.products);
        }
    }
}
