//! In-memory customer directory.
//!
//! Stands in for a real customer store; keeps insertion order so that
//! filtered views stay stable.

use crate::types::Customer;
use tracing::info;

#[derive(Debug, Clone, Default)]
pub struct CustomerDirectory {
    customers: Vec<Customer>,
}

impl CustomerDirectory {
    pub fn new(customers: Vec<Customer>) -> Self {
        info!(customers = customers.len(), "Customer directory initialized");
        Self { customers }
    }

    /// Directory seeded with [`crate::demo::demo_customers`].
    pub fn demo() -> Self {
        Self::new(crate::demo::demo_customers())
    }

    pub fn list(&self) -> &[Customer] {
        &self.customers
    }

    pub fn get(&self, id: &str) -> Option<&Customer> {
        self.customers.iter().find(|c| c.id == id)
    }

    pub fn remove(&mut self, id: &str) -> bool {
        let before = self.customers.len();
        self.customers.retain(|c| c.id != id);
        let removed = self.customers.len() != before;
        if removed {
            info!(customer_id = id, "Customer removed");
        }
        removed
    }

    pub fn len(&self) -> usize {
        self.customers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.customers.is_empty()
    }
}
