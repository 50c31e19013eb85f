use async_trait::async_trait;
use dashmap::DashMap;

use super::aggregate::{Order, SharedOrder};
use super::errors::PersistenceError;
use super::value_objects::OrderId;

// ============================================================================
// Repository Capability
// ============================================================================

/// Keyed order store. `id` is the only key; saving an id again replaces the
/// previous entry (last write wins).
#[async_trait]
pub trait OrderRepository: Send + Sync {
    /// Store or overwrite the order under its id.
    async fn save(&self, order: &SharedOrder) -> Result<(), PersistenceError>;

    /// Snapshot of the stored order, `Ok(None)` when the id is unknown.
    async fn get_by_id(&self, id: OrderId) -> Result<Option<Order>, PersistenceError>;
}

/// In-memory store over a concurrent map. Holds the caller's handle, so
/// later status changes show up in lookups.
#[derive(Debug, Default)]
pub struct InMemoryOrderRepository {
    orders: DashMap<OrderId, SharedOrder>,
}

impl InMemoryOrderRepository {
    pub fn new() -> Self {
        Self {
            orders: DashMap::new(),
        }
    }

    pub fn len(&self) -> usize {
        self.orders.len()
    }

    pub fn is_empty(&self) -> bool {
        self.orders.is_empty()
    }

    pub fn contains(&self, id: OrderId) -> bool {
        self.orders.contains_key(&id)
    }
}

#[async_trait]
impl OrderRepository for InMemoryOrderRepository {
    async fn save(&self, order: &SharedOrder) -> Result<(), PersistenceError> {
        let snapshot = order.snapshot();
        self.orders.insert(snapshot.id(), order.clone());

        tracing::debug!(
            order_id = snapshot.id(),
            customer = %snapshot.customer_name(),
            amount = %snapshot.total_amount(),
            "Order stored in memory"
        );

        Ok(())
    }

    async fn get_by_id(&self, id: OrderId) -> Result<Option<Order>, PersistenceError> {
        Ok(self.orders.get(&id).map(|entry| entry.value().snapshot()))
    }
}
