use std::sync::Arc;

use chrono::{DateTime, Utc};
use parking_lot::RwLock;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::value_objects::{OrderId, OrderStatus};

// ============================================================================
// Order - the record that moves through the pipeline
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Order {
    // Identity (fixed at creation)
    id: OrderId,

    customer_name: String,
    total_amount: Decimal,

    // Pipeline-owned
    status: OrderStatus,

    // Audit Trail
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl Order {
    pub fn new(id: OrderId, customer_name: impl Into<String>, total_amount: Decimal) -> Self {
        let now = Utc::now();
        Self {
            id,
            customer_name: customer_name.into(),
            total_amount,
            status: OrderStatus::New,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn id(&self) -> OrderId {
        self.id
    }

    pub fn customer_name(&self) -> &str {
        &self.customer_name
    }

    pub fn total_amount(&self) -> Decimal {
        self.total_amount
    }

    pub fn status(&self) -> OrderStatus {
        self.status
    }

    pub fn set_customer_name(&mut self, customer_name: impl Into<String>) {
        self.customer_name = customer_name.into();
        self.updated_at = Utc::now();
    }

    pub fn set_total_amount(&mut self, total_amount: Decimal) {
        self.total_amount = total_amount;
        self.updated_at = Utc::now();
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    pub fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }

    /// Only the pipeline moves an order between statuses.
    pub(crate) fn set_status(&mut self, status: OrderStatus) {
        self.status = status;
        self.updated_at = Utc::now();
    }
}

// ============================================================================
// SharedOrder - one order seen by caller, pipeline and repository alike
// ============================================================================

/// Cloneable handle to a single [`Order`].
///
/// Clones point at the same record, so a status written by the pipeline is
/// visible through the caller's handle and through whatever the repository
/// stored. Reads hand out owned snapshots.
///
/// Caller edits are copy-on-write: the editing handle moves to a fresh record
/// and every other clone, including a stored one, keeps the old record until
/// the order is saved again.
#[derive(Debug, Clone)]
pub struct SharedOrder {
    inner: Arc<RwLock<Order>>,
}

impl SharedOrder {
    /// Wrap an order for submission. Status starts at `New` whatever the
    /// given order carried.
    pub fn new(mut order: Order) -> Self {
        if order.status != OrderStatus::New {
            order.set_status(OrderStatus::New);
        }
        Self {
            inner: Arc::new(RwLock::new(order)),
        }
    }

    pub fn id(&self) -> OrderId {
        self.inner.read().id
    }

    pub fn status(&self) -> OrderStatus {
        self.inner.read().status
    }

    pub fn snapshot(&self) -> Order {
        self.inner.read().clone()
    }

    pub fn read<R>(&self, f: impl FnOnce(&Order) -> R) -> R {
        f(&self.inner.read())
    }

    /// Correct the amount, e.g. before resubmitting a failed order.
    pub fn set_total_amount(&mut self, total_amount: Decimal) {
        self.detach().set_total_amount(total_amount);
    }

    pub fn set_customer_name(&mut self, customer_name: impl Into<String>) {
        self.detach().set_customer_name(customer_name);
    }

    /// True when both handles refer to the same record
    pub fn same_order(&self, other: &SharedOrder) -> bool {
        Arc::ptr_eq(&self.inner, &other.inner)
    }

    pub(crate) fn set_status(&self, status: OrderStatus) {
        self.inner.write().set_status(status);
    }

    fn detach(&mut self) -> parking_lot::RwLockWriteGuard<'_, Order> {
        if Arc::strong_count(&self.inner) > 1 {
            let copy = self.snapshot();
            self.inner = Arc::new(RwLock::new(copy));
        }
        self.inner.write()
    }
}

impl From<Order> for SharedOrder {
    fn from(order: Order) -> Self {
        Self::new(order)
    }
}

// ============================================================================
// Unit Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_order_starts_in_new_status() {
        let order = Order::new(1, "Ivan Petrenko", Decimal::new(15050, 2));

        assert_eq!(order.id(), 1);
        assert_eq!(order.customer_name(), "Ivan Petrenko");
        assert_eq!(order.total_amount(), Decimal::new(15050, 2));
        assert_eq!(order.status(), OrderStatus::New);
        assert_eq!(order.created_at(), order.updated_at());
    }

    #[test]
    fn test_set_status_touches_updated_at() {
        let mut order = Order::new(1, "Ivan", Decimal::ONE);
        let before = order.updated_at();

        order.set_status(OrderStatus::Validated);

        assert_eq!(order.status(), OrderStatus::Validated);
        assert!(order.updated_at() >= before);
        assert_eq!(order.created_at(), before);
    }

    #[test]
    fn test_clones_share_status() {
        let handle = SharedOrder::new(Order::new(7, "Olena", Decimal::TEN));
        let other = handle.clone();

        handle.set_status(OrderStatus::Saved);

        assert!(handle.same_order(&other));
        assert_eq!(other.status(), OrderStatus::Saved);
    }

    #[test]
    fn test_snapshot_is_detached() {
        let mut handle = SharedOrder::new(Order::new(7, "Olena", Decimal::TEN));
        let snapshot = handle.snapshot();

        handle.set_total_amount(Decimal::ONE_HUNDRED);

        assert_eq!(snapshot.total_amount(), Decimal::TEN);
        assert_eq!(handle.read(|order| order.total_amount()), Decimal::ONE_HUNDRED);
    }

    #[test]
    fn test_edit_leaves_other_clones_alone() {
        let mut handle = SharedOrder::new(Order::new(7, "Olena", Decimal::TEN));
        let stored = handle.clone();
        handle.set_status(OrderStatus::Failed);

        handle.set_total_amount(Decimal::ONE);
        handle.set_customer_name("Olena Koval");

        assert!(!handle.same_order(&stored));
        assert_eq!(stored.snapshot().total_amount(), Decimal::TEN);
        assert_eq!(stored.snapshot().customer_name(), "Olena");
        assert_eq!(handle.id(), 7);
        assert_eq!(handle.status(), OrderStatus::Failed);
    }

    #[test]
    fn test_edit_on_sole_handle_stays_in_place() {
        let mut handle = SharedOrder::new(Order::new(7, "Olena", Decimal::TEN));
        let before = Arc::as_ptr(&handle.inner);

        handle.set_total_amount(Decimal::ONE);

        assert_eq!(Arc::as_ptr(&handle.inner), before);
    }

    #[test]
    fn test_wrapping_resets_status_to_new() {
        let mut order = Order::new(3, "Petro", Decimal::TEN);
        order.set_status(OrderStatus::Completed);

        let handle = SharedOrder::from(order);

        assert_eq!(handle.status(), OrderStatus::New);
    }

    #[test]
    fn test_order_serialization() {
        let order = Order::new(3, "Petro", Decimal::new(200, 0));

        let json = serde_json::to_string(&order).unwrap();
        let back: Order = serde_json::from_str(&json).unwrap();

        assert_eq!(order, back);
    }
}
