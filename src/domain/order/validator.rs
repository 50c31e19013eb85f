use rust_decimal::Decimal;

use super::aggregate::Order;

// ============================================================================
// Validator Capability
// ============================================================================

/// Decides whether an order may proceed. Pure: no side effects, no errors.
pub trait OrderValidator: Send + Sync {
    fn is_valid(&self, order: &Order) -> bool;
}

/// Any matching predicate qualifies as a validator.
impl<F> OrderValidator for F
where
    F: Fn(&Order) -> bool + Send + Sync,
{
    fn is_valid(&self, order: &Order) -> bool {
        self(order)
    }
}

/// Reference policy: the amount must be positive.
#[derive(Debug, Clone, Copy, Default)]
pub struct SimpleOrderValidator;

impl OrderValidator for SimpleOrderValidator {
    fn is_valid(&self, order: &Order) -> bool {
        order.total_amount() > Decimal::ZERO
    }
}

/// Stricter business rules: a named customer and an amount in
/// `(0, max_amount]`.
#[derive(Debug, Clone)]
pub struct StrictOrderValidator {
    pub max_amount: Decimal,
}

impl StrictOrderValidator {
    pub fn new(max_amount: Decimal) -> Self {
        Self { max_amount }
    }
}

impl OrderValidator for StrictOrderValidator {
    fn is_valid(&self, order: &Order) -> bool {
        !order.customer_name().trim().is_empty()
            && order.total_amount() > Decimal::ZERO
            && order.total_amount() <= self.max_amount
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn order(name: &str, amount: Decimal) -> Order {
        Order::new(1, name, amount)
    }

    #[test]
    fn test_simple_validator_requires_positive_amount() {
        let validator = SimpleOrderValidator;

        assert!(validator.is_valid(&order("Ivan", Decimal::new(15050, 2))));
        assert!(validator.is_valid(&order("Ivan", Decimal::new(1, 2))));
        assert!(!validator.is_valid(&order("Olena", Decimal::ZERO)));
        assert!(!validator.is_valid(&order("Maria", Decimal::new(-10, 0))));
    }

    #[test]
    fn test_strict_validator() {
        let validator = StrictOrderValidator::new(Decimal::ONE_THOUSAND);

        assert!(validator.is_valid(&order("Petro", Decimal::ONE_THOUSAND)));
        assert!(!validator.is_valid(&order("Petro", Decimal::new(100001, 2))));
        assert!(!validator.is_valid(&order("   ", Decimal::TEN)));
        assert!(!validator.is_valid(&order("Petro", Decimal::ZERO)));
    }

    #[test]
    fn test_closure_is_a_validator() {
        let even_ids = |order: &Order| order.id() % 2 == 0;
        let validator: &dyn OrderValidator = &even_ids;

        assert!(!validator.is_valid(&order("Ivan", Decimal::TEN)));
        assert!(validator.is_valid(&Order::new(2, "Ivan", Decimal::TEN)));
    }
}
