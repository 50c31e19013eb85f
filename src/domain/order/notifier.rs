use async_trait::async_trait;

use super::aggregate::Order;
use super::errors::DeliveryError;
use crate::utils::{CircuitBreaker, CircuitBreakerConfig};

// ============================================================================
// Notifier Capability
// ============================================================================

/// Sends the customer a confirmation for an order.
#[async_trait]
pub trait OrderNotifier: Send + Sync {
    async fn send_confirmation(&self, order: &Order) -> Result<(), DeliveryError>;
}

/// Writes the confirmation to the log instead of a mail transport.
#[derive(Debug, Clone, Copy, Default)]
pub struct LogNotifier;

#[async_trait]
impl OrderNotifier for LogNotifier {
    async fn send_confirmation(&self, order: &Order) -> Result<(), DeliveryError> {
        tracing::info!(
            order_id = order.id(),
            customer = %order.customer_name(),
            amount = %order.total_amount(),
            "📧 Sending order confirmation"
        );
        Ok(())
    }
}

// ============================================================================
// Circuit-breaking decorator
// ============================================================================

/// Wraps a notifier and refuses deliveries with [`DeliveryError::CircuitOpen`]
/// while the transport keeps failing.
pub struct CircuitBreakerNotifier<N> {
    inner: N,
    breaker: CircuitBreaker,
}

impl<N: OrderNotifier> CircuitBreakerNotifier<N> {
    pub fn new(inner: N, config: CircuitBreakerConfig) -> Self {
        Self {
            inner,
            breaker: CircuitBreaker::new("notifier", config),
        }
    }

    pub fn breaker(&self) -> &CircuitBreaker {
        &self.breaker
    }
}

#[async_trait]
impl<N: OrderNotifier> OrderNotifier for CircuitBreakerNotifier<N> {
    async fn send_confirmation(&self, order: &Order) -> Result<(), DeliveryError> {
        if !self.breaker.try_acquire().await {
            tracing::warn!(order_id = order.id(), "Notification refused, circuit open");
            return Err(DeliveryError::CircuitOpen);
        }

        let result = self.inner.send_confirmation(order).await;
        match &result {
            Ok(()) => self.breaker.record_success().await,
            Err(_) => self.breaker.record_failure().await,
        }
        result
    }
}
