use std::time::Duration;

use super::value_objects::{OrderId, Stage};

// ============================================================================
// Collaborator Errors
// ============================================================================

/// Raised by an [`OrderRepository`](super::OrderRepository) when a save or
/// lookup cannot reach the store.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum PersistenceError {
    #[error("Order store unavailable: {0}")]
    Unavailable(String),

    #[error("Save timed out after {0:?}")]
    Timeout(Duration),
}

/// Raised by an [`OrderNotifier`](super::OrderNotifier) when a confirmation
/// cannot be delivered.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum DeliveryError {
    #[error("Notification transport unavailable: {0}")]
    TransportUnavailable(String),

    #[error("Notification circuit is open")]
    CircuitOpen,

    #[error("Notification timed out after {0:?}")]
    Timeout(Duration),
}

// ============================================================================
// Pipeline Failure Taxonomy
// ============================================================================

/// Why a `process_order` call did not complete. Reported, never returned
/// as an `Err`.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum PipelineError {
    #[error("Order is missing")]
    NullOrder,

    #[error("Order #{0} failed validation")]
    ValidationFailure(OrderId),

    #[error("Order #{order_id} failed to save: {source}")]
    Persistence {
        order_id: OrderId,
        #[source]
        source: PersistenceError,
    },

    #[error("Order #{order_id} failed to notify: {source}")]
    Delivery {
        order_id: OrderId,
        #[source]
        source: DeliveryError,
    },
}

impl PipelineError {
    /// Stage that raised the error, `None` when no stage was reached
    pub fn stage(&self) -> Option<Stage> {
        match self {
            PipelineError::NullOrder => None,
            PipelineError::ValidationFailure(_) => Some(Stage::Validate),
            PipelineError::Persistence { .. } => Some(Stage::Save),
            PipelineError::Delivery { .. } => Some(Stage::Notify),
        }
    }
}
