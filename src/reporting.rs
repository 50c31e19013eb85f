//! Progress reporting for the order pipeline.
//!
//! The service takes its reporter as an explicit collaborator. Nothing here
//! is global; a run builds one and hands it over.

use crate::domain::order::{OrderId, OrderStatus, PipelineError};

/// Something worth telling about an order's trip through the pipeline
#[derive(Debug, Clone, PartialEq)]
pub enum PipelineEvent {
    Started {
        order_id: OrderId,
        customer_name: String,
    },
    /// A resubmitted order was put back to `New` before running again
    Restarted {
        order_id: OrderId,
        from: OrderStatus,
    },
    Advanced {
        order_id: OrderId,
        status: OrderStatus,
    },
    Failed {
        order_id: OrderId,
        error: PipelineError,
    },
    Completed {
        order_id: OrderId,
    },
    NoOrder,
}

pub trait PipelineReporter: Send + Sync {
    fn report(&self, event: &PipelineEvent);
}

/// Default reporter: one structured `tracing` record per event.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingReporter;

impl PipelineReporter for TracingReporter {
    fn report(&self, event: &PipelineEvent) {
        match event {
            PipelineEvent::Started {
                order_id,
                customer_name,
            } => {
                tracing::info!(order_id, customer = %customer_name, "Processing order");
            }
            PipelineEvent::Restarted { order_id, from } => {
                tracing::info!(order_id, %from, "Resubmitted order, restarting from New");
            }
            PipelineEvent::Advanced { order_id, status } => {
                tracing::debug!(order_id, %status, "Order advanced");
            }
            PipelineEvent::Failed { order_id, error } => {
                tracing::warn!(
                    order_id,
                    stage = error.stage().map(|s| s.as_str()),
                    error = %error,
                    status = %OrderStatus::Failed,
                    "Order processing failed"
                );
            }
            PipelineEvent::Completed { order_id } => {
                tracing::info!(order_id, status = %OrderStatus::Completed, "✅ Order completed");
            }
            PipelineEvent::NoOrder => {
                tracing::warn!(error = %PipelineError::NullOrder, "Nothing to process");
            }
        }
    }
}
