//! Order processing pipeline: validate, persist, notify.
//!
//! An [`OrderService`](domain::order::OrderService) runs an order through
//! three substitutable capabilities and records the outcome in the order's
//! status. See [`domain::order`] for the pieces.

pub mod config;
pub mod domain;
pub mod metrics;
pub mod reporting;
pub mod utils;

#[cfg(test)]
mod testing;

pub use config::PipelineConfig;
pub use domain::order::{
    Order, OrderId, OrderService, OrderStatus, ProcessOutcome, SharedOrder, Stage,
};
