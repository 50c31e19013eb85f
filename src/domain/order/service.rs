use std::future::Future;
use std::sync::Arc;
use std::time::{Duration, Instant};

use prometheus::IntGauge;
use tracing::Instrument;
use uuid::Uuid;

use super::aggregate::SharedOrder;
use super::errors::{DeliveryError, PersistenceError, PipelineError};
use super::notifier::{LogNotifier, OrderNotifier};
use super::repository::{InMemoryOrderRepository, OrderRepository};
use super::validator::{OrderValidator, SimpleOrderValidator};
use super::value_objects::{OrderId, OrderStatus, Stage};
use crate::config::PipelineConfig;
use crate::metrics::PipelineMetrics;
use crate::reporting::{PipelineEvent, PipelineReporter, TracingReporter};

// ============================================================================
// Order Service
// ============================================================================
//
// Orchestrates: Validator → Repository → Notifier
//
//   New ──validate──▶ Validated ──save──▶ Saved ──notify──▶ Notified ──▶ Completed
//    │                    │                  │
//    └────────────────────┴──────────────────┴──────▶ Failed
//
// Each stage runs at most once. The first failure marks the order Failed and
// stops the run. Collaborator errors end up in the order's status and the
// reporter, never in the caller's lap.
//
// ============================================================================

/// How a `process_order` call ended
#[derive(Debug, Clone, PartialEq)]
pub enum ProcessOutcome {
    Completed {
        order_id: OrderId,
    },
    Failed {
        order_id: OrderId,
        stage: Stage,
        error: PipelineError,
    },
    NoOrder,
}

impl ProcessOutcome {
    pub fn is_completed(&self) -> bool {
        matches!(self, ProcessOutcome::Completed { .. })
    }

    /// Terminal status the order was left in, if there was an order
    pub fn status(&self) -> Option<OrderStatus> {
        match self {
            ProcessOutcome::Completed { .. } => Some(OrderStatus::Completed),
            ProcessOutcome::Failed { .. } => Some(OrderStatus::Failed),
            ProcessOutcome::NoOrder => None,
        }
    }
}

pub struct OrderService {
    validator: Arc<dyn OrderValidator>,
    repository: Arc<dyn OrderRepository>,
    notifier: Arc<dyn OrderNotifier>,
    reporter: Arc<dyn PipelineReporter>,
    config: PipelineConfig,
    metrics: Option<Arc<PipelineMetrics>>,
}

impl OrderService {
    pub fn new(
        validator: Arc<dyn OrderValidator>,
        repository: Arc<dyn OrderRepository>,
        notifier: Arc<dyn OrderNotifier>,
    ) -> Self {
        Self {
            validator,
            repository,
            notifier,
            reporter: Arc::new(TracingReporter),
            config: PipelineConfig::default(),
            metrics: None,
        }
    }

    /// Service wired with the reference collaborators: positive-amount
    /// validation, an in-memory store and log-only confirmations.
    pub fn with_defaults() -> Self {
        Self::new(
            Arc::new(SimpleOrderValidator),
            Arc::new(InMemoryOrderRepository::new()),
            Arc::new(LogNotifier),
        )
    }

    pub fn with_reporter(mut self, reporter: Arc<dyn PipelineReporter>) -> Self {
        self.reporter = reporter;
        self
    }

    pub fn with_config(mut self, config: PipelineConfig) -> Self {
        self.config = config;
        self
    }

    pub fn with_metrics(mut self, metrics: Arc<PipelineMetrics>) -> Self {
        self.metrics = Some(metrics);
        self
    }

    pub fn repository(&self) -> &Arc<dyn OrderRepository> {
        &self.repository
    }

    /// Run an order through the pipeline.
    pub async fn process(&self, order: &SharedOrder) -> ProcessOutcome {
        self.process_order(Some(order)).await
    }

    /// Run an order through the pipeline. A missing order is reported and
    /// touches nothing.
    ///
    /// Always returns normally. The order's status is terminal when this
    /// resolves: `Completed`, or `Failed` at the first stage that failed.
    pub async fn process_order(&self, order: Option<&SharedOrder>) -> ProcessOutcome {
        let Some(order) = order else {
            self.reporter.report(&PipelineEvent::NoOrder);
            let outcome = ProcessOutcome::NoOrder;
            self.record_outcome(&outcome);
            return outcome;
        };

        let span = tracing::info_span!(
            "order_pipeline",
            order_id = order.id(),
            correlation_id = %Uuid::new_v4()
        );

        let _in_flight = self.metrics.as_ref().map(|m| InFlight::enter(&m.orders_in_flight));
        let outcome = self.run(order).instrument(span).await;
        self.record_outcome(&outcome);
        outcome
    }

    async fn run(&self, order: &SharedOrder) -> ProcessOutcome {
        let (order_id, customer_name, status) =
            order.read(|o| (o.id(), o.customer_name().to_string(), o.status()));

        if status != OrderStatus::New {
            order.set_status(OrderStatus::New);
            self.reporter.report(&PipelineEvent::Restarted {
                order_id,
                from: status,
            });
        }

        self.reporter.report(&PipelineEvent::Started {
            order_id,
            customer_name,
        });

        // Validate
        let started = Instant::now();
        let valid = order.read(|o| self.validator.is_valid(o));
        self.observe(Stage::Validate, started, valid);
        if !valid {
            return self.fail(order, Stage::Validate, PipelineError::ValidationFailure(order_id));
        }
        self.advance(order, Stage::Validate);

        // Save
        let started = Instant::now();
        let saved = bounded(
            self.config.save_timeout,
            self.repository.save(order),
            PersistenceError::Timeout,
        )
        .await;
        self.observe(Stage::Save, started, saved.is_ok());
        if let Err(source) = saved {
            return self.fail(order, Stage::Save, PipelineError::Persistence { order_id, source });
        }
        self.advance(order, Stage::Save);

        // Notify
        let snapshot = order.snapshot();
        let started = Instant::now();
        let notified = bounded(
            self.config.notify_timeout,
            self.notifier.send_confirmation(&snapshot),
            DeliveryError::Timeout,
        )
        .await;
        self.observe(Stage::Notify, started, notified.is_ok());
        if let Err(source) = notified {
            return self.fail(order, Stage::Notify, PipelineError::Delivery { order_id, source });
        }
        self.advance(order, Stage::Notify);

        order.set_status(OrderStatus::Completed);
        self.reporter.report(&PipelineEvent::Completed { order_id });
        ProcessOutcome::Completed { order_id }
    }

    fn advance(&self, order: &SharedOrder, stage: Stage) {
        let status = stage.success_status();
        order.set_status(status);
        self.reporter.report(&PipelineEvent::Advanced {
            order_id: order.id(),
            status,
        });
    }

    fn fail(&self, order: &SharedOrder, stage: Stage, error: PipelineError) -> ProcessOutcome {
        let order_id = order.id();
        order.set_status(OrderStatus::Failed);
        self.reporter.report(&PipelineEvent::Failed {
            order_id,
            error: error.clone(),
        });
        ProcessOutcome::Failed {
            order_id,
            stage,
            error,
        }
    }

    fn observe(&self, stage: Stage, started: Instant, success: bool) {
        if let Some(metrics) = &self.metrics {
            metrics.record_stage(stage, started.elapsed().as_secs_f64(), success);
        }
    }

    fn record_outcome(&self, outcome: &ProcessOutcome) {
        if let Some(metrics) = &self.metrics {
            match outcome {
                ProcessOutcome::Completed { .. } => metrics.record_outcome("completed"),
                ProcessOutcome::Failed { .. } => metrics.record_outcome("failed"),
                ProcessOutcome::NoOrder => metrics.orders_rejected.inc(),
            }
        }
    }
}

/// Await a stage, folding an elapsed limit into the stage's own error.
async fn bounded<F, E>(limit: Option<Duration>, stage: F, on_timeout: fn(Duration) -> E) -> Result<(), E>
where
    F: Future<Output = Result<(), E>>,
{
    match limit {
        Some(limit) => tokio::time::timeout(limit, stage)
            .await
            .unwrap_or_else(|_| Err(on_timeout(limit))),
        None => stage.await,
    }
}

struct InFlight<'a>(&'a IntGauge);

impl<'a> InFlight<'a> {
    fn enter(gauge: &'a IntGauge) -> Self {
        gauge.inc();
        Self(gauge)
    }
}

impl Drop for InFlight<'_> {
    fn drop(&mut self) {
        self.0.dec();
    }
}

// ============================================================================
// Unit Tests
// ============================================================================
