//! Test doubles for the pipeline's collaborators.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use parking_lot::Mutex;

use crate::domain::order::{
    DeliveryError, InMemoryOrderRepository, Order, OrderId, OrderNotifier, OrderRepository,
    PersistenceError, SharedOrder,
};
use crate::reporting::{PipelineEvent, PipelineReporter};

#[derive(Default)]
struct RepoLog {
    saves: Vec<OrderId>,
}

/// In-memory repository that records every save and can be told to fail
/// or stall.
#[derive(Clone, Default)]
pub struct RecordingRepository {
    store: Arc<InMemoryOrderRepository>,
    log: Arc<Mutex<RepoLog>>,
    failure: Option<String>,
    delay: Option<Duration>,
}

impl RecordingRepository {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn failing(message: &str) -> Self {
        Self {
            failure: Some(message.to_string()),
            ..Self::default()
        }
    }

    pub fn stalling(delay: Duration) -> Self {
        Self {
            delay: Some(delay),
            ..Self::default()
        }
    }

    pub fn save_calls(&self) -> usize {
        self.log.lock().saves.len()
    }

    pub fn saved_ids(&self) -> Vec<OrderId> {
        self.log.lock().saves.clone()
    }

    pub fn stored(&self) -> usize {
        self.store.len()
    }
}

#[async_trait]
impl OrderRepository for RecordingRepository {
    async fn save(&self, order: &SharedOrder) -> Result<(), PersistenceError> {
        self.log.lock().saves.push(order.id());

        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
        if let Some(message) = &self.failure {
            return Err(PersistenceError::Unavailable(message.clone()));
        }
        self.store.save(order).await
    }

    async fn get_by_id(&self, id: OrderId) -> Result<Option<Order>, PersistenceError> {
        self.store.get_by_id(id).await
    }
}

/// Notifier that counts calls and can be told to fail or stall.
#[derive(Clone, Default)]
pub struct SpyNotifier {
    notified: Arc<Mutex<Vec<OrderId>>>,
    failure: Option<String>,
    delay: Option<Duration>,
}

impl SpyNotifier {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn failing(message: &str) -> Self {
        Self {
            failure: Some(message.to_string()),
            ..Self::default()
        }
    }

    pub fn stalling(delay: Duration) -> Self {
        Self {
            delay: Some(delay),
            ..Self::default()
        }
    }

    pub fn calls(&self) -> usize {
        self.notified.lock().len()
    }

    pub fn notified_ids(&self) -> Vec<OrderId> {
        self.notified.lock().clone()
    }
}

#[async_trait]
impl OrderNotifier for SpyNotifier {
    async fn send_confirmation(&self, order: &Order) -> Result<(), DeliveryError> {
        self.notified.lock().push(order.id());

        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
        match &self.failure {
            Some(message) => Err(DeliveryError::TransportUnavailable(message.clone())),
            None => Ok(()),
        }
    }
}

#[derive(Clone, Default)]
pub struct RecordingReporter {
    events: Arc<Mutex<Vec<PipelineEvent>>>,
}

impl RecordingReporter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn events(&self) -> Vec<PipelineEvent> {
        self.events.lock().clone()
    }
}

impl PipelineReporter for RecordingReporter {
    fn report(&self, event: &PipelineEvent) {
        self.events.lock().push(event.clone());
    }
}
