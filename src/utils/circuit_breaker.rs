use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::Mutex;

// ============================================================================
// Circuit Breaker
// ============================================================================
//
// Tracks consecutive failures of a collaborator and refuses calls while it
// looks unhealthy, instead of letting every order wait on a dead transport.
//
// States:
// - Closed: calls pass through
// - Open: calls refused until the cool-down elapses
// - HalfOpen: probing; enough successes close it, one failure reopens it
//
// The breaker never retries. A refused call is a failed call.
//
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CircuitState {
    Closed,
    Open,
    HalfOpen,
}

#[derive(Debug, Clone)]
pub struct CircuitBreakerConfig {
    /// Consecutive failures that open the circuit
    pub failure_threshold: u32,
    /// Cool-down before a trial call is let through
    pub timeout: Duration,
    /// Trial successes needed to close again
    pub success_threshold: u32,
}

impl Default for CircuitBreakerConfig {
    fn default() -> Self {
        Self {
            failure_threshold: 5,
            timeout: Duration::from_secs(60),
            success_threshold: 2,
        }
    }
}

#[derive(Debug)]
struct Tally {
    state: CircuitState,
    failures: u32,
    successes: u32,
    opened_at: Option<Instant>,
}

impl Tally {
    fn close(&mut self) {
        self.state = CircuitState::Closed;
        self.failures = 0;
        self.successes = 0;
        self.opened_at = None;
    }
}

#[derive(Debug, Clone)]
pub struct CircuitBreaker {
    name: &'static str,
    tally: Arc<Mutex<Tally>>,
    config: CircuitBreakerConfig,
}

impl CircuitBreaker {
    pub fn new(name: &'static str, config: CircuitBreakerConfig) -> Self {
        Self {
            name,
            tally: Arc::new(Mutex::new(Tally {
                state: CircuitState::Closed,
                failures: 0,
                successes: 0,
                opened_at: None,
            })),
            config,
        }
    }

    /// Whether a call may go ahead right now. Moves Open to HalfOpen once
    /// the cool-down has elapsed.
    pub async fn try_acquire(&self) -> bool {
        let mut tally = self.tally.lock().await;

        if tally.state != CircuitState::Open {
            return true;
        }

        let opened_at = tally.opened_at;
        match opened_at {
            Some(opened_at) if opened_at.elapsed() >= self.config.timeout => {
                tracing::info!(breaker = self.name, "Circuit breaker half-open, probing");
                tally.state = CircuitState::HalfOpen;
                tally.successes = 0;
                true
            }
            _ => false,
        }
    }

    pub async fn record_success(&self) {
        let mut tally = self.tally.lock().await;
        let state = tally.state;

        match state {
            CircuitState::HalfOpen => {
                tally.successes += 1;
                if tally.successes >= self.config.success_threshold {
                    tracing::info!(
                        breaker = self.name,
                        successes = tally.successes,
                        "Circuit breaker closed"
                    );
                    tally.close();
                }
            }
            CircuitState::Closed => tally.failures = 0,
            CircuitState::Open => {
                tracing::warn!(breaker = self.name, "Success recorded while circuit is open");
            }
        }
    }

    pub async fn record_failure(&self) {
        let mut tally = self.tally.lock().await;
        tally.failures += 1;
        let state = tally.state;

        match state {
            CircuitState::Closed if tally.failures >= self.config.failure_threshold => {
                tracing::warn!(
                    breaker = self.name,
                    failures = tally.failures,
                    "Circuit breaker opened"
                );
                tally.state = CircuitState::Open;
                tally.opened_at = Some(Instant::now());
            }
            CircuitState::HalfOpen => {
                tracing::warn!(breaker = self.name, "Trial call failed, circuit reopened");
                tally.state = CircuitState::Open;
                tally.successes = 0;
                tally.opened_at = Some(Instant::now());
            }
            _ => {}
        }
    }

    pub async fn state(&self) -> CircuitState {
        self.tally.lock().await.state
    }

    pub async fn failure_count(&self) -> u32 {
        self.tally.lock().await.failures
    }

    pub async fn reset(&self) {
        tracing::info!(breaker = self.name, "Circuit breaker manually reset");
        self.tally.lock().await.close();
    }
}
