use serde::{Deserialize, Serialize};

// ============================================================================
// Order Value Objects
// ============================================================================

/// Caller-assigned order identity
pub type OrderId = i64;

/// Where an order currently sits in the pipeline.
///
/// The success path is `New -> Validated -> Saved -> Notified -> Completed`.
/// `Failed` is absorbing and reachable from any non-terminal status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum OrderStatus {
    New,
    Validated,
    Saved,
    Notified,
    Completed,
    Failed,
}

impl OrderStatus {
    pub fn is_terminal(&self) -> bool {
        matches!(self, OrderStatus::Completed | OrderStatus::Failed)
    }
}

impl std::fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        std::fmt::Debug::fmt(self, f)
    }
}

/// One step of the pipeline, each owned by a distinct capability
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Stage {
    Validate,
    Save,
    Notify,
}

impl Stage {
    /// Stages in the order the pipeline attempts them
    pub const ALL: [Stage; 3] = [Stage::Validate, Stage::Save, Stage::Notify];

    /// Status the order must hold before this stage runs
    pub fn entry_status(&self) -> OrderStatus {
        match self {
            Stage::Validate => OrderStatus::New,
            Stage::Save => OrderStatus::Validated,
            Stage::Notify => OrderStatus::Saved,
        }
    }

    /// Status the order moves to when this stage succeeds
    pub fn success_status(&self) -> OrderStatus {
        match self {
            Stage::Validate => OrderStatus::Validated,
            Stage::Save => OrderStatus::Saved,
            Stage::Notify => OrderStatus::Notified,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Stage::Validate => "validate",
            Stage::Save => "save",
            Stage::Notify => "notify",
        }
    }
}

impl std::fmt::Display for Stage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

// ============================================================================
// Unit Tests
// ============================================================================
