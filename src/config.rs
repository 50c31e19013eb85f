use std::time::Duration;

// ============================================================================
// Pipeline Configuration
// ============================================================================

#[derive(Clone, Debug, Default, PartialEq)]
pub struct PipelineConfig {
    /// Upper bound on the Save stage; `None` waits as long as the store does
    pub save_timeout: Option<Duration>,
    /// Upper bound on the Notify stage; `None` waits as long as the transport does
    pub notify_timeout: Option<Duration>,
}

impl PipelineConfig {
    /// Bounded stages for collaborators that talk to remote systems
    pub fn bounded() -> Self {
        Self {
            save_timeout: Some(Duration::from_secs(2)),
            notify_timeout: Some(Duration::from_secs(5)),
        }
    }

    pub fn with_save_timeout(mut self, timeout: Duration) -> Self {
        self.save_timeout = Some(timeout);
        self
    }

    pub fn with_notify_timeout(mut self, timeout: Duration) -> Self {
        self.notify_timeout = Some(timeout);
        self
    }
}
