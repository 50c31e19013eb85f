use prometheus::{
    Encoder, HistogramOpts, HistogramVec, IntCounter, IntCounterVec, IntGauge, Opts, Registry, TextEncoder,
};

use crate::domain::order::Stage;

// ============================================================================
// Metrics Module - Prometheus metrics for the order pipeline
// ============================================================================
//
// Covers:
// - Orders finished, by outcome (completed / failed)
// - Calls rejected because no order was given
// - Stage failures, by stage
// - Stage latency, by stage
// - Orders currently inside the pipeline
//
// Metrics live on their own registry; `render` gives the text exposition.
// ============================================================================

pub struct PipelineMetrics {
    registry: Registry,

    pub orders_processed: IntCounterVec,
    pub orders_rejected: IntCounter,
    pub stage_failures: IntCounterVec,
    pub stage_duration: HistogramVec,
    pub orders_in_flight: IntGauge,
}

impl PipelineMetrics {
    pub fn new() -> anyhow::Result<Self> {
        let registry = Registry::new();

        let orders_processed = IntCounterVec::new(
            Opts::new("orders_processed_total", "Orders that left the pipeline"),
            &["outcome"],
        )?;
        registry.register(Box::new(orders_processed.clone()))?;

        let orders_rejected = IntCounter::new(
            "orders_rejected_total",
            "Calls that carried no order",
        )?;
        registry.register(Box::new(orders_rejected.clone()))?;

        let stage_failures = IntCounterVec::new(
            Opts::new("stage_failures_total", "Stage failures that failed an order"),
            &["stage"],
        )?;
        registry.register(Box::new(stage_failures.clone()))?;

        let stage_duration = HistogramVec::new(
            HistogramOpts::new("stage_duration_seconds", "Time spent in each pipeline stage")
                .buckets(vec![0.0001, 0.001, 0.005, 0.01, 0.05, 0.1, 0.5, 1.0, 5.0]),
            &["stage"],
        )?;
        registry.register(Box::new(stage_duration.clone()))?;

        let orders_in_flight = IntGauge::new(
            "orders_in_flight",
            "Orders currently being processed",
        )?;
        registry.register(Box::new(orders_in_flight.clone()))?;

        Ok(Self {
            registry,
            orders_processed,
            orders_rejected,
            stage_failures,
            stage_duration,
            orders_in_flight,
        })
    }

    pub fn registry(&self) -> &Registry {
        &self.registry
    }

    pub fn record_stage(&self, stage: Stage, duration_secs: f64, success: bool) {
        self.stage_duration
            .with_label_values(&[stage.as_str()])
            .observe(duration_secs);
        if !success {
            self.stage_failures.with_label_values(&[stage.as_str()]).inc();
        }
    }

    pub fn record_outcome(&self, outcome: &str) {
        self.orders_processed.with_label_values(&[outcome]).inc();
    }

    /// Prometheus text exposition of every registered metric
    pub fn render(&self) -> anyhow::Result<String> {
        let mut buffer = Vec::new();
        TextEncoder::new().encode(&self.registry.gather(), &mut buffer)?;
        Ok(String::from_utf8(buffer)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_metrics_creation() {
        let metrics = PipelineMetrics::new().unwrap();
        metrics.orders_in_flight.inc();
        assert!(!metrics.registry().gather().is_empty());
    }

    #[test]
    fn test_record_stage_failure() {
        let metrics = PipelineMetrics::new().unwrap();
        metrics.record_stage(Stage::Save, 0.002, true);
        metrics.record_stage(Stage::Notify, 0.01, false);

        assert_eq!(metrics.stage_failures.with_label_values(&["notify"]).get(), 1);
        assert_eq!(metrics.stage_failures.with_label_values(&["save"]).get(), 0);
        assert_eq!(
            metrics.stage_duration.with_label_values(&["save"]).get_sample_count(),
            1
        );
    }

    #[test]
    fn test_render_contains_outcomes() {
        let metrics = PipelineMetrics::new().unwrap();
        metrics.record_outcome("completed");
        metrics.record_outcome("completed");

        let text = metrics.render().unwrap();
        assert!(text.contains("orders_processed_total{outcome=\"completed\"} 2"));
    }

    #[test]
    fn test_rejected_calls_have_their_own_counter() {
        let metrics = PipelineMetrics::new().unwrap();
        metrics.orders_rejected.inc();

        let text = metrics.render().unwrap();
        assert!(text.contains("orders_rejected_total 1"));
        assert!(!text.contains("outcome=\"no_order\""));
    }
}
