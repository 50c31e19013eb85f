use std::sync::Arc;

use rust_decimal::Decimal;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use order_pipeline::domain::order::{
    InMemoryOrderRepository, LogNotifier, Order, OrderRepository, OrderService, SharedOrder,
    SimpleOrderValidator,
};
use order_pipeline::metrics::PipelineMetrics;
use order_pipeline::PipelineConfig;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Default to INFO, pipeline at DEBUG; override with RUST_LOG
    tracing_subscriber::registry()
        .with(fmt::layer().with_target(true).with_thread_ids(true))
        .with(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("info,order_pipeline=debug")),
        )
        .init();

    tracing::info!("🚀 Starting order pipeline demo");

    let metrics = Arc::new(PipelineMetrics::new()?);

    // === 1. Reference wiring ===
    let defaults = OrderService::with_defaults().with_metrics(metrics.clone());

    let order_a = SharedOrder::new(Order::new(1, "Ivan Petrenko", Decimal::new(15050, 2)));
    defaults.process(&order_a).await;

    let order_b = SharedOrder::new(Order::new(2, "Olena Koval", Decimal::ZERO));
    defaults.process(&order_b).await;

    // === 2. Explicitly wired collaborators ===
    let repository = Arc::new(InMemoryOrderRepository::new());
    let service = OrderService::new(
        Arc::new(SimpleOrderValidator),
        repository.clone(),
        Arc::new(LogNotifier),
    )
    .with_config(PipelineConfig::bounded())
    .with_metrics(metrics.clone());

    let order_c = SharedOrder::new(Order::new(3, "Petro Ivanov", Decimal::new(200, 0)));
    service.process(&order_c).await;

    let order_d = SharedOrder::new(Order::new(4, "Maria Sydorenko", Decimal::new(-10, 0)));
    service.process(&order_d).await;

    service.process_order(None).await;

    // === 3. Check the repository ===
    match repository.get_by_id(3).await? {
        Some(fetched) => tracing::info!(
            order_id = fetched.id(),
            status = %fetched.status(),
            "Fetched order from repository"
        ),
        None => tracing::warn!(order_id = 3, "Order not found in repository"),
    }

    tracing::info!(
        a = %order_a.status(),
        b = %order_b.status(),
        c = %order_c.status(),
        d = %order_d.status(),
        stored = repository.len(),
        "Final statuses"
    );

    println!("{}", metrics.render()?);

    tracing::info!("🎉 Demo complete!");

    Ok(())
}
