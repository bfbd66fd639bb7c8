use crate::cli::ServeArgs;
use crate::infra::{AppState, InMemoryEventLog, InMemoryStockyardRepository};
use crate::routes::with_stockyard_routes;
use axum::Extension;
use axum_prometheus::PrometheusMetricLayer;
use ore_stockyard::config::AppConfig;
use ore_stockyard::error::AppError;
use ore_stockyard::stockyard::UnloadingService;
use ore_stockyard::telemetry;
use std::sync::atomic::Ordering;
use std::sync::Arc;
use tracing::info;

pub(crate) async fn run(mut args: ServeArgs) -> Result<(), AppError> {
    let mut config = AppConfig::load()?;

    if let Some(host) = args.host.take() {
        config.server.host = host;
    }
    if let Some(port) = args.port.take() {
        config.server.port = port;
    }

    telemetry::init(&config.telemetry)?;

    let (prometheus_layer, prometheus_handle) = PrometheusMetricLayer::pair();
    let readiness_flag = Arc::new(std::sync::atomic::AtomicBool::new(false));
    let app_state = AppState {
        readiness: readiness_flag.clone(),
        metrics: Arc::new(prometheus_handle),
    };

    let repository = Arc::new(InMemoryStockyardRepository::seeded());
    let events = Arc::new(InMemoryEventLog::default());
    let unloading_service = Arc::new(UnloadingService::new(
        repository,
        events,
        config.stockyard.clone(),
    ));

    let app = with_stockyard_routes(unloading_service)
        .layer(Extension(app_state))
        .layer(prometheus_layer);

    let addr = config.server.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    readiness_flag.store(true, Ordering::Release);

    info!(?config.environment, %addr, "ore stockyard service ready");

    axum::serve(listener, app).await?;
    Ok(())
}
