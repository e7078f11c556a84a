use crate::cli::ServeArgs;
use crate::infra::{AppState, InMemoryCompensationStore};
use crate::routes::with_compensation_routes;
use axum::Extension;
use axum_prometheus::PrometheusMetricLayer;
use comp_engine::compensation::{CompensationService, EngineConfig, TracingObserver};
use comp_engine::config::AppConfig;
use comp_engine::error::AppError;
use comp_engine::telemetry;
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

    let store = if config.compensation.seed_demo_data {
        InMemoryCompensationStore::demo()
    } else {
        InMemoryCompensationStore::default()
    };
    let compensation_service = Arc::new(CompensationService::new(
        Arc::new(store),
        Arc::new(TracingObserver),
        EngineConfig::from(&config.compensation),
    ));

    let app = with_compensation_routes(compensation_service)
        .layer(Extension(app_state))
        .layer(prometheus_layer);

    let addr = config.server.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    readiness_flag.store(true, Ordering::Release);

    info!(
        ?config.environment,
        %addr,
        seeded = config.compensation.seed_demo_data,
        "compensation engine ready"
    );

    axum::serve(listener, app).await?;
    Ok(())
}
