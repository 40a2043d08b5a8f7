use crate::cli::ServeArgs;
use crate::infra::{build_refiner, build_repository, AppState};
use crate::routes::with_match_routes;
use axum::Extension;
use axum_prometheus::PrometheusMetricLayer;
use contractor_match::config::AppConfig;
use contractor_match::error::AppError;
use contractor_match::matching::MatchService;
use contractor_match::telemetry;
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

    let repository = Arc::new(build_repository(&config.catalog)?);
    info!(candidates = repository.len(), "candidate pool ready");
    let refiner = build_refiner(&config.refiner, false);
    let match_service = Arc::new(MatchService::new(
        repository,
        refiner,
        config.scoring.clone(),
        config.refiner.timeout,
    ));

    let app = with_match_routes(match_service)
        .layer(Extension(app_state))
        .layer(prometheus_layer);

    let addr = config.server.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    readiness_flag.store(true, Ordering::Release);

    info!(environment = ?config.environment, %addr, "contractor matcher ready");

    axum::serve(listener, app).await?;
    Ok(())
}
