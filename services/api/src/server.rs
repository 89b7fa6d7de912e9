use crate::cli::ServeArgs;
use crate::infra::{build_service, AppState};
use crate::routes::with_fleet_routes;
use axum::Extension;
use axum_prometheus::PrometheusMetricLayer;
use fleet_navigator::config::AppConfig;
use fleet_navigator::error::AppError;
use fleet_navigator::telemetry;
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
    if let Some(target) = args.target.take() {
        config.compliance = config.compliance.with_target_value(target)?;
    }

    telemetry::init(&config.telemetry)?;

    let (prometheus_layer, prometheus_handle) = PrometheusMetricLayer::pair();
    let readiness_flag = Arc::new(std::sync::atomic::AtomicBool::new(false));
    let app_state = AppState {
        readiness: readiness_flag.clone(),
        metrics: Arc::new(prometheus_handle),
    };

    let target = config.compliance.target;
    let service = build_service(&config.upstream, target)?;

    let app = with_fleet_routes(service)
        .layer(Extension(app_state))
        .layer(prometheus_layer);

    let addr = config.server.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    readiness_flag.store(true, Ordering::Release);

    info!(
        ?config.environment,
        %addr,
        target = target.value(),
        unit = %target.unit(),
        fleet = ?config.upstream.fleet,
        predictor = %config.upstream.predictor_url,
        "fleet navigator ready"
    );

    axum::serve(listener, app).await?;
    Ok(())
}
