use crate::cli::ServeArgs;
use crate::infra::AppState;
use crate::routes::with_transcript_routes;
use axum::Extension;
use axum_prometheus::PrometheusMetricLayer;
use grade_advisor::config::AppConfig;
use grade_advisor::error::AppError;
use grade_advisor::telemetry;
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
    if args.disable_engine {
        config.engine.enabled = false;
    }

    telemetry::init(&config.telemetry)?;

    let (prometheus_layer, prometheus_handle) = PrometheusMetricLayer::pair();
    let readiness_flag = Arc::new(std::sync::atomic::AtomicBool::new(false));
    let app_state = AppState {
        readiness: readiness_flag.clone(),
        metrics: Arc::new(prometheus_handle),
    };

    let app = with_transcript_routes(Arc::new(config.engine.clone()))
        .layer(Extension(app_state))
        .layer(prometheus_layer);

    let addr = config.server.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    readiness_flag.store(true, Ordering::Release);

    info!(
        ?config.environment,
        %addr,
        engine_enabled = config.engine.enabled,
        pass_threshold = config.engine.policy.pass_threshold,
        "grade advisor ready"
    );

    axum::serve(listener, app).await?;
    Ok(())
}
