use crate::cli::ServeArgs;
use crate::infra::{cors_layer, AppState};
use crate::routes::api_router;
use axum_prometheus::PrometheusMetricLayer;
use bias_shield::config::AppConfig;
use bias_shield::error::AppError;
use bias_shield::lending::ScreeningEngine;
use bias_shield::report::PdfReportRenderer;
use bias_shield::telemetry;
use std::sync::atomic::{AtomicBool, Ordering};
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
    let readiness_flag = Arc::new(AtomicBool::new(false));
    let app_state = AppState {
        readiness: readiness_flag.clone(),
        metrics: Arc::new(prometheus_handle),
        screening: Arc::new(ScreeningEngine::default()),
        renderer: Arc::new(PdfReportRenderer::new(&config.report)),
    };

    let app = api_router(app_state)
        .layer(cors_layer(&config.cors))
        .layer(prometheus_layer);

    let addr = config.server.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    readiness_flag.store(true, Ordering::Release);

    info!(
        ?config.environment,
        %addr,
        origins = ?config.cors.allowed_origins,
        "bias shield api ready"
    );

    axum::serve(listener, app).await?;
    Ok(())
}
