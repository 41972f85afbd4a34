use crate::cli::ServeArgs;
use crate::infra::{build_services, content_source, AppState};
use crate::routes::with_workflow_routes;
use accelerator_ai::config::AppConfig;
use accelerator_ai::error::AppError;
use accelerator_ai::telemetry;
use accelerator_ai::workflows::academy::RandomCertificateIds;
use accelerator_ai::workflows::funnel::ScoringEngine;
use axum::Extension;
use axum_prometheus::PrometheusMetricLayer;
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

    let (funnel, academy) = build_services(
        content_source(&config.content),
        config.funnel,
        ScoringEngine::default(),
        Arc::new(RandomCertificateIds),
    );

    let app = with_workflow_routes(funnel, academy)
        .layer(Extension(app_state))
        .layer(prometheus_layer);

    let addr = config.server.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    readiness_flag.store(true, Ordering::Release);

    info!(
        ?config.environment,
        %addr,
        offline_content = config.content.is_offline(),
        project_evaluation = config.funnel.include_project_evaluation,
        "accelerator service ready"
    );

    axum::serve(listener, app).await?;
    Ok(())
}
