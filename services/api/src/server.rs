use crate::cli::ServeArgs;
use crate::infra::{AppState, InMemoryScreeningRepository};
use crate::routes::with_screening_routes;
use axum::{Extension, Router};
use axum_prometheus::PrometheusMetricLayer;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use talent_ai::config::{AppConfig, ConfigError};
use talent_ai::error::AppError;
use talent_ai::telemetry;
use talent_ai::workflows::screening::{ScoringConfig, ScreeningService};
use tracing::info;

/// Screening routes plus probes, backed by an in-memory repository.
fn build_app(scoring: ScoringConfig, state: AppState) -> Result<Router, AppError> {
    let repository = Arc::new(InMemoryScreeningRepository::default());
    let service = ScreeningService::new(repository, scoring).map_err(ConfigError::from)?;
    Ok(with_screening_routes(Arc::new(service)).layer(Extension(state)))
}

pub(crate) async fn run(args: ServeArgs) -> Result<(), AppError> {
    let mut config = AppConfig::load()?;
    if let Some(host) = args.host {
        config.server.host = host;
    }
    if let Some(port) = args.port {
        config.server.port = port;
    }

    telemetry::init(&config.telemetry)?;

    let (prometheus_layer, prometheus_handle) = PrometheusMetricLayer::pair();
    let readiness = Arc::new(AtomicBool::new(false));
    let state = AppState {
        readiness: readiness.clone(),
        metrics: Arc::new(prometheus_handle),
    };
    let app = build_app(config.scoring.clone(), state)?.layer(prometheus_layer);

    let addr = config.server.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    readiness.store(true, Ordering::Release);

    info!(
        environment = ?config.environment,
        %addr,
        qualified_threshold = config.scoring.qualified_threshold,
        "candidate screening service listening"
    );

    axum::serve(listener, app).await?;
    Ok(())
}
