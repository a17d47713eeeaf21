use crate::cli::ServeArgs;
use crate::infra::{load_snapshot, AppState, InMemoryPortalProvider};
use crate::routes::with_portal_routes;
use axum::Extension;
use axum_prometheus::PrometheusMetricLayer;
use enrollment_portal::config::AppConfig;
use enrollment_portal::enrollment::EnrollmentPortalService;
use enrollment_portal::error::AppError;
use enrollment_portal::telemetry;
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

    let snapshot = load_snapshot(config.portal.snapshot_path.as_deref())?;
    info!(
        courses = snapshot.courses.len(),
        enrollments = snapshot.enrollments.len(),
        "portal snapshot loaded"
    );
    let provider = Arc::new(InMemoryPortalProvider::new(snapshot));
    let portal_service = Arc::new(EnrollmentPortalService::new(
        provider,
        config.portal.eligibility(),
    ));

    let app = with_portal_routes(portal_service)
        .layer(Extension(app_state))
        .layer(prometheus_layer);

    let addr = config.server.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    readiness_flag.store(true, Ordering::Release);

    info!(?config.environment, %addr, "enrollment portal ready");

    axum::serve(listener, app).await?;
    Ok(())
}
