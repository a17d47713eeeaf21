use crate::infra::AppState;
use crate::report::{build_eligibility_report, portal_service, EligibilityReport};
use axum::extract::Query;
use axum::http::{header, StatusCode};
use axum::response::IntoResponse;
use axum::Extension;
use axum::Json;
use chrono::Local;
use enrollment_portal::config::PortalConfig;
use enrollment_portal::enrollment::{
    portal_router, CourseId, EnrollmentPortalService, PortalDataProvider, PortalSnapshot,
};
use enrollment_portal::error::AppError;
use serde::Deserialize;
use serde_json::json;
use std::sync::Arc;

#[derive(Debug, Default, Deserialize)]
pub(crate) struct EligibilityReportQuery {
    #[serde(default)]
    pub(crate) course_id: Option<u32>,
    #[serde(default)]
    pub(crate) max_courses: Option<u32>,
}

pub(crate) fn with_portal_routes<P>(service: Arc<EnrollmentPortalService<P>>) -> axum::Router
where
    P: PortalDataProvider + 'static,
{
    portal_router(service)
        .route("/health", axum::routing::get(healthcheck))
        .route("/ready", axum::routing::get(readiness_endpoint))
        .route("/metrics", axum::routing::get(metrics_endpoint))
        .route(
            "/api/v1/reports/eligibility",
            axum::routing::post(eligibility_report_endpoint),
        )
}

pub(crate) async fn healthcheck() -> Json<serde_json::Value> {
    Json(json!({ "status": "ok" }))
}

pub(crate) async fn readiness_endpoint(Extension(state): Extension<AppState>) -> impl IntoResponse {
    let ready = state.readiness.load(std::sync::atomic::Ordering::Relaxed);
    let status = if ready {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };

    let payload = if ready {
        json!({ "status": "ready" })
    } else {
        json!({ "status": "initializing" })
    };

    (status, Json(payload))
}

pub(crate) async fn metrics_endpoint(Extension(state): Extension<AppState>) -> impl IntoResponse {
    (
        StatusCode::OK,
        [(header::CONTENT_TYPE, "text/plain; version=0.0.4")],
        state.metrics.render(),
    )
}

/// Evaluates an uploaded snapshot without touching the served portal data.
pub(crate) async fn eligibility_report_endpoint(
    Query(query): Query<EligibilityReportQuery>,
    body: String,
) -> Result<Json<EligibilityReport>, AppError> {
    let snapshot = PortalSnapshot::from_reader(body.as_bytes())?;
    let mut portal = PortalConfig::default();
    if let Some(limit) = query.max_courses.filter(|limit| *limit > 0) {
        portal.max_courses_per_semester = limit;
    }

    let service = portal_service(snapshot, &portal);
    let report = build_eligibility_report(
        &service,
        query.course_id.map(CourseId),
        Local::now().date_naive(),
    )?;

    Ok(Json(report))
}
