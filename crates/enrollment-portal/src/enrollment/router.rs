use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{delete, get, post},
    Json, Router,
};
use serde::Deserialize;
use serde_json::json;

use super::domain::{CourseId, EnrollmentId, SectionId, SemesterId};
use super::explore::CourseFilter;
use super::provider::{PortalDataProvider, ProviderError};
use super::service::{EnrollmentPortalService, PortalServiceError};

/// Router builder exposing eligibility, exploration, scheduling, and enrollment endpoints.
pub fn portal_router<P>(service: Arc<EnrollmentPortalService<P>>) -> Router
where
    P: PortalDataProvider + 'static,
{
    Router::new()
        .route(
            "/api/v1/courses/:course_id/eligibility",
            get(eligibility_handler::<P>),
        )
        .route("/api/v1/courses/:course_id/status", get(status_handler::<P>))
        .route("/api/v1/courses/explore", post(explore_handler::<P>))
        .route("/api/v1/schedule/slots", get(slot_courses_handler::<P>))
        .route("/api/v1/schedule/events", get(schedule_events_handler::<P>))
        .route("/api/v1/enrollments", post(enroll_handler::<P>))
        .route(
            "/api/v1/enrollments/:enrollment_id",
            delete(unenroll_handler::<P>),
        )
        .route("/api/v1/students/me/progress", get(progress_handler::<P>))
        .route("/api/v1/students/me/history", get(history_handler::<P>))
        .with_state(service)
}

#[derive(Debug, Deserialize)]
pub(crate) struct StatusQuery {
    pub(crate) semester_id: Option<u32>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct SlotQuery {
    pub(crate) weekday: String,
    pub(crate) start_time: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct EnrollRequest {
    pub(crate) course_id: u32,
    pub(crate) section_id: u32,
}

fn error_response(error: PortalServiceError) -> Response {
    match error {
        PortalServiceError::CourseNotFound(_)
        | PortalServiceError::SectionNotFound { .. }
        | PortalServiceError::EnrollmentNotFound(_) => {
            let payload = json!({ "error": error.to_string() });
            (StatusCode::NOT_FOUND, Json(payload)).into_response()
        }
        PortalServiceError::Ineligible(reason) => {
            let payload = json!({
                "error": reason.message(),
                "validation": [reason.view()],
            });
            (StatusCode::UNPROCESSABLE_ENTITY, Json(payload)).into_response()
        }
        PortalServiceError::SectionFull { .. }
        | PortalServiceError::Provider(ProviderError::Conflict) => {
            let payload = json!({ "error": error.to_string() });
            (StatusCode::CONFLICT, Json(payload)).into_response()
        }
        PortalServiceError::Provider(ProviderError::Unavailable(_)) => {
            let payload = json!({ "error": error.to_string() });
            (StatusCode::INTERNAL_SERVER_ERROR, Json(payload)).into_response()
        }
    }
}

fn respond<T: serde::Serialize>(
    status: StatusCode,
    result: Result<T, PortalServiceError>,
) -> Response {
    match result {
        Ok(body) => (status, Json(body)).into_response(),
        Err(error) => error_response(error),
    }
}

pub(crate) async fn eligibility_handler<P>(
    State(service): State<Arc<EnrollmentPortalService<P>>>,
    Path(course_id): Path<u32>,
) -> Response
where
    P: PortalDataProvider + 'static,
{
    respond(StatusCode::OK, service.eligibility(CourseId(course_id)))
}

pub(crate) async fn status_handler<P>(
    State(service): State<Arc<EnrollmentPortalService<P>>>,
    Path(course_id): Path<u32>,
    Query(query): Query<StatusQuery>,
) -> Response
where
    P: PortalDataProvider + 'static,
{
    respond(
        StatusCode::OK,
        service.course_status(CourseId(course_id), query.semester_id.map(SemesterId)),
    )
}

pub(crate) async fn explore_handler<P>(
    State(service): State<Arc<EnrollmentPortalService<P>>>,
    Json(filter): Json<CourseFilter>,
) -> Response
where
    P: PortalDataProvider + 'static,
{
    respond(StatusCode::OK, service.explore(&filter))
}

pub(crate) async fn slot_courses_handler<P>(
    State(service): State<Arc<EnrollmentPortalService<P>>>,
    Query(query): Query<SlotQuery>,
) -> Response
where
    P: PortalDataProvider + 'static,
{
    respond(
        StatusCode::OK,
        service.slot_courses(&query.weekday, &query.start_time),
    )
}

pub(crate) async fn schedule_events_handler<P>(
    State(service): State<Arc<EnrollmentPortalService<P>>>,
) -> Response
where
    P: PortalDataProvider + 'static,
{
    respond(StatusCode::OK, service.schedule_events())
}

pub(crate) async fn enroll_handler<P>(
    State(service): State<Arc<EnrollmentPortalService<P>>>,
    Json(request): Json<EnrollRequest>,
) -> Response
where
    P: PortalDataProvider + 'static,
{
    match service.enroll(CourseId(request.course_id), SectionId(request.section_id)) {
        Ok(outcome) if outcome.created => (StatusCode::CREATED, Json(outcome)).into_response(),
        Ok(outcome) => (StatusCode::OK, Json(outcome)).into_response(),
        Err(error) => error_response(error),
    }
}

pub(crate) async fn unenroll_handler<P>(
    State(service): State<Arc<EnrollmentPortalService<P>>>,
    Path(enrollment_id): Path<String>,
) -> Response
where
    P: PortalDataProvider + 'static,
{
    respond(StatusCode::OK, service.unenroll(&EnrollmentId(enrollment_id)))
}

pub(crate) async fn progress_handler<P>(
    State(service): State<Arc<EnrollmentPortalService<P>>>,
) -> Response
where
    P: PortalDataProvider + 'static,
{
    respond(StatusCode::OK, service.progress())
}

pub(crate) async fn history_handler<P>(
    State(service): State<Arc<EnrollmentPortalService<P>>>,
) -> Response
where
    P: PortalDataProvider + 'static,
{
    respond(StatusCode::OK, service.course_history())
}
