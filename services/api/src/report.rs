use crate::infra::{load_snapshot, InMemoryPortalProvider};
use chrono::{Local, NaiveDate};
use clap::Args;
use enrollment_portal::config::PortalConfig;
use enrollment_portal::enrollment::service::CourseEligibilityView;
use enrollment_portal::enrollment::{
    CourseFilter, CourseId, EligibilityErrorKind, EnrollmentPortalService, PortalDataProvider,
    PortalServiceError, PortalSnapshot,
};
use enrollment_portal::error::AppError;
use serde::Serialize;
use std::path::PathBuf;
use std::sync::Arc;

#[derive(Args, Debug)]
pub(crate) struct EligibilityArgs {
    /// Portal snapshot (JSON). Defaults to PORTAL_SNAPSHOT_PATH, then the bundled sample.
    #[arg(long)]
    pub(crate) snapshot: Option<PathBuf>,
    /// Only report on this course
    #[arg(long)]
    pub(crate) course_id: Option<u32>,
    /// Enrollment cap when the student record carries none
    #[arg(long)]
    pub(crate) max_courses: Option<u32>,
}

#[derive(Args, Debug)]
pub(crate) struct ExploreArgs {
    /// Portal snapshot (JSON). Defaults to PORTAL_SNAPSHOT_PATH, then the bundled sample.
    #[arg(long)]
    pub(crate) snapshot: Option<PathBuf>,
    /// Case-insensitive match against course name or code
    #[arg(long, default_value = "")]
    pub(crate) search: String,
    /// Earliest meeting start (HH:MM)
    #[arg(long)]
    pub(crate) from: Option<String>,
    /// Latest meeting end (HH:MM)
    #[arg(long)]
    pub(crate) until: Option<String>,
    /// Restrict to meetings on these weekdays (repeatable)
    #[arg(long = "weekday")]
    pub(crate) weekdays: Vec<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct EligibilityReport {
    pub(crate) generated_on: NaiveDate,
    pub(crate) student: String,
    pub(crate) grade_level: i32,
    pub(crate) max_courses_per_semester: u32,
    pub(crate) rows: Vec<EligibilityReportRow>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct EligibilityReportRow {
    pub(crate) course_id: CourseId,
    pub(crate) code: String,
    pub(crate) name: String,
    pub(crate) eligible: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub(crate) reason: Option<EligibilityErrorKind>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub(crate) message: Option<String>,
}

impl From<CourseEligibilityView> for EligibilityReportRow {
    fn from(view: CourseEligibilityView) -> Self {
        let first = view
            .eligibility
            .validation
            .and_then(|errors| errors.into_iter().next());
        let message = first.as_ref().map(|error| match &error.prerequisite {
            Some(prerequisite) => format!("{} {}", error.message, prerequisite.code),
            None => error.message.clone(),
        });

        Self {
            course_id: view.course.id,
            code: view.course.code,
            name: view.course.name,
            eligible: view.eligibility.eligible,
            reason: first.map(|error| error.kind),
            message,
        }
    }
}

pub(crate) fn build_eligibility_report<P>(
    service: &EnrollmentPortalService<P>,
    course_id: Option<CourseId>,
    today: NaiveDate,
) -> Result<EligibilityReport, PortalServiceError>
where
    P: PortalDataProvider + 'static,
{
    let student = service.student()?;
    let views = match course_id {
        Some(course_id) => vec![service.eligibility(course_id)?],
        None => service.catalog_eligibility()?,
    };

    Ok(EligibilityReport {
        generated_on: today,
        student: student.full_name(),
        grade_level: student.grade_level,
        max_courses_per_semester: service.evaluator().max_courses_for(&student),
        rows: views.into_iter().map(EligibilityReportRow::from).collect(),
    })
}

pub(crate) fn portal_service(
    snapshot: PortalSnapshot,
    portal: &PortalConfig,
) -> EnrollmentPortalService<InMemoryPortalProvider> {
    EnrollmentPortalService::new(
        Arc::new(InMemoryPortalProvider::new(snapshot)),
        portal.eligibility(),
    )
}

fn resolve_portal(
    snapshot: Option<PathBuf>,
    max_courses: Option<u32>,
) -> Result<(PortalSnapshot, PortalConfig), AppError> {
    let mut portal = enrollment_portal::config::AppConfig::load()?.portal;
    if let Some(limit) = max_courses.filter(|limit| *limit > 0) {
        portal.max_courses_per_semester = limit;
    }
    let path = snapshot.or_else(|| portal.snapshot_path.clone());
    let snapshot = load_snapshot(path.as_deref())?;
    Ok((snapshot, portal))
}

pub(crate) fn run_eligibility_report(args: EligibilityArgs) -> Result<(), AppError> {
    let EligibilityArgs {
        snapshot,
        course_id,
        max_courses,
    } = args;

    let (snapshot, portal) = resolve_portal(snapshot, max_courses)?;
    let service = portal_service(snapshot, &portal);
    let report = build_eligibility_report(
        &service,
        course_id.map(CourseId),
        Local::now().date_naive(),
    )?;

    render_eligibility_report(&report);
    Ok(())
}

pub(crate) fn render_eligibility_report(report: &EligibilityReport) {
    println!(
        "Eligibility for {} (grade {}) on {}",
        report.student, report.grade_level, report.generated_on
    );
    println!(
        "- enrollment cap: {} courses per semester",
        report.max_courses_per_semester
    );
    for row in &report.rows {
        match &row.message {
            None => println!("  [open]    {} {}", row.code, row.name),
            Some(message) => println!("  [blocked] {} {}: {}", row.code, row.name, message),
        }
    }
}

pub(crate) fn run_explore_report(args: ExploreArgs) -> Result<(), AppError> {
    let ExploreArgs {
        snapshot,
        search,
        from,
        until,
        weekdays,
    } = args;

    let (snapshot, portal) = resolve_portal(snapshot, None)?;
    let service = portal_service(snapshot, &portal);

    let mut filter = CourseFilter::default();
    filter.set_search(search);
    filter.set_from_time(from);
    filter.set_until_time(until);
    for day in &weekdays {
        filter.toggle_weekday(day);
    }

    let rows = service.explore(&filter)?;
    println!("Explore courses ({} matches)", rows.len());
    for row in rows {
        let marker = if row.eligibility.eligible { "+" } else { "-" };
        let meetings: Vec<String> = row
            .course
            .meeting_times()
            .map(|meeting| {
                format!(
                    "{} {}-{}",
                    meeting.day_of_week, meeting.start_time, meeting.end_time
                )
            })
            .collect();
        println!(
            "  {marker} {} {} [{}]",
            row.course.code,
            row.course.name,
            meetings.join(", ")
        );
    }

    Ok(())
}
