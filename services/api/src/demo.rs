use crate::infra::sample_snapshot;
use crate::report::{build_eligibility_report, portal_service, render_eligibility_report};
use chrono::{Local, NaiveDate};
use clap::Args;
use enrollment_portal::config::PortalConfig;
use enrollment_portal::enrollment::{CourseFilter, CourseId, SectionId};
use enrollment_portal::error::AppError;
use enrollment_portal::time::add_minutes_to_time;

#[derive(Args, Debug, Default)]
pub(crate) struct DemoArgs {
    /// Override the reporting date (YYYY-MM-DD). Defaults to today.
    #[arg(long, value_parser = parse_date)]
    pub(crate) today: Option<NaiveDate>,
    /// Skip the enrollment portion of the demo.
    #[arg(long)]
    pub(crate) skip_enrollment: bool,
}

pub(crate) fn parse_date(raw: &str) -> Result<NaiveDate, String> {
    NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d")
        .map_err(|err| format!("failed to parse '{raw}' as YYYY-MM-DD ({err})"))
}

pub(crate) fn run_demo(args: DemoArgs) -> Result<(), AppError> {
    let DemoArgs {
        today,
        skip_enrollment,
    } = args;
    let today = today.unwrap_or_else(|| Local::now().date_naive());

    println!("Enrollment portal demo");
    let service = portal_service(sample_snapshot(), &PortalConfig::default());

    let report = build_eligibility_report(&service, None, today)?;
    render_eligibility_report(&report);

    let progress = service.progress()?;
    println!(
        "\nDegree progress: {}/{} credits ({:.0}%), GPA {:.2}",
        progress.earned_credits,
        progress.required_credits,
        progress.graduation_percent,
        progress.gpa
    );
    for entry in service.course_history()? {
        println!(
            "  - {} {}: {}",
            entry.semester.name,
            entry.course_name,
            entry.status.label()
        );
    }

    let mut filter = CourseFilter::default();
    filter.toggle_weekday("tuesday");
    filter.set_from_time(Some("08:00".to_string()));
    filter.set_until_time(Some("12:00".to_string()));
    println!("\nExplore: Tuesday mornings");
    for row in service.explore(&filter)? {
        let status = if row.eligibility.eligible {
            "eligible"
        } else {
            "blocked"
        };
        println!("  - {} {} ({status})", row.course.code, row.course.name);
    }

    println!("\nOpen calendar cells");
    for (weekday, start) in [("tuesday", "10:00"), ("wednesday", "14:00"), ("friday", "10:00")] {
        let courses = service.slot_courses(weekday, start)?;
        let end = add_minutes_to_time(start, 60).unwrap_or_else(|| start.to_string());
        let codes: Vec<&str> = courses.iter().map(|course| course.code.as_str()).collect();
        if codes.is_empty() {
            println!("  - {weekday} {start}-{end}: nothing to add");
        } else {
            println!("  - {weekday} {start}-{end}: {}", codes.join(", "));
        }
    }

    if skip_enrollment {
        return Ok(());
    }

    println!("\nEnrollment flow");
    for (course_id, section_id) in [(2, 21), (7, 71), (6, 61)] {
        match service.enroll(CourseId(course_id), SectionId(section_id)) {
            Ok(outcome) => println!(
                "  - enrolled in {} section {} as {}",
                outcome.enrollment.course.code,
                outcome.enrollment.course_section.id,
                outcome.enrollment.id
            ),
            Err(err) => println!("  - course {course_id} rejected: {err}"),
        }
    }

    println!("Weekly schedule");
    for event in service.schedule_events()? {
        println!(
            "  - {} on day {:?} {}-{}",
            event.title, event.days_of_week, event.start_time, event.end_time
        );
    }

    Ok(())
}
