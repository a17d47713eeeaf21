use super::common::*;
use crate::enrollment::domain::{CourseId, CourseOutcome, StudentOptions};
use crate::enrollment::{
    evaluate_eligibility, Eligibility, EligibilityConfig, EligibilityContext, EligibilityError,
    EligibilityErrorKind, EligibilityEvaluator,
};

fn expect_reason(verdict: Eligibility) -> EligibilityError {
    match verdict {
        Eligibility::Ineligible(reason) => reason,
        Eligibility::Eligible => panic!("expected an ineligible verdict"),
    }
}

#[test]
fn enrolled_course_is_eligible_regardless_of_other_blockers() {
    let blocked = with_grades(geometry(), 11, 12);
    let enrollments = vec![enrollment("enr-1", &blocked), enrollment("enr-2", &biology())];
    let mut student = student(8);
    student.options = StudentOptions {
        max_courses_per_semester: Some(1),
    };

    let verdict = evaluate_eligibility(&blocked, &enrollments, &[], &student);

    assert_eq!(verdict, Eligibility::Eligible);
    assert!(verdict.view().validation.is_none());
}

#[test]
fn cap_reached_returns_exactly_one_max_courses_error() {
    let enrollments: Vec<_> = (0..5)
        .map(|index| {
            let course = course(
                100 + index,
                &format!("ELE{index}"),
                &format!("Elective {index}"),
                vec![meeting("Saturday", "08:00", "09:00")],
            );
            enrollment(&format!("enr-{index}"), &course)
        })
        .collect();

    let verdict = evaluate_eligibility(&chemistry(), &enrollments, &[], &student(10));
    let view = verdict.view();

    assert!(!view.eligible);
    let validation = view.validation.expect("validation present");
    assert_eq!(validation.len(), 1);
    assert_eq!(validation[0].kind, EligibilityErrorKind::MaxCourses);
    assert_eq!(
        validation[0].message,
        "You have reached the maximum limit of 5 enrollments"
    );
}

#[test]
fn student_override_replaces_default_cap() {
    let mut student = student(10);
    student.options.max_courses_per_semester = Some(1);
    let enrollments = vec![enrollment("enr-1", &chemistry())];

    let reason = expect_reason(evaluate_eligibility(&algebra(), &enrollments, &[], &student));

    assert_eq!(reason, EligibilityError::MaxCourses { limit: 1 });
}

#[test]
fn configured_default_cap_applies_without_override() {
    let evaluator = EligibilityEvaluator::new(EligibilityConfig {
        default_max_courses_per_semester: 2,
    });
    let student = student(10);
    let enrollments = vec![enrollment("enr-1", &chemistry())];
    let context = EligibilityContext::new(&enrollments, &[], &student);

    assert!(evaluator.evaluate(&algebra(), &context).is_eligible());
    assert_eq!(evaluator.max_courses_for(&student), 2);

    let enrollments = vec![
        enrollment("enr-1", &chemistry()),
        enrollment("enr-2", &senior_seminar()),
    ];
    let context = EligibilityContext::new(&enrollments, &[], &student);
    assert_eq!(
        expect_reason(evaluator.evaluate(&algebra(), &context)).kind(),
        EligibilityErrorKind::MaxCourses
    );
}

#[test]
fn max_courses_outranks_grade_level_and_prerequisite() {
    let mut student = student(8);
    student.options.max_courses_per_semester = Some(1);
    let enrollments = vec![enrollment("enr-1", &chemistry())];
    let course = with_grades(geometry(), 10, 12);

    let view = evaluate_eligibility(&course, &enrollments, &[], &student).view();

    let validation = view.validation.expect("validation present");
    assert_eq!(validation.len(), 1);
    assert_eq!(validation[0].kind, EligibilityErrorKind::MaxCourses);
}

#[test]
fn grade_level_outranks_prerequisite_and_conflict() {
    let course = with_grades(geometry(), 10, 12);
    let enrollments = vec![enrollment(
        "enr-1",
        &course_meeting_tuesday_morning(),
    )];

    let reason = expect_reason(evaluate_eligibility(&course, &enrollments, &[], &student(8)));

    assert_eq!(reason.kind(), EligibilityErrorKind::GradeLevel);
}

#[test]
fn already_passed_outranks_missing_prerequisite() {
    let history = vec![history(3, &geometry(), CourseOutcome::Passed)];

    let reason = expect_reason(evaluate_eligibility(&geometry(), &[], &history, &student(10)));

    assert_eq!(reason, EligibilityError::AlreadyPassed);
}

#[test]
fn missing_prerequisite_outranks_schedule_conflict() {
    let enrollments = vec![enrollment(
        "enr-1",
        &course_meeting_tuesday_morning(),
    )];
    assert!(geometry().meeting_times().any(|meeting| meeting
        .overlaps(&course_meeting_tuesday_morning().available_sections[0].meeting_times[0])));

    let reason = expect_reason(evaluate_eligibility(&geometry(), &enrollments, &[], &student(10)));

    assert_eq!(reason.kind(), EligibilityErrorKind::Prerequisite);
}

fn course_meeting_tuesday_morning() -> crate::enrollment::Course {
    course(40, "HIS101", "History", vec![meeting("tuesday", "10:30", "11:30")])
}

#[test]
fn grade_eight_student_sees_grade_range_message() {
    let course = with_grades(algebra(), 10, 12);

    let view = evaluate_eligibility(&course, &[], &[], &student(8)).view();

    assert!(!view.eligible);
    let validation = view.validation.expect("validation present");
    assert_eq!(validation.len(), 1);
    assert_eq!(validation[0].kind, EligibilityErrorKind::GradeLevel);
    assert_eq!(
        validation[0].message,
        "This course is only available for grade levels 10-12. Your current grade level is 8."
    );
}

#[test]
fn single_grade_range_renders_one_number() {
    let reason = expect_reason(evaluate_eligibility(&senior_seminar(), &[], &[], &student(10)));

    assert_eq!(
        reason.message(),
        "This course is only available for grade levels 12. Your current grade level is 10."
    );
}

#[test]
fn passed_course_is_blocked_with_other_reason() {
    let history = vec![history(1, &chemistry(), CourseOutcome::Passed)];

    let reason = expect_reason(evaluate_eligibility(&chemistry(), &[], &history, &student(10)));

    assert_eq!(reason, EligibilityError::AlreadyPassed);
    assert_eq!(reason.kind(), EligibilityErrorKind::Other);
    assert_eq!(reason.message(), "You have already passed this course.");
}

#[test]
fn failed_course_may_be_retaken() {
    let history = vec![history(1, &chemistry(), CourseOutcome::Failed)];

    assert!(evaluate_eligibility(&chemistry(), &[], &history, &student(10)).is_eligible());
}

#[test]
fn passed_prerequisite_satisfies_the_check() {
    let history = vec![history(7, &algebra(), CourseOutcome::Passed)];

    let verdict = evaluate_eligibility(&geometry(), &[], &history, &student(10));

    assert_eq!(verdict, Eligibility::Eligible);
}

#[test]
fn missing_prerequisite_carries_the_reference() {
    let history = vec![history(7, &algebra(), CourseOutcome::Failed)];

    let reason = expect_reason(evaluate_eligibility(&geometry(), &[], &history, &student(10)));

    assert_eq!(reason.kind(), EligibilityErrorKind::Prerequisite);
    assert_eq!(reason.message(), "Missing prerequisite:");
    let prerequisite = reason.prerequisite().expect("prerequisite attached");
    assert_eq!(prerequisite.id, CourseId(1));
    assert_eq!(prerequisite.code, "MAT101");

    let json = serde_json::to_value(reason.view()).expect("serializes");
    assert_eq!(json["type"], "prerequisite");
    assert_eq!(json["prerequisite"]["name"], "Algebra I");
}

#[test]
fn schedule_conflict_is_symmetric() {
    let student = student(10);
    let algebra = algebra();
    let biology = biology();

    let forward = evaluate_eligibility(&biology, &[enrollment("enr-1", &algebra)], &[], &student);
    let backward = evaluate_eligibility(&algebra, &[enrollment("enr-1", &biology)], &[], &student);

    assert_eq!(forward, Eligibility::Ineligible(EligibilityError::ScheduleConflict));
    assert_eq!(forward, backward);
    assert_eq!(
        expect_reason(forward).message(),
        "This course conflicts with your current schedule"
    );
}

#[test]
fn conflict_considers_every_offered_section() {
    let mut course = chemistry();
    course.available_sections.push(section(
        41,
        vec![meeting("Monday", "09:45", "10:15")],
    ));

    let verdict = evaluate_eligibility(
        &course,
        &[enrollment("enr-1", &algebra())],
        &[],
        &student(10),
    );

    assert_eq!(verdict, Eligibility::Ineligible(EligibilityError::ScheduleConflict));
}

#[test]
fn adjacent_meetings_do_not_conflict() {
    let next_hour = course(
        42,
        "ART101",
        "Drawing",
        vec![meeting("monday", "10:00", "11:00")],
    );

    let verdict = evaluate_eligibility(
        &next_hour,
        &[enrollment("enr-1", &algebra())],
        &[],
        &student(10),
    );

    assert!(verdict.is_eligible());
}

#[test]
fn eligible_view_omits_validation() {
    let json = serde_json::to_value(
        evaluate_eligibility(&algebra(), &[], &[], &student(10)).view(),
    )
    .expect("serializes");

    assert_eq!(json, serde_json::json!({ "eligible": true }));
}

#[test]
fn summary_describes_the_verdict() {
    assert_eq!(Eligibility::Eligible.summary(), "eligible");
    assert_eq!(
        Eligibility::Ineligible(EligibilityError::ScheduleConflict).summary(),
        "ineligible: This course conflicts with your current schedule"
    );
}
