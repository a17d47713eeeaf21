use super::super::domain::{has_passed, Course, Enrollment, Student};
use super::config::EligibilityConfig;
use super::policy::EligibilityError;
use super::EligibilityContext;

pub(crate) fn is_already_enrolled(course: &Course, enrollments: &[Enrollment]) -> bool {
    enrollments
        .iter()
        .any(|enrollment| enrollment.course.id == course.id)
}

pub(crate) fn max_courses_for(student: &Student, config: &EligibilityConfig) -> u32 {
    student
        .options
        .max_courses_per_semester
        .unwrap_or(config.default_max_courses_per_semester)
}

pub(crate) fn check_enrollment_limit(
    context: &EligibilityContext<'_>,
    config: &EligibilityConfig,
) -> Option<EligibilityError> {
    let limit = max_courses_for(context.student, config);
    let enrolled = context.enrollments.len();

    (enrolled >= limit as usize).then_some(EligibilityError::MaxCourses { limit })
}

pub(crate) fn check_grade_level(course: &Course, student: &Student) -> Option<EligibilityError> {
    if course.grade_level.contains(student.grade_level) {
        return None;
    }

    Some(EligibilityError::GradeLevel {
        allowed: course.grade_level,
        current: student.grade_level,
    })
}

pub(crate) fn check_already_passed(
    course: &Course,
    context: &EligibilityContext<'_>,
) -> Option<EligibilityError> {
    has_passed(context.course_history, course.id).then_some(EligibilityError::AlreadyPassed)
}

pub(crate) fn check_prerequisite(
    course: &Course,
    context: &EligibilityContext<'_>,
) -> Option<EligibilityError> {
    let prerequisite = course.prerequisite.as_ref()?;
    if has_passed(context.course_history, prerequisite.id) {
        return None;
    }

    Some(EligibilityError::MissingPrerequisite {
        prerequisite: prerequisite.clone(),
    })
}

/// Enrollments with at least one meeting overlapping any meeting of any section of `course`.
pub(crate) fn conflicting_enrollments<'a>(
    course: &Course,
    enrollments: &'a [Enrollment],
) -> Vec<&'a Enrollment> {
    enrollments
        .iter()
        .filter(|enrollment| {
            enrollment
                .course_section
                .meeting_times
                .iter()
                .any(|enrolled| course.meeting_times().any(|offered| enrolled.overlaps(offered)))
        })
        .collect()
}

pub(crate) fn check_schedule_conflict(
    course: &Course,
    context: &EligibilityContext<'_>,
) -> Option<EligibilityError> {
    let conflicts = conflicting_enrollments(course, context.enrollments);
    (!conflicts.is_empty()).then_some(EligibilityError::ScheduleConflict)
}
