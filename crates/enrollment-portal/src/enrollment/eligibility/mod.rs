mod config;
mod policy;
mod rules;

pub use config::{EligibilityConfig, DEFAULT_MAX_COURSES_PER_SEMESTER};
pub use policy::{
    Eligibility, EligibilityError, EligibilityErrorKind, EligibilityErrorView, EligibilityView,
};

use super::domain::{Course, CourseHistoryEntry, Enrollment, Student};
use policy::decide_eligibility;
use tracing::debug;

/// Academic state a course is evaluated against.
#[derive(Debug, Clone, Copy)]
pub struct EligibilityContext<'a> {
    pub enrollments: &'a [Enrollment],
    pub course_history: &'a [CourseHistoryEntry],
    pub student: &'a Student,
}

impl<'a> EligibilityContext<'a> {
    pub fn new(
        enrollments: &'a [Enrollment],
        course_history: &'a [CourseHistoryEntry],
        student: &'a Student,
    ) -> Self {
        Self {
            enrollments,
            course_history,
            student,
        }
    }

    pub fn is_enrolled_in(&self, course: &Course) -> bool {
        rules::is_already_enrolled(course, self.enrollments)
    }
}

/// Stateless evaluator applying the portal configuration to a student's academic state.
#[derive(Debug, Clone, Default)]
pub struct EligibilityEvaluator {
    config: EligibilityConfig,
}

impl EligibilityEvaluator {
    pub fn new(config: EligibilityConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &EligibilityConfig {
        &self.config
    }

    pub fn evaluate(&self, course: &Course, context: &EligibilityContext<'_>) -> Eligibility {
        let verdict = decide_eligibility(course, context, &self.config);
        if let Some(reason) = verdict.reason() {
            debug!(course_id = course.id.0, reason = ?reason.kind(), "course not eligible");
        }
        verdict
    }

    /// Enrollment cap in effect for `student`.
    pub fn max_courses_for(&self, student: &Student) -> u32 {
        rules::max_courses_for(student, &self.config)
    }
}

/// Evaluates `course` with the default portal configuration.
pub fn evaluate_eligibility(
    course: &Course,
    enrollments: &[Enrollment],
    course_history: &[CourseHistoryEntry],
    student: &Student,
) -> Eligibility {
    EligibilityEvaluator::default().evaluate(
        course,
        &EligibilityContext::new(enrollments, course_history, student),
    )
}
