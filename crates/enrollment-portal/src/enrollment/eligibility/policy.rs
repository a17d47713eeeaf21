use serde::{Deserialize, Serialize};

use super::super::domain::{Course, CoursePrerequisite, GradeLevelRange};
use super::config::EligibilityConfig;
use super::rules;
use super::EligibilityContext;

/// Wire-level category of an eligibility failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EligibilityErrorKind {
    MaxCourses,
    GradeLevel,
    Prerequisite,
    Conflict,
    Other,
}

/// The single highest-priority reason a student may not enroll in a course.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EligibilityError {
    MaxCourses { limit: u32 },
    GradeLevel { allowed: GradeLevelRange, current: i32 },
    AlreadyPassed,
    MissingPrerequisite { prerequisite: CoursePrerequisite },
    ScheduleConflict,
}

impl EligibilityError {
    pub const fn kind(&self) -> EligibilityErrorKind {
        match self {
            EligibilityError::MaxCourses { .. } => EligibilityErrorKind::MaxCourses,
            EligibilityError::GradeLevel { .. } => EligibilityErrorKind::GradeLevel,
            EligibilityError::AlreadyPassed => EligibilityErrorKind::Other,
            EligibilityError::MissingPrerequisite { .. } => EligibilityErrorKind::Prerequisite,
            EligibilityError::ScheduleConflict => EligibilityErrorKind::Conflict,
        }
    }

    pub fn message(&self) -> String {
        match self {
            EligibilityError::MaxCourses { limit } => {
                format!("You have reached the maximum limit of {limit} enrollments")
            }
            EligibilityError::GradeLevel { allowed, current } => format!(
                "This course is only available for grade levels {}. Your current grade level is {}.",
                allowed.label(),
                current
            ),
            EligibilityError::AlreadyPassed => "You have already passed this course.".to_string(),
            // The prerequisite itself is rendered next to the message as a link.
            EligibilityError::MissingPrerequisite { .. } => "Missing prerequisite:".to_string(),
            EligibilityError::ScheduleConflict => {
                "This course conflicts with your current schedule".to_string()
            }
        }
    }

    pub fn prerequisite(&self) -> Option<&CoursePrerequisite> {
        match self {
            EligibilityError::MissingPrerequisite { prerequisite } => Some(prerequisite),
            _ => None,
        }
    }

    pub fn view(&self) -> EligibilityErrorView {
        EligibilityErrorView {
            kind: self.kind(),
            message: self.message(),
            prerequisite: self.prerequisite().cloned(),
        }
    }
}

impl std::fmt::Display for EligibilityError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.message())
    }
}

/// Verdict of an eligibility evaluation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Eligibility {
    Eligible,
    Ineligible(EligibilityError),
}

impl Eligibility {
    pub fn is_eligible(&self) -> bool {
        matches!(self, Eligibility::Eligible)
    }

    pub fn reason(&self) -> Option<&EligibilityError> {
        match self {
            Eligibility::Eligible => None,
            Eligibility::Ineligible(reason) => Some(reason),
        }
    }

    pub fn summary(&self) -> String {
        match self {
            Eligibility::Eligible => "eligible".to_string(),
            Eligibility::Ineligible(reason) => format!("ineligible: {}", reason.message()),
        }
    }

    /// `{eligible, validation?}` shape consumed by the portal UI; `validation` holds exactly one
    /// entry when the course is blocked.
    pub fn view(&self) -> EligibilityView {
        EligibilityView {
            eligible: self.is_eligible(),
            validation: self.reason().map(|reason| vec![reason.view()]),
        }
    }
}

impl From<Option<EligibilityError>> for Eligibility {
    fn from(value: Option<EligibilityError>) -> Self {
        value.map_or(Eligibility::Eligible, Eligibility::Ineligible)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EligibilityErrorView {
    #[serde(rename = "type")]
    pub kind: EligibilityErrorKind,
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub prerequisite: Option<CoursePrerequisite>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EligibilityView {
    pub eligible: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub validation: Option<Vec<EligibilityErrorView>>,
}

/// Runs the rule chain in priority order and stops at the first failure:
/// already enrolled, enrollment cap, grade level, already passed, prerequisite, schedule conflict.
pub(crate) fn decide_eligibility(
    course: &Course,
    context: &EligibilityContext<'_>,
    config: &EligibilityConfig,
) -> Eligibility {
    if rules::is_already_enrolled(course, context.enrollments) {
        return Eligibility::Eligible;
    }

    rules::check_enrollment_limit(context, config)
        .or_else(|| rules::check_grade_level(course, context.student))
        .or_else(|| rules::check_already_passed(course, context))
        .or_else(|| rules::check_prerequisite(course, context))
        .or_else(|| rules::check_schedule_conflict(course, context))
        .into()
}
