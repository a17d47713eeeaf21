use serde::{Deserialize, Serialize};

use super::domain::{
    CourseHistoryEntry, CourseId, CourseOutcome, CourseSection, Enrollment, SemesterId,
};

/// Student-facing badge for a course.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CourseStudentStatus {
    Enrolled,
    Passed,
    Failed,
}

impl CourseStudentStatus {
    pub const fn label(self) -> &'static str {
        match self {
            Self::Enrolled => "Enrolled",
            Self::Passed => "Passed",
            Self::Failed => "Failed",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CourseStatusReport {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<CourseStudentStatus>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub history_entry: Option<CourseHistoryEntry>,
    pub enrolled_sections: Vec<CourseSection>,
}

/// Resolves the badge for `course_id`: passed wins over enrolled, which wins over failed.
///
/// With `semester_id` set, only enrollments and history from that semester are considered.
/// Enrollments without a semester never match a scoped lookup.
pub fn course_status(
    course_id: CourseId,
    enrollments: &[Enrollment],
    course_history: &[CourseHistoryEntry],
    semester_id: Option<SemesterId>,
) -> CourseStatusReport {
    let enrolled_sections: Vec<CourseSection> = enrollments
        .iter()
        .filter(|enrollment| enrollment.course.id == course_id)
        .filter(|enrollment| match semester_id {
            None => true,
            Some(id) => enrollment.semester.as_ref().map(|s| s.id) == Some(id),
        })
        .map(|enrollment| enrollment.course_section.clone())
        .collect();

    let scoped_history: Vec<&CourseHistoryEntry> = course_history
        .iter()
        .filter(|entry| entry.course_id == course_id)
        .filter(|entry| semester_id.map_or(true, |id| entry.semester.id == id))
        .collect();

    let find = |outcome: CourseOutcome| {
        scoped_history
            .iter()
            .find(|entry| entry.status == outcome)
            .copied()
    };
    let found = find(CourseOutcome::Passed).or_else(|| find(CourseOutcome::Failed));

    let status = match found.map(|entry| entry.status) {
        Some(CourseOutcome::Passed) => Some(CourseStudentStatus::Passed),
        _ if !enrolled_sections.is_empty() => Some(CourseStudentStatus::Enrolled),
        Some(CourseOutcome::Failed) => Some(CourseStudentStatus::Failed),
        None => None,
    };

    let history_entry = match status {
        Some(CourseStudentStatus::Enrolled) => None,
        _ => found.cloned(),
    };

    CourseStatusReport {
        status,
        history_entry,
        enrolled_sections,
    }
}
