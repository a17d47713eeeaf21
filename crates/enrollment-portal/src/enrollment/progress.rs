use serde::{Deserialize, Serialize};

use super::domain::{CourseHistoryEntry, CourseOutcome, Student};

/// Dashboard metrics describing how far the student is from graduation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DegreeProgress {
    pub gpa: f32,
    pub earned_credits: u32,
    pub required_credits: u32,
    pub remaining_credits: u32,
    pub graduation_percent: f64,
    pub passed_count: usize,
    pub failed_count: usize,
}

impl DegreeProgress {
    pub fn compute(student: &Student, course_history: &[CourseHistoryEntry]) -> Self {
        let earned_credits = student.credits.earned;
        let required_credits = student.credits.max;
        let graduation_percent = if required_credits > 0 {
            (f64::from(earned_credits) / f64::from(required_credits) * 100.0).min(100.0)
        } else {
            0.0
        };
        let count = |outcome: CourseOutcome| {
            course_history
                .iter()
                .filter(|entry| entry.status == outcome)
                .count()
        };

        Self {
            gpa: student.gpa,
            earned_credits,
            required_credits,
            remaining_credits: required_credits.saturating_sub(earned_credits),
            graduation_percent,
            passed_count: count(CourseOutcome::Passed),
            failed_count: count(CourseOutcome::Failed),
        }
    }

    pub fn is_complete(&self) -> bool {
        self.required_credits > 0 && self.remaining_credits == 0
    }
}

/// History ordered newest semester first.
pub fn history_by_most_recent(course_history: &[CourseHistoryEntry]) -> Vec<&CourseHistoryEntry> {
    let mut ordered: Vec<&CourseHistoryEntry> = course_history.iter().collect();
    ordered.sort_by(|a, b| {
        b.semester
            .year
            .cmp(&a.semester.year)
            .then_with(|| b.semester.order_in_year.cmp(&a.semester.order_in_year))
    });
    ordered
}
