use std::fmt;

use serde::{Deserialize, Serialize};

use crate::time::{normalize_weekday, parse_time_range};

/// Catalog identifier for a course.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CourseId(pub u32);

/// Identifier of a section, unique within its course.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SectionId(pub u32);

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SemesterId(pub u32);

/// Identifier wrapper for active enrollments.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EnrollmentId(pub String);

impl fmt::Display for CourseId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl fmt::Display for SectionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl fmt::Display for EnrollmentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Reference to the course that must be passed first. Opaque to the evaluator: it is never
/// resolved against the catalog.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CoursePrerequisite {
    pub id: CourseId,
    pub code: String,
    pub name: String,
}

/// Inclusive range of grade levels allowed to take a course.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct GradeLevelRange {
    pub min: i32,
    pub max: i32,
}

impl GradeLevelRange {
    pub fn contains(&self, grade_level: i32) -> bool {
        grade_level >= self.min && grade_level <= self.max
    }

    /// Renders `10` for a single grade and `10-12` for a span.
    pub fn label(&self) -> String {
        if self.min == self.max {
            self.min.to_string()
        } else {
            format!("{}-{}", self.min, self.max)
        }
    }
}

/// Immutable catalog snapshot of a course and its offered sections.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Course {
    pub id: CourseId,
    pub code: String,
    pub name: String,
    pub credits: u32,
    pub hours_per_week: u32,
    pub grade_level: GradeLevelRange,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub prerequisite: Option<CoursePrerequisite>,
    #[serde(default)]
    pub available_sections: Vec<CourseSection>,
}

impl Course {
    pub fn section(&self, section_id: SectionId) -> Option<&CourseSection> {
        self.available_sections
            .iter()
            .find(|section| section.id == section_id)
    }

    /// Every meeting across all offered sections.
    pub fn meeting_times(&self) -> impl Iterator<Item = &MeetingTime> {
        self.available_sections
            .iter()
            .flat_map(|section| section.meeting_times.iter())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SectionTeacher {
    pub id: u32,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CourseSection {
    pub id: SectionId,
    pub teacher: SectionTeacher,
    #[serde(default)]
    pub meeting_times: Vec<MeetingTime>,
    pub capacity: u32,
    pub enrolled_count: u32,
}

impl CourseSection {
    pub fn is_full(&self) -> bool {
        self.enrolled_count >= self.capacity
    }

    pub fn seats_remaining(&self) -> u32 {
        self.capacity.saturating_sub(self.enrolled_count)
    }
}

/// Weekly meeting of a section. `day_of_week` is free text; comparisons go through
/// [`MeetingTime::weekday`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MeetingTime {
    pub day_of_week: String,
    pub start_time: String,
    pub end_time: String,
}

impl MeetingTime {
    pub fn weekday(&self) -> String {
        normalize_weekday(&self.day_of_week)
    }

    /// Start and end in minutes after midnight, or `None` for malformed or inverted ranges.
    pub fn minutes(&self) -> Option<(u32, u32)> {
        parse_time_range(&self.start_time, &self.end_time)
    }

    /// Two meetings overlap when they share a weekday and their `[start, end)` intervals
    /// intersect. Back-to-back meetings do not overlap.
    pub fn overlaps(&self, other: &MeetingTime) -> bool {
        if self.weekday() != other.weekday() {
            return false;
        }

        match (self.minutes(), other.minutes()) {
            (Some((start1, end1)), Some((start2, end2))) => start1 < end2 && end1 > start2,
            _ => false,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Semester {
    pub id: SemesterId,
    pub name: String,
    pub year: i32,
    pub order_in_year: u32,
}

/// Active commitment of the student to one section of one course.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Enrollment {
    pub id: EnrollmentId,
    pub course: Course,
    pub course_section: CourseSection,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub semester: Option<Semester>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CourseOutcome {
    Passed,
    Failed,
}

impl CourseOutcome {
    pub const fn label(self) -> &'static str {
        match self {
            Self::Passed => "passed",
            Self::Failed => "failed",
        }
    }
}

/// Terminal academic outcome for a past course, written by the registrar.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CourseHistoryEntry {
    pub id: u32,
    pub course_id: CourseId,
    pub course_name: String,
    pub semester: Semester,
    pub status: CourseOutcome,
}

impl CourseHistoryEntry {
    pub fn is_passed(&self) -> bool {
        self.status == CourseOutcome::Passed
    }
}

/// Returns true when the history holds a passed outcome for `course_id`.
pub fn has_passed(course_history: &[CourseHistoryEntry], course_id: CourseId) -> bool {
    course_history
        .iter()
        .any(|entry| entry.course_id == course_id && entry.is_passed())
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreditSummary {
    pub earned: u32,
    pub max: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StudentOptions {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_courses_per_semester: Option<u32>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Student {
    pub id: u32,
    pub first_name: String,
    pub last_name: String,
    #[serde(default)]
    pub email: String,
    pub grade_level: i32,
    pub gpa: f32,
    pub credits: CreditSummary,
    #[serde(default)]
    pub options: StudentOptions,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub active_semester: Option<Semester>,
}

impl Student {
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn meeting(day: &str, start: &str, end: &str) -> MeetingTime {
        MeetingTime {
            day_of_week: day.to_string(),
            start_time: start.to_string(),
            end_time: end.to_string(),
        }
    }

    #[test]
    fn grade_range_label_collapses_single_grade() {
        assert_eq!(GradeLevelRange { min: 10, max: 10 }.label(), "10");
        assert_eq!(GradeLevelRange { min: 10, max: 12 }.label(), "10-12");
    }

    #[test]
    fn overlap_ignores_weekday_case_and_whitespace() {
        let a = meeting("Monday", "09:00", "10:00");
        let b = meeting("  monday ", "09:30", "10:30");
        assert!(a.overlaps(&b));
        assert!(b.overlaps(&a));
    }

    #[test]
    fn back_to_back_meetings_do_not_overlap() {
        let a = meeting("tuesday", "09:00", "10:00");
        let b = meeting("tuesday", "10:00", "11:00");
        assert!(!a.overlaps(&b));
        assert!(!b.overlaps(&a));
    }

    #[test]
    fn malformed_or_inverted_meetings_never_overlap() {
        let valid = meeting("friday", "09:00", "12:00");
        assert!(!valid.overlaps(&meeting("friday", "10:00", "bogus")));
        assert!(!valid.overlaps(&meeting("friday", "11:00", "10:00")));
    }

    #[test]
    fn full_sections_report_no_remaining_seats() {
        let section = CourseSection {
            id: SectionId(1),
            teacher: SectionTeacher {
                id: 3,
                name: "Ada Byron".to_string(),
            },
            meeting_times: Vec::new(),
            capacity: 20,
            enrolled_count: 23,
        };
        assert!(section.is_full());
        assert_eq!(section.seats_remaining(), 0);
    }

    #[test]
    fn deserializes_camel_case_wire_shape() {
        let payload = serde_json::json!({
            "id": 7,
            "code": "MAT201",
            "name": "Algebra II",
            "credits": 3,
            "hoursPerWeek": 4,
            "gradeLevel": { "min": 10, "max": 12 },
            "prerequisite": { "id": 2, "code": "MAT101", "name": "Algebra I" },
            "availableSections": [{
                "id": 70,
                "teacher": { "id": 1, "name": "Grace Hopper" },
                "meetingTimes": [{ "dayOfWeek": "Monday", "startTime": "09:00", "endTime": "10:00" }],
                "capacity": 25,
                "enrolledCount": 10
            }]
        });

        let course: Course = serde_json::from_value(payload).expect("course parses");
        assert_eq!(course.id, CourseId(7));
        assert_eq!(course.hours_per_week, 4);
        assert_eq!(
            course.prerequisite.as_ref().map(|p| p.id),
            Some(CourseId(2))
        );
        assert_eq!(course.meeting_times().count(), 1);
        assert!(course.section(SectionId(70)).is_some());
    }
}
