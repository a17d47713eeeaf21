use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::domain::{Course, CourseHistoryEntry, CourseId, Enrollment, MeetingTime, Student};
use super::eligibility::{EligibilityContext, EligibilityEvaluator};
use crate::time::{format_minutes_to_time, normalize_weekday, weekday_to_index};

pub const SLOT_INTERVAL_MINUTES: u32 = 60;

/// `"{weekday}|{HH:MM}"` with the weekday normalized.
pub fn build_slot_key(weekday: &str, start_time: &str) -> String {
    format!("{}|{}", normalize_weekday(weekday), start_time)
}

/// Hourly calendar cells covered by a meeting. Keys always sit on the hour: a 09:30 start
/// lands in the `09:00` cell.
fn meeting_slot_keys(meeting: &MeetingTime) -> Vec<String> {
    let weekday = meeting.weekday();
    let Some((start, end)) = meeting.minutes() else {
        return Vec::new();
    };
    if weekday.is_empty() {
        return Vec::new();
    }

    let first_slot = start - start % SLOT_INTERVAL_MINUTES;
    (first_slot..end)
        .step_by(SLOT_INTERVAL_MINUTES as usize)
        .map(|slot| build_slot_key(&weekday, &format_minutes_to_time(i64::from(slot))))
        .collect()
}

/// Courses the student could add to each empty calendar cell.
#[derive(Debug, Clone, Default)]
pub struct SchedulerSlotIndex<'a> {
    slots: BTreeMap<String, Vec<&'a Course>>,
}

impl<'a> SchedulerSlotIndex<'a> {
    pub fn courses_at(&self, weekday: &str, start_time: &str) -> &[&'a Course] {
        self.slots
            .get(&build_slot_key(weekday, start_time))
            .map(Vec::as_slice)
            .unwrap_or_default()
    }

    pub fn get(&self, slot_key: &str) -> Option<&[&'a Course]> {
        self.slots.get(slot_key).map(Vec::as_slice)
    }

    pub fn slot_keys(&self) -> impl Iterator<Item = &str> {
        self.slots.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    fn insert(&mut self, slot_key: String, course: &'a Course) {
        let bucket = self.slots.entry(slot_key).or_default();
        if bucket.iter().all(|existing| existing.id != course.id) {
            bucket.push(course);
        }
    }
}

impl EligibilityEvaluator {
    /// Buckets every eligible course the student is not yet enrolled in by the hourly slots its
    /// section meetings cover.
    pub fn slot_index<'a>(
        &self,
        courses: &'a [Course],
        context: &EligibilityContext<'_>,
    ) -> SchedulerSlotIndex<'a> {
        let mut index = SchedulerSlotIndex::default();

        for course in courses {
            if context.is_enrolled_in(course) || !self.evaluate(course, context).is_eligible() {
                continue;
            }

            for meeting in course.meeting_times() {
                for slot_key in meeting_slot_keys(meeting) {
                    index.insert(slot_key, course);
                }
            }
        }

        index
    }
}

/// Builds the slot index with the default portal configuration.
pub fn build_scheduler_slot_index<'a>(
    courses: &'a [Course],
    enrollments: &[Enrollment],
    course_history: &[CourseHistoryEntry],
    student: &Student,
) -> SchedulerSlotIndex<'a> {
    EligibilityEvaluator::default().slot_index(
        courses,
        &EligibilityContext::new(enrollments, course_history, student),
    )
}

/// Weekly calendar entry for one meeting of an enrolled section.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SchedulerEvent {
    pub id: String,
    pub course_id: CourseId,
    pub title: String,
    pub days_of_week: Vec<u32>,
    pub start_time: String,
    pub end_time: String,
}

/// Projects enrollments onto calendar events. Meetings on unrecognized weekdays are skipped.
pub fn scheduler_events(enrollments: &[Enrollment]) -> Vec<SchedulerEvent> {
    enrollments
        .iter()
        .flat_map(|enrollment| {
            let title = format!("{} - {}", enrollment.course.code, enrollment.course.name);
            enrollment
                .course_section
                .meeting_times
                .iter()
                .filter_map(move |meeting| {
                    let day_index = weekday_to_index(&meeting.day_of_week)?;
                    Some(SchedulerEvent {
                        id: format!(
                            "{}-{}-{}-{}",
                            enrollment.id.0,
                            enrollment.course_section.id.0,
                            day_index,
                            meeting.start_time
                        ),
                        course_id: enrollment.course.id,
                        title: title.clone(),
                        days_of_week: vec![day_index],
                        start_time: meeting.start_time.clone(),
                        end_time: meeting.end_time.clone(),
                    })
                })
        })
        .collect()
}
