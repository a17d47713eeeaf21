//! Course exploration: passed-course removal, text and meeting-time filters, and the
//! eligible-first ordering shown on the explore page.

use std::cmp::Ordering;
use std::collections::{HashMap, HashSet};

use serde::{Deserialize, Serialize};

use super::domain::{Course, CourseHistoryEntry, CourseId};
use super::eligibility::Eligibility;
use crate::time::{normalize_weekday, parse_time_to_minutes};

/// Weekdays offered as quick toggles in the explore filter bar.
pub const WEEKDAY_FILTER_OPTIONS: [(&str, &str); 5] = [
    ("monday", "Mon"),
    ("tuesday", "Tue"),
    ("wednesday", "Wed"),
    ("thursday", "Thu"),
    ("friday", "Fri"),
];

/// Explore filter state. Owned by whoever renders the explore page and passed explicitly to
/// [`filter_and_sort_courses`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CourseFilter {
    pub search: String,
    pub from_time: Option<String>,
    pub until_time: Option<String>,
    pub weekdays: Vec<String>,
}

impl CourseFilter {
    pub fn set_search(&mut self, value: impl Into<String>) {
        self.search = value.into();
    }

    pub fn set_from_time(&mut self, value: Option<String>) {
        self.from_time = value;
    }

    pub fn set_until_time(&mut self, value: Option<String>) {
        self.until_time = value;
    }

    /// Adds the normalized weekday, or removes it when already selected.
    pub fn toggle_weekday(&mut self, day: &str) {
        let day = normalize_weekday(day);
        if let Some(position) = self.weekdays.iter().position(|existing| *existing == day) {
            self.weekdays.remove(position);
        } else {
            self.weekdays.push(day);
        }
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }

    fn meeting_time_criteria(&self) -> MeetingTimeCriteria {
        // Blank and unparsable bounds leave that side of the window open.
        let bound = |value: &Option<String>| {
            value
                .as_deref()
                .map(str::trim)
                .filter(|value| !value.is_empty())
                .and_then(parse_time_to_minutes)
        };

        MeetingTimeCriteria {
            weekdays: self
                .weekdays
                .iter()
                .map(|day| normalize_weekday(day))
                .collect(),
            from_minutes: bound(&self.from_time),
            until_minutes: bound(&self.until_time),
        }
    }
}

struct MeetingTimeCriteria {
    weekdays: HashSet<String>,
    from_minutes: Option<u32>,
    until_minutes: Option<u32>,
}

impl MeetingTimeCriteria {
    fn is_active(&self) -> bool {
        !self.weekdays.is_empty() || self.from_minutes.is_some() || self.until_minutes.is_some()
    }

    fn matches(&self, course: &Course) -> bool {
        if !self.is_active() {
            return true;
        }

        course.meeting_times().any(|meeting| {
            if !self.weekdays.is_empty() && !self.weekdays.contains(&meeting.weekday()) {
                return false;
            }

            let Some((start, end)) = meeting.minutes() else {
                return false;
            };

            self.from_minutes.map_or(true, |from| start >= from)
                && self.until_minutes.map_or(true, |until| end <= until)
        })
    }
}

fn matches_search(course: &Course, normalized_search: &str) -> bool {
    normalized_search.is_empty()
        || course.name.to_lowercase().contains(normalized_search)
        || course.code.to_lowercase().contains(normalized_search)
}

/// Eligible first, then name, code, and id so the order is total.
fn explore_order(a: &Course, b: &Course, eligibility: &HashMap<CourseId, bool>) -> Ordering {
    let a_eligible = eligibility.get(&a.id).copied().unwrap_or(false);
    let b_eligible = eligibility.get(&b.id).copied().unwrap_or(false);

    b_eligible
        .cmp(&a_eligible)
        .then_with(|| a.name.cmp(&b.name))
        .then_with(|| a.code.cmp(&b.code))
        .then_with(|| a.id.cmp(&b.id))
}

/// Filters and orders `courses` for the explore page.
///
/// Courses already passed are always dropped. `evaluate` runs once per surviving course and the
/// verdicts are reused by the sort.
pub fn filter_and_sort_courses<'a, F>(
    courses: &'a [Course],
    filter: &CourseFilter,
    course_history: &[CourseHistoryEntry],
    mut evaluate: F,
) -> Vec<&'a Course>
where
    F: FnMut(&Course) -> Eligibility,
{
    let passed: HashSet<CourseId> = course_history
        .iter()
        .filter(|entry| entry.is_passed())
        .map(|entry| entry.course_id)
        .collect();
    let search = filter.search.trim().to_lowercase();
    let criteria = filter.meeting_time_criteria();

    let mut filtered: Vec<&Course> = courses
        .iter()
        .filter(|course| !passed.contains(&course.id))
        .filter(|course| matches_search(course, &search))
        .filter(|course| criteria.matches(course))
        .collect();

    let mut eligibility = HashMap::with_capacity(filtered.len());
    for course in &filtered {
        eligibility
            .entry(course.id)
            .or_insert_with(|| evaluate(*course).is_eligible());
    }

    filtered.sort_by(|a, b| explore_order(a, b, &eligibility));
    filtered
}
