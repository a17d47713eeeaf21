//! Enrollment eligibility and the course/schedule projections built on it.
//!
//! [`eligibility`] holds the pure rule chain. [`explore`] and [`scheduler`] consume its verdicts
//! to build the explore list and the empty-slot lookup, while [`service`] and [`router`] wire
//! everything to a [`provider::PortalDataProvider`].

pub mod domain;
pub mod eligibility;
pub mod explore;
pub mod progress;
pub mod provider;
pub mod router;
pub mod scheduler;
pub mod service;
pub mod snapshot;
pub mod status;

#[cfg(test)]
mod tests;

pub use domain::{
    Course, CourseHistoryEntry, CourseId, CourseOutcome, CoursePrerequisite, CourseSection,
    CreditSummary, Enrollment, EnrollmentId, GradeLevelRange, MeetingTime, SectionId,
    SectionTeacher, Semester, SemesterId, Student, StudentOptions,
};
pub use eligibility::{
    evaluate_eligibility, Eligibility, EligibilityConfig, EligibilityContext, EligibilityError,
    EligibilityErrorKind, EligibilityEvaluator, EligibilityView,
};
pub use explore::{filter_and_sort_courses, CourseFilter};
pub use progress::DegreeProgress;
pub use provider::{PortalDataProvider, ProviderError};
pub use router::portal_router;
pub use scheduler::{
    build_scheduler_slot_index, build_slot_key, scheduler_events, SchedulerEvent,
    SchedulerSlotIndex,
};
pub use service::{EnrollmentPortalService, PortalServiceError};
pub use snapshot::{PortalSnapshot, SnapshotError};
pub use status::{course_status, CourseStatusReport, CourseStudentStatus};
