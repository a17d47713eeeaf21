use super::domain::{Course, CourseHistoryEntry, Enrollment, EnrollmentId, Student};

/// Source of the resolved collections the evaluator works on. Implementations wrap whatever
/// fetches and caches portal data; the service never sees transport types.
pub trait PortalDataProvider: Send + Sync {
    fn student(&self) -> Result<Student, ProviderError>;
    fn courses(&self) -> Result<Vec<Course>, ProviderError>;
    fn enrollments(&self) -> Result<Vec<Enrollment>, ProviderError>;
    fn course_history(&self) -> Result<Vec<CourseHistoryEntry>, ProviderError>;
    fn insert_enrollment(&self, enrollment: Enrollment) -> Result<Enrollment, ProviderError>;
    fn remove_enrollment(&self, id: &EnrollmentId) -> Result<Option<Enrollment>, ProviderError>;
}

/// Error enumeration for provider failures.
#[derive(Debug, thiserror::Error)]
pub enum ProviderError {
    #[error("enrollment already exists")]
    Conflict,
    #[error("portal data unavailable: {0}")]
    Unavailable(String),
}
