use std::collections::HashMap;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use super::domain::{
    Course, CourseHistoryEntry, CourseId, Enrollment, EnrollmentId, SectionId, SemesterId,
    Student,
};
use super::eligibility::{
    Eligibility, EligibilityConfig, EligibilityContext, EligibilityError, EligibilityEvaluator,
    EligibilityView,
};
use super::explore::{filter_and_sort_courses, CourseFilter};
use super::progress::{history_by_most_recent, DegreeProgress};
use super::provider::{PortalDataProvider, ProviderError};
use super::scheduler::{scheduler_events, SchedulerEvent};
use super::status::{course_status, CourseStatusReport};

/// Service composing the data provider with the eligibility evaluator.
pub struct EnrollmentPortalService<P> {
    provider: Arc<P>,
    evaluator: Arc<EligibilityEvaluator>,
}

const ENROLLMENT_ID_PREFIX: &str = "enr-";
const INSERT_ATTEMPTS: usize = 3;

/// First `enr-NNNNNN` id after the highest one already held. Ids in other formats are ignored.
fn next_enrollment_id(existing: &[Enrollment]) -> EnrollmentId {
    let highest = existing
        .iter()
        .filter_map(|enrollment| enrollment.id.0.strip_prefix(ENROLLMENT_ID_PREFIX))
        .filter(|suffix| !suffix.is_empty() && suffix.bytes().all(|b| b.is_ascii_digit()))
        .filter_map(|suffix| suffix.parse::<u64>().ok())
        .max()
        .unwrap_or(0);
    EnrollmentId(format!("{ENROLLMENT_ID_PREFIX}{:06}", highest.saturating_add(1)))
}

/// Collections loaded once per request.
struct PortalState {
    student: Student,
    courses: Vec<Course>,
    enrollments: Vec<Enrollment>,
    course_history: Vec<CourseHistoryEntry>,
}

impl PortalState {
    fn context(&self) -> EligibilityContext<'_> {
        EligibilityContext::new(&self.enrollments, &self.course_history, &self.student)
    }

    fn course(&self, course_id: CourseId) -> Result<&Course, PortalServiceError> {
        self.courses
            .iter()
            .find(|course| course.id == course_id)
            .ok_or(PortalServiceError::CourseNotFound(course_id))
    }
}

/// Enrollments that count against the current semester. Without an active semester every
/// enrollment counts; enrollments that carry no semester always count.
fn current_enrollments(student: &Student, enrollments: Vec<Enrollment>) -> Vec<Enrollment> {
    let Some(active) = student.active_semester.as_ref() else {
        return enrollments;
    };

    enrollments
        .into_iter()
        .filter(|enrollment| {
            enrollment
                .semester
                .as_ref()
                .map_or(true, |semester| semester.id == active.id)
        })
        .collect()
}

impl<P> EnrollmentPortalService<P>
where
    P: PortalDataProvider + 'static,
{
    pub fn new(provider: Arc<P>, config: EligibilityConfig) -> Self {
        Self {
            provider,
            evaluator: Arc::new(EligibilityEvaluator::new(config)),
        }
    }

    pub fn evaluator(&self) -> &EligibilityEvaluator {
        &self.evaluator
    }

    fn load(&self) -> Result<PortalState, PortalServiceError> {
        let student = self.provider.student()?;
        let enrollments = current_enrollments(&student, self.provider.enrollments()?);

        Ok(PortalState {
            courses: self.provider.courses()?,
            course_history: self.provider.course_history()?,
            enrollments,
            student,
        })
    }

    /// Advisory eligibility verdict for one catalog course.
    pub fn eligibility(
        &self,
        course_id: CourseId,
    ) -> Result<CourseEligibilityView, PortalServiceError> {
        let state = self.load()?;
        let course = state.course(course_id)?;
        let verdict = self.evaluator.evaluate(course, &state.context());

        Ok(CourseEligibilityView::new(course, &verdict))
    }

    pub fn student(&self) -> Result<Student, PortalServiceError> {
        Ok(self.provider.student()?)
    }

    /// Verdict for every catalog course, in catalog order. Passed courses are kept.
    pub fn catalog_eligibility(&self) -> Result<Vec<CourseEligibilityView>, PortalServiceError> {
        let state = self.load()?;
        let context = state.context();

        Ok(state
            .courses
            .iter()
            .map(|course| {
                CourseEligibilityView::new(course, &self.evaluator.evaluate(course, &context))
            })
            .collect())
    }

    /// Explore page rows in display order, each carrying its verdict.
    pub fn explore(
        &self,
        filter: &CourseFilter,
    ) -> Result<Vec<ExploreCourseView>, PortalServiceError> {
        let state = self.load()?;
        let context = state.context();
        let mut verdicts: HashMap<CourseId, Eligibility> = HashMap::new();

        let ordered = filter_and_sort_courses(
            &state.courses,
            filter,
            &state.course_history,
            |course| {
                let verdict = self.evaluator.evaluate(course, &context);
                verdicts.insert(course.id, verdict.clone());
                verdict
            },
        );

        Ok(ordered
            .into_iter()
            .map(|course| {
                let verdict = verdicts
                    .get(&course.id)
                    .cloned()
                    .unwrap_or(Eligibility::Eligible);
                ExploreCourseView {
                    course: course.clone(),
                    eligibility: verdict.view(),
                }
            })
            .collect())
    }

    /// Courses that could fill the empty calendar cell at `weekday`/`start_time`.
    pub fn slot_courses(
        &self,
        weekday: &str,
        start_time: &str,
    ) -> Result<Vec<CourseSummary>, PortalServiceError> {
        let state = self.load()?;
        let index = self.evaluator.slot_index(&state.courses, &state.context());

        Ok(index
            .courses_at(weekday, start_time)
            .iter()
            .map(|course| CourseSummary::from(*course))
            .collect())
    }

    pub fn schedule_events(&self) -> Result<Vec<SchedulerEvent>, PortalServiceError> {
        let state = self.load()?;
        Ok(scheduler_events(&state.enrollments))
    }

    pub fn course_status(
        &self,
        course_id: CourseId,
        semester_id: Option<SemesterId>,
    ) -> Result<CourseStatusReport, PortalServiceError> {
        let enrollments = self.provider.enrollments()?;
        let course_history = self.provider.course_history()?;
        Ok(course_status(course_id, &enrollments, &course_history, semester_id))
    }

    pub fn progress(&self) -> Result<DegreeProgress, PortalServiceError> {
        let student = self.provider.student()?;
        let course_history = self.provider.course_history()?;
        Ok(DegreeProgress::compute(&student, &course_history))
    }

    /// Course history, newest semester first.
    pub fn course_history(&self) -> Result<Vec<CourseHistoryEntry>, PortalServiceError> {
        let course_history = self.provider.course_history()?;
        Ok(history_by_most_recent(&course_history)
            .into_iter()
            .cloned()
            .collect())
    }

    /// Enroll the student in a section. Enrolling again in a course the student already holds
    /// returns the existing enrollment unchanged.
    pub fn enroll(
        &self,
        course_id: CourseId,
        section_id: SectionId,
    ) -> Result<EnrollOutcome, PortalServiceError> {
        let state = self.load()?;
        let course = state.course(course_id)?;
        let section = course
            .section(section_id)
            .ok_or(PortalServiceError::SectionNotFound {
                course_id,
                section_id,
            })?;

        if let Some(existing) = state
            .enrollments
            .iter()
            .find(|enrollment| enrollment.course.id == course_id)
        {
            return Ok(EnrollOutcome {
                enrollment: existing.clone(),
                created: false,
            });
        }

        if let Eligibility::Ineligible(reason) = self.evaluator.evaluate(course, &state.context()) {
            return Err(PortalServiceError::Ineligible(reason));
        }

        if section.is_full() {
            return Err(PortalServiceError::SectionFull { section_id });
        }

        let stored = self.insert_with_fresh_id(Enrollment {
            id: EnrollmentId(String::new()),
            course: course.clone(),
            course_section: section.clone(),
            semester: state.student.active_semester.clone(),
        })?;

        info!(
            enrollment_id = %stored.id.0,
            course_id = course_id.0,
            section_id = section_id.0,
            "student enrolled"
        );

        Ok(EnrollOutcome {
            enrollment: stored,
            created: true,
        })
    }

    /// Numbers `enrollment` after every enrollment the provider holds, across all semesters.
    /// A concurrent insert that takes the same id is retried with a fresh one.
    fn insert_with_fresh_id(
        &self,
        mut enrollment: Enrollment,
    ) -> Result<Enrollment, PortalServiceError> {
        let mut attempt = 1;
        loop {
            enrollment.id = next_enrollment_id(&self.provider.enrollments()?);
            match self.provider.insert_enrollment(enrollment.clone()) {
                Err(ProviderError::Conflict) if attempt < INSERT_ATTEMPTS => {
                    debug!(enrollment_id = %enrollment.id.0, attempt, "enrollment id taken");
                    attempt += 1;
                }
                result => return Ok(result?),
            }
        }
    }

    pub fn unenroll(&self, enrollment_id: &EnrollmentId) -> Result<Enrollment, PortalServiceError> {
        let removed = self
            .provider
            .remove_enrollment(enrollment_id)?
            .ok_or_else(|| PortalServiceError::EnrollmentNotFound(enrollment_id.clone()))?;

        info!(
            enrollment_id = %removed.id.0,
            course_id = removed.course.id.0,
            "student unenrolled"
        );
        Ok(removed)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EnrollOutcome {
    pub enrollment: Enrollment,
    pub created: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CourseSummary {
    pub id: CourseId,
    pub code: String,
    pub name: String,
    pub credits: u32,
    pub hours_per_week: u32,
}

impl From<&Course> for CourseSummary {
    fn from(course: &Course) -> Self {
        Self {
            id: course.id,
            code: course.code.clone(),
            name: course.name.clone(),
            credits: course.credits,
            hours_per_week: course.hours_per_week,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CourseEligibilityView {
    pub course: CourseSummary,
    #[serde(flatten)]
    pub eligibility: EligibilityView,
}

impl CourseEligibilityView {
    pub fn new(course: &Course, verdict: &Eligibility) -> Self {
        Self {
            course: CourseSummary::from(course),
            eligibility: verdict.view(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExploreCourseView {
    pub course: Course,
    #[serde(flatten)]
    pub eligibility: EligibilityView,
}

/// Error raised by the portal service.
#[derive(Debug, thiserror::Error)]
pub enum PortalServiceError {
    #[error("course {0} not found")]
    CourseNotFound(CourseId),
    #[error("section {section_id} not found for course {course_id}")]
    SectionNotFound {
        course_id: CourseId,
        section_id: SectionId,
    },
    #[error("enrollment {0} not found")]
    EnrollmentNotFound(EnrollmentId),
    #[error("{0}")]
    Ineligible(EligibilityError),
    #[error("section {section_id} is full")]
    SectionFull { section_id: SectionId },
    #[error(transparent)]
    Provider(#[from] ProviderError),
}
