use std::sync::{Arc, Mutex};

use axum::response::Response;
use serde_json::Value;

use crate::enrollment::domain::{
    Course, CourseHistoryEntry, CourseId, CourseOutcome, CoursePrerequisite, CourseSection,
    CreditSummary, Enrollment, EnrollmentId, GradeLevelRange, MeetingTime, SectionId,
    SectionTeacher, Semester, SemesterId, Student, StudentOptions,
};
use crate::enrollment::provider::{PortalDataProvider, ProviderError};
use crate::enrollment::snapshot::PortalSnapshot;
use crate::enrollment::{portal_router, EligibilityConfig, EnrollmentPortalService};

pub(super) fn semester(id: u32, year: i32, order_in_year: u32) -> Semester {
    Semester {
        id: SemesterId(id),
        name: format!("Term {order_in_year} {year}"),
        year,
        order_in_year,
    }
}

pub(super) fn student(grade_level: i32) -> Student {
    Student {
        id: 1,
        first_name: "Maya".to_string(),
        last_name: "Lin".to_string(),
        email: "maya.lin@example.edu".to_string(),
        grade_level,
        gpa: 3.4,
        credits: CreditSummary {
            earned: 12,
            max: 30,
        },
        options: StudentOptions::default(),
        active_semester: None,
    }
}

pub(super) fn meeting(day: &str, start: &str, end: &str) -> MeetingTime {
    MeetingTime {
        day_of_week: day.to_string(),
        start_time: start.to_string(),
        end_time: end.to_string(),
    }
}

pub(super) fn section(id: u32, meetings: Vec<MeetingTime>) -> CourseSection {
    CourseSection {
        id: SectionId(id),
        teacher: SectionTeacher {
            id: 100 + id,
            name: "Grace Hopper".to_string(),
        },
        meeting_times: meetings,
        capacity: 25,
        enrolled_count: 10,
    }
}

/// Course open to grades 9-12 with a single section of the given meetings.
pub(super) fn course(id: u32, code: &str, name: &str, meetings: Vec<MeetingTime>) -> Course {
    Course {
        id: CourseId(id),
        code: code.to_string(),
        name: name.to_string(),
        credits: 3,
        hours_per_week: 3,
        grade_level: GradeLevelRange { min: 9, max: 12 },
        prerequisite: None,
        available_sections: vec![section(id * 10, meetings)],
    }
}

pub(super) fn with_grades(mut course: Course, min: i32, max: i32) -> Course {
    course.grade_level = GradeLevelRange { min, max };
    course
}

pub(super) fn with_prerequisite(mut course: Course, prerequisite: &Course) -> Course {
    course.prerequisite = Some(CoursePrerequisite {
        id: prerequisite.id,
        code: prerequisite.code.clone(),
        name: prerequisite.name.clone(),
    });
    course
}

pub(super) fn enrollment(id: &str, course: &Course) -> Enrollment {
    Enrollment {
        id: EnrollmentId(id.to_string()),
        course: course.clone(),
        course_section: course.available_sections[0].clone(),
        semester: None,
    }
}

pub(super) fn history(id: u32, course: &Course, status: CourseOutcome) -> CourseHistoryEntry {
    CourseHistoryEntry {
        id,
        course_id: course.id,
        course_name: course.name.clone(),
        semester: semester(1, 2024, 1),
        status,
    }
}

pub(super) fn algebra() -> Course {
    course(1, "MAT101", "Algebra I", vec![meeting("Monday", "09:00", "10:00")])
}

pub(super) fn geometry() -> Course {
    with_prerequisite(
        course(2, "MAT201", "Geometry", vec![meeting("Tuesday", "10:00", "11:00")]),
        &algebra(),
    )
}

pub(super) fn biology() -> Course {
    course(3, "BIO101", "Biology", vec![meeting("Monday", "09:30", "10:30")])
}

pub(super) fn chemistry() -> Course {
    course(
        4,
        "CHE101",
        "Chemistry",
        vec![
            meeting("Wednesday", "13:00", "14:30"),
            meeting("Friday", "13:00", "14:00"),
        ],
    )
}

pub(super) fn senior_seminar() -> Course {
    with_grades(
        course(5, "SEM401", "Senior Seminar", vec![meeting("Thursday", "08:00", "09:00")]),
        12,
        12,
    )
}

pub(super) fn snapshot() -> PortalSnapshot {
    PortalSnapshot {
        student: student(10),
        courses: vec![algebra(), geometry(), biology(), chemistry(), senior_seminar()],
        enrollments: Vec::new(),
        course_history: Vec::new(),
    }
}

#[derive(Clone)]
pub(super) struct MemoryProvider {
    pub(super) snapshot: Arc<Mutex<PortalSnapshot>>,
}

impl MemoryProvider {
    pub(super) fn new(snapshot: PortalSnapshot) -> Self {
        Self {
            snapshot: Arc::new(Mutex::new(snapshot)),
        }
    }

    pub(super) fn enrollments_now(&self) -> Vec<Enrollment> {
        self.read(|snapshot| snapshot.enrollments.clone())
    }

    fn read<T>(&self, f: impl FnOnce(&PortalSnapshot) -> T) -> T {
        let guard = self.snapshot.lock().expect("provider mutex poisoned");
        f(&guard)
    }
}

impl PortalDataProvider for MemoryProvider {
    fn student(&self) -> Result<Student, ProviderError> {
        Ok(self.read(|snapshot| snapshot.student.clone()))
    }

    fn courses(&self) -> Result<Vec<Course>, ProviderError> {
        Ok(self.read(|snapshot| snapshot.courses.clone()))
    }

    fn enrollments(&self) -> Result<Vec<Enrollment>, ProviderError> {
        Ok(self.enrollments_now())
    }

    fn course_history(&self) -> Result<Vec<CourseHistoryEntry>, ProviderError> {
        Ok(self.read(|snapshot| snapshot.course_history.clone()))
    }

    fn insert_enrollment(&self, enrollment: Enrollment) -> Result<Enrollment, ProviderError> {
        let mut snapshot = self.snapshot.lock().expect("provider mutex poisoned");
        if snapshot
            .enrollments
            .iter()
            .any(|existing| existing.id == enrollment.id)
        {
            return Err(ProviderError::Conflict);
        }
        snapshot.enrollments.push(enrollment.clone());
        Ok(enrollment)
    }

    fn remove_enrollment(&self, id: &EnrollmentId) -> Result<Option<Enrollment>, ProviderError> {
        let mut snapshot = self.snapshot.lock().expect("provider mutex poisoned");
        let position = snapshot
            .enrollments
            .iter()
            .position(|existing| &existing.id == id);
        Ok(position.map(|index| snapshot.enrollments.remove(index)))
    }
}

/// Reads succeed but every write collides.
pub(super) struct ConflictProvider(pub(super) MemoryProvider);

impl PortalDataProvider for ConflictProvider {
    fn student(&self) -> Result<Student, ProviderError> {
        self.0.student()
    }

    fn courses(&self) -> Result<Vec<Course>, ProviderError> {
        self.0.courses()
    }

    fn enrollments(&self) -> Result<Vec<Enrollment>, ProviderError> {
        self.0.enrollments()
    }

    fn course_history(&self) -> Result<Vec<CourseHistoryEntry>, ProviderError> {
        self.0.course_history()
    }

    fn insert_enrollment(&self, _enrollment: Enrollment) -> Result<Enrollment, ProviderError> {
        Err(ProviderError::Conflict)
    }

    fn remove_enrollment(&self, _id: &EnrollmentId) -> Result<Option<Enrollment>, ProviderError> {
        Err(ProviderError::Conflict)
    }
}

pub(super) struct UnavailableProvider;

impl PortalDataProvider for UnavailableProvider {
    fn student(&self) -> Result<Student, ProviderError> {
        Err(ProviderError::Unavailable("registrar offline".to_string()))
    }

    fn courses(&self) -> Result<Vec<Course>, ProviderError> {
        Err(ProviderError::Unavailable("registrar offline".to_string()))
    }

    fn enrollments(&self) -> Result<Vec<Enrollment>, ProviderError> {
        Err(ProviderError::Unavailable("registrar offline".to_string()))
    }

    fn course_history(&self) -> Result<Vec<CourseHistoryEntry>, ProviderError> {
        Err(ProviderError::Unavailable("registrar offline".to_string()))
    }

    fn insert_enrollment(&self, _enrollment: Enrollment) -> Result<Enrollment, ProviderError> {
        Err(ProviderError::Unavailable("registrar offline".to_string()))
    }

    fn remove_enrollment(&self, _id: &EnrollmentId) -> Result<Option<Enrollment>, ProviderError> {
        Err(ProviderError::Unavailable("registrar offline".to_string()))
    }
}

pub(super) fn build_service(
    snapshot: PortalSnapshot,
) -> (EnrollmentPortalService<MemoryProvider>, MemoryProvider) {
    let provider = MemoryProvider::new(snapshot);
    let service = EnrollmentPortalService::new(
        Arc::new(provider.clone()),
        EligibilityConfig::default(),
    );
    (service, provider)
}

pub(super) fn portal_router_with_snapshot(
    snapshot: PortalSnapshot,
) -> (axum::Router, MemoryProvider) {
    let (service, provider) = build_service(snapshot);
    (portal_router(Arc::new(service)), provider)
}

pub(super) async fn read_json_body(response: Response) -> Value {
    let body = axum::body::to_bytes(response.into_body(), 64 * 1024)
        .await
        .expect("read body");
    serde_json::from_slice(&body).expect("json payload")
}
