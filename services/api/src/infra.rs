use enrollment_portal::enrollment::{
    Course, CourseHistoryEntry, CourseId, CourseOutcome, CoursePrerequisite, CourseSection,
    CreditSummary, Enrollment, EnrollmentId, GradeLevelRange, MeetingTime, PortalDataProvider,
    PortalSnapshot, ProviderError, SectionId, SectionTeacher, Semester, SemesterId, Student,
    StudentOptions,
};
use enrollment_portal::error::AppError;
use metrics_exporter_prometheus::PrometheusHandle;
use std::path::Path;
use std::sync::atomic::AtomicBool;
use std::sync::{Arc, Mutex};

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) readiness: Arc<AtomicBool>,
    pub(crate) metrics: Arc<PrometheusHandle>,
}

/// Process-local portal data seeded from a snapshot.
#[derive(Clone)]
pub(crate) struct InMemoryPortalProvider {
    snapshot: Arc<Mutex<PortalSnapshot>>,
}

impl InMemoryPortalProvider {
    pub(crate) fn new(snapshot: PortalSnapshot) -> Self {
        Self {
            snapshot: Arc::new(Mutex::new(snapshot)),
        }
    }

    fn read<T>(&self, f: impl FnOnce(&PortalSnapshot) -> T) -> T {
        let guard = self.snapshot.lock().expect("portal mutex poisoned");
        f(&guard)
    }
}

impl PortalDataProvider for InMemoryPortalProvider {
    fn student(&self) -> Result<Student, ProviderError> {
        Ok(self.read(|snapshot| snapshot.student.clone()))
    }

    fn courses(&self) -> Result<Vec<Course>, ProviderError> {
        Ok(self.read(|snapshot| snapshot.courses.clone()))
    }

    fn enrollments(&self) -> Result<Vec<Enrollment>, ProviderError> {
        Ok(self.read(|snapshot| snapshot.enrollments.clone()))
    }

    fn course_history(&self) -> Result<Vec<CourseHistoryEntry>, ProviderError> {
        Ok(self.read(|snapshot| snapshot.course_history.clone()))
    }

    fn insert_enrollment(&self, enrollment: Enrollment) -> Result<Enrollment, ProviderError> {
        let mut guard = self.snapshot.lock().expect("portal mutex poisoned");
        if guard
            .enrollments
            .iter()
            .any(|existing| existing.id == enrollment.id)
        {
            return Err(ProviderError::Conflict);
        }
        guard.enrollments.push(enrollment.clone());
        Ok(enrollment)
    }

    fn remove_enrollment(&self, id: &EnrollmentId) -> Result<Option<Enrollment>, ProviderError> {
        let mut guard = self.snapshot.lock().expect("portal mutex poisoned");
        let position = guard
            .enrollments
            .iter()
            .position(|existing| &existing.id == id);
        Ok(position.map(|index| guard.enrollments.remove(index)))
    }
}

/// Reads the snapshot at `path`, or falls back to the bundled sample data.
pub(crate) fn load_snapshot(path: Option<&Path>) -> Result<PortalSnapshot, AppError> {
    match path {
        Some(path) => Ok(PortalSnapshot::from_path(path)?),
        None => Ok(sample_snapshot()),
    }
}

fn meeting(day: &str, start: &str, end: &str) -> MeetingTime {
    MeetingTime {
        day_of_week: day.to_string(),
        start_time: start.to_string(),
        end_time: end.to_string(),
    }
}

fn section(
    id: u32,
    teacher: &str,
    meetings: Vec<MeetingTime>,
    enrolled_count: u32,
) -> CourseSection {
    CourseSection {
        id: SectionId(id),
        teacher: SectionTeacher {
            id: id * 7,
            name: teacher.to_string(),
        },
        meeting_times: meetings,
        capacity: 24,
        enrolled_count,
    }
}

fn course(
    id: u32,
    code: &str,
    name: &str,
    credits: u32,
    grades: (i32, i32),
    prerequisite: Option<(u32, &str, &str)>,
    sections: Vec<CourseSection>,
) -> Course {
    Course {
        id: CourseId(id),
        code: code.to_string(),
        name: name.to_string(),
        credits,
        hours_per_week: credits + 1,
        grade_level: GradeLevelRange {
            min: grades.0,
            max: grades.1,
        },
        prerequisite: prerequisite.map(|(id, code, name)| CoursePrerequisite {
            id: CourseId(id),
            code: code.to_string(),
            name: name.to_string(),
        }),
        available_sections: sections,
    }
}

fn fall_2025() -> Semester {
    Semester {
        id: SemesterId(6),
        name: "Fall 2025".to_string(),
        year: 2025,
        order_in_year: 2,
    }
}

/// Grade 10 student midway through the fall term with a small catalog that exercises every
/// eligibility rule.
pub(crate) fn sample_snapshot() -> PortalSnapshot {
    let algebra = course(
        1,
        "MAT101",
        "Algebra I",
        3,
        (9, 10),
        None,
        vec![section(
            11,
            "R. Noether",
            vec![
                meeting("Monday", "09:00", "10:00"),
                meeting("Wednesday", "09:00", "10:00"),
            ],
            18,
        )],
    );
    let geometry = course(
        2,
        "MAT201",
        "Geometry",
        3,
        (10, 12),
        Some((1, "MAT101", "Algebra I")),
        vec![section(
            21,
            "E. Euclid",
            vec![meeting("Tuesday", "10:00", "11:30")],
            12,
        )],
    );
    let biology = course(
        3,
        "BIO101",
        "Biology",
        4,
        (9, 12),
        None,
        vec![
            section(
                31,
                "B. McClintock",
                vec![meeting("Monday", "09:30", "10:30")],
                20,
            ),
            section(
                32,
                "B. McClintock",
                vec![meeting("Thursday", "09:30", "11:00")],
                24,
            ),
        ],
    );
    let chemistry = course(
        4,
        "CHE201",
        "Chemistry",
        4,
        (11, 12),
        Some((3, "BIO101", "Biology")),
        vec![section(
            41,
            "M. Curie",
            vec![meeting("Friday", "10:00", "12:00")],
            9,
        )],
    );
    let english = course(
        5,
        "ENG102",
        "World Literature",
        3,
        (9, 12),
        None,
        vec![section(
            51,
            "T. Morrison",
            vec![
                meeting("Tuesday", "13:00", "14:00"),
                meeting("Thursday", "09:00", "10:00"),
            ],
            15,
        )],
    );
    let art = course(
        6,
        "ART110",
        "Studio Drawing",
        2,
        (9, 12),
        None,
        vec![section(
            61,
            "F. Kahlo",
            vec![meeting("Wednesday", "14:00", "15:30")],
            6,
        )],
    );
    let physics = course(
        7,
        "PHY201",
        "Physics",
        4,
        (10, 12),
        Some((2, "MAT201", "Geometry")),
        vec![section(
            71,
            "L. Meitner",
            vec![meeting("Thursday", "13:00", "14:30")],
            24,
        )],
    );

    let history = vec![
        CourseHistoryEntry {
            id: 501,
            course_id: CourseId(1),
            course_name: "Algebra I".to_string(),
            semester: Semester {
                id: SemesterId(5),
                name: "Spring 2025".to_string(),
                year: 2025,
                order_in_year: 1,
            },
            status: CourseOutcome::Passed,
        },
        CourseHistoryEntry {
            id: 502,
            course_id: CourseId(6),
            course_name: "Studio Drawing".to_string(),
            semester: Semester {
                id: SemesterId(5),
                name: "Spring 2025".to_string(),
                year: 2025,
                order_in_year: 1,
            },
            status: CourseOutcome::Failed,
        },
    ];

    let enrollments = vec![Enrollment {
        id: EnrollmentId("enr-seed-01".to_string()),
        course: english.clone(),
        course_section: english.available_sections[0].clone(),
        semester: Some(fall_2025()),
    }];

    PortalSnapshot {
        student: Student {
            id: 42,
            first_name: "Maya".to_string(),
            last_name: "Lin".to_string(),
            email: "maya.lin@example.edu".to_string(),
            grade_level: 10,
            gpa: 3.4,
            credits: CreditSummary {
                earned: 18,
                max: 48,
            },
            options: StudentOptions::default(),
            active_semester: Some(fall_2025()),
        },
        courses: vec![algebra, geometry, biology, chemistry, english, art, physics],
        enrollments,
        course_history: history,
    }
}
