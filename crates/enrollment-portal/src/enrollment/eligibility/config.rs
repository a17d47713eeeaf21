use serde::{Deserialize, Serialize};

pub const DEFAULT_MAX_COURSES_PER_SEMESTER: u32 = 5;

/// Portal-wide settings applied when a student record leaves a rule unconfigured.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EligibilityConfig {
    pub default_max_courses_per_semester: u32,
}

impl Default for EligibilityConfig {
    fn default() -> Self {
        Self {
            default_max_courses_per_semester: DEFAULT_MAX_COURSES_PER_SEMESTER,
        }
    }
}
