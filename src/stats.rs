use crate::api::{ChatResult, CourseStats};
use tracing::warn;

pub const LOAD_FAILED: &str = "Failed to load courses";
pub const NO_COURSES: &str = "No courses available";

/// Read-only summary shown in the sidebar.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum CourseSummary {
    Loading,
    Loaded(CourseStats),
    Unavailable,
}

impl CourseSummary {
    pub fn from_result(result: ChatResult<CourseStats>) -> Self {
        match result {
            Ok(stats) => CourseSummary::Loaded(stats),
            Err(err) => {
                warn!("failed to load course stats: {err}");
                CourseSummary::Unavailable
            }
        }
    }

    pub fn total_label(&self) -> String {
        match self {
            CourseSummary::Loading => "-".to_string(),
            CourseSummary::Loaded(stats) => stats.total_courses.to_string(),
            CourseSummary::Unavailable => "0".to_string(),
        }
    }

    pub fn title_lines(&self) -> Vec<String> {
        match self {
            CourseSummary::Loading => vec!["Loading...".to_string()],
            CourseSummary::Loaded(stats) if stats.course_titles.is_empty() => {
                vec![NO_COURSES.to_string()]
            }
            CourseSummary::Loaded(stats) => stats.course_titles.clone(),
            CourseSummary::Unavailable => vec![LOAD_FAILED.to_string()],
        }
    }
}
