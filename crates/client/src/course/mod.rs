//! Course page parsing and term URL generation.
//!
//! Catalog pages live at
//! `/content/<year>-<semester>-<dept>-<course>-<section>`, e.g.
//! `/content/2024-fall-compsci-61a-001-lec-001`.

pub mod grid;

use std::fmt;
use std::sync::LazyLock;

use regex::Regex;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

pub use grid::{TermGrid, TermLink, TermStatus, YearRow};

static COURSE_PATH: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"/content/(\d+)-(spring|summer|fall)-([^-/]+)-([^-/]+)-([^/?#]+)").expect("course path regex")
});

/// Errors from interpreting a page location.
#[derive(Debug, Clone, thiserror::Error)]
pub enum CourseError {
    #[error("not a course page: {0}")]
    NotACoursePage(String),

    #[error("invalid year in {0}")]
    InvalidYear(String),
}

impl From<CourseError> for coursenav_core::Error {
    fn from(err: CourseError) -> Self {
        coursenav_core::Error::NotACoursePage(err.to_string())
    }
}

/// Academic term within a year, in calendar order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "lowercase")]
pub enum Semester {
    Spring,
    Summer,
    Fall,
}

impl Semester {
    pub const ALL: [Semester; 3] = [Semester::Spring, Semester::Summer, Semester::Fall];

    /// Lowercase form used in catalog URLs.
    pub fn slug(self) -> &'static str {
        match self {
            Semester::Spring => "spring",
            Semester::Summer => "summer",
            Semester::Fall => "fall",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Semester::Spring => "Spring",
            Semester::Summer => "Summer",
            Semester::Fall => "Fall",
        }
    }

    pub fn from_slug(slug: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|s| s.slug() == slug)
    }
}

impl fmt::Display for Semester {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// A course offering identified from its catalog page location.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct CourseInfo {
    pub year: i32,
    pub semester: Semester,
    pub dept: String,
    pub course: String,
    pub section_info: String,
    /// Display code, e.g. "COMPSCI 61A".
    pub full_course_code: String,
}

impl CourseInfo {
    /// Parse a full URL or a bare path.
    pub fn parse(location: &str) -> Result<Self, CourseError> {
        let location = location.trim();
        let path = match url::Url::parse(location) {
            Ok(parsed) => parsed.path().to_string(),
            Err(_) => location.to_string(),
        };

        let caps = COURSE_PATH
            .captures(&path)
            .ok_or_else(|| CourseError::NotACoursePage(location.to_string()))?;

        let year = caps[1]
            .parse::<i32>()
            .map_err(|_| CourseError::InvalidYear(location.to_string()))?;
        let semester =
            Semester::from_slug(&caps[2]).ok_or_else(|| CourseError::NotACoursePage(location.to_string()))?;
        let dept = caps[3].to_string();
        let course = caps[4].to_string();
        let section_info = caps[5].to_string();
        let full_course_code = format!("{} {}", dept.to_uppercase(), course.to_uppercase());

        Ok(Self { year, semester, dept, course, section_info, full_course_code })
    }

    /// URL of this course's page for another term.
    pub fn url_for(&self, base: &str, year: i32, semester: Semester) -> String {
        term_url(base, &self.dept, &self.course, &self.section_info, year, semester)
    }

    pub fn is_term(&self, year: i32, semester: Semester) -> bool {
        self.year == year && self.semester == semester
    }
}

/// Catalog URL for a course offering in a given term.
pub fn term_url(base: &str, dept: &str, course: &str, section_info: &str, year: i32, semester: Semester) -> String {
    format!(
        "{}/content/{year}-{}-{dept}-{course}-{section_info}",
        base.trim_end_matches('/'),
        semester.slug()
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_full_url() {
        let info = CourseInfo::parse("https://classes.berkeley.edu/content/2024-fall-compsci-61a-001-lec-001").unwrap();
        assert_eq!(info.year, 2024);
        assert_eq!(info.semester, Semester::Fall);
        assert_eq!(info.dept, "compsci");
        assert_eq!(info.course, "61a");
        assert_eq!(info.section_info, "001-lec-001");
        assert_eq!(info.full_course_code, "COMPSCI 61A");
    }

    #[test]
    fn test_parse_bare_path_ignores_query() {
        let info = CourseInfo::parse("/content/2019-summer-math-1b-lec-002?tab=1").unwrap();
        assert_eq!(info.semester, Semester::Summer);
        assert_eq!(info.section_info, "lec-002");
    }

    #[test]
    fn test_parse_rejects_other_pages() {
        assert!(matches!(
            CourseInfo::parse("https://classes.berkeley.edu/search/class"),
            Err(CourseError::NotACoursePage(_))
        ));
        assert!(matches!(
            CourseInfo::parse("/content/2024-winter-compsci-61a-lec-001"),
            Err(CourseError::NotACoursePage(_))
        ));
    }

    #[test]
    fn test_parse_overflowing_year() {
        let result = CourseInfo::parse("/content/99999999999-fall-compsci-61a-lec-001");
        assert!(matches!(result, Err(CourseError::InvalidYear(_))));
    }

    #[test]
    fn test_term_url() {
        let url = term_url("https://classes.berkeley.edu/", "compsci", "61a", "lec-001", 2021, Semester::Spring);
        assert_eq!(url, "https://classes.berkeley.edu/content/2021-spring-compsci-61a-lec-001");
    }

    #[test]
    fn test_url_for_round_trips_through_parse() {
        let info = CourseInfo::parse("/content/2024-fall-compsci-61a-lec-001").unwrap();
        let other = CourseInfo::parse(&info.url_for("https://classes.berkeley.edu", 2018, Semester::Summer)).unwrap();
        assert_eq!(other.year, 2018);
        assert_eq!(other.semester, Semester::Summer);
        assert_eq!(other.full_course_code, info.full_course_code);
        assert!(!info.is_term(2018, Semester::Summer));
        assert!(info.is_term(2024, Semester::Fall));
    }

    #[test]
    fn test_course_error_into_core_error() {
        let err: coursenav_core::Error = CourseError::NotACoursePage("/x".into()).into();
        assert!(err.to_string().starts_with("NOT_A_COURSE_PAGE"));
    }
}
