//! Term grid: every term of a course across a span of years.

use std::collections::HashMap;

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use super::{CourseInfo, Semester};
use crate::probe::cache_key;
use crate::sweep::Resolution;

/// Display state of one term link.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum TermStatus {
    /// The page being viewed.
    Current,
    /// Availability not resolved yet.
    Checking,
    Available,
    Unavailable,
}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct TermLink {
    pub year: i32,
    pub semester: Semester,
    pub url: String,
    pub status: TermStatus,
}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct YearRow {
    pub year: i32,
    pub terms: Vec<TermLink>,
}

/// Newest year first, Spring/Summer/Fall within each year.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct TermGrid {
    pub course: CourseInfo,
    pub rows: Vec<YearRow>,
}

impl TermGrid {
    /// Links are stored in canonical form so they match cache keys.
    pub fn build(course: &CourseInfo, base: &str, first_year: i32, last_year: i32) -> Self {
        let rows = (first_year..=last_year)
            .rev()
            .map(|year| YearRow {
                year,
                terms: Semester::ALL
                    .into_iter()
                    .map(|semester| TermLink {
                        year,
                        semester,
                        url: cache_key(&course.url_for(base, year, semester)),
                        status: if course.is_term(year, semester) { TermStatus::Current } else { TermStatus::Checking },
                    })
                    .collect(),
            })
            .collect();

        Self { course: course.clone(), rows }
    }

    pub fn links(&self) -> impl Iterator<Item = &TermLink> {
        self.rows.iter().flat_map(|row| row.terms.iter())
    }

    /// URLs still awaiting resolution, in grid order.
    pub fn candidates(&self) -> Vec<String> {
        self.links()
            .filter(|link| link.status == TermStatus::Checking)
            .map(|link| link.url.clone())
            .collect()
    }

    /// Mark links according to resolved availability. The current term is left alone.
    pub fn apply<'a>(&mut self, resolutions: impl IntoIterator<Item = &'a Resolution>) {
        let resolved: HashMap<&str, bool> = resolutions.into_iter().map(|r| (r.id.as_str(), r.exists)).collect();

        for link in self.rows.iter_mut().flat_map(|row| row.terms.iter_mut()) {
            if link.status == TermStatus::Current {
                continue;
            }
            if let Some(&exists) = resolved.get(link.url.as_str()) {
                link.status = if exists { TermStatus::Available } else { TermStatus::Unavailable };
            }
        }
    }

    pub fn count(&self, status: TermStatus) -> usize {
        self.links().filter(|link| link.status == status).count()
    }
}
