//! Plain-text rendering of term grids.

use std::fmt::Write;

use coursenav_client::{CourseTerms, TermStatus};
use coursenav_core::CacheEntry;

pub fn mark(exists: bool) -> &'static str {
    if exists { "✓" } else { "✗" }
}

fn cell(status: TermStatus) -> &'static str {
    match status {
        TermStatus::Current => "●",
        TermStatus::Available => "✓",
        TermStatus::Unavailable => "·",
        TermStatus::Checking => "?",
    }
}

/// One line per year, one column per semester.
pub fn grid(terms: &CourseTerms) -> String {
    let mut out = String::new();
    let grid = &terms.grid;

    let _ = writeln!(out, "{}", grid.course.full_course_code);
    let _ = writeln!(out, "        Spring  Summer  Fall");
    for row in &grid.rows {
        let _ = write!(out, "{:<6}", row.year);
        for link in &row.terms {
            let _ = write!(out, "  {:<6}", cell(link.status));
        }
        out.push('\n');
    }

    let _ = writeln!(out);
    for link in grid.links().filter(|l| l.status == TermStatus::Available) {
        let _ = writeln!(out, "{} {}: {}", link.semester, link.year, link.url);
    }

    let _ = writeln!(
        out,
        "\n{} cache hits, {} network requests, {} cached entries",
        terms.hits, terms.misses, terms.cache_size
    );
    out
}

pub fn entry(url: &str, entry: &CacheEntry) -> String {
    let status = if entry.exists { "exists" } else { "not found" };
    format!("{url}: {status} (recorded at {} ms)\n", entry.recorded_at)
}
