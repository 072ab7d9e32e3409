//! course_terms tool implementation.
//!
//! Builds the term grid for a course page and annotates each term with its
//! availability, using the cache before probing the catalog.

use rmcp::{ErrorData as McpError, model::CallToolResult};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use coursenav_client::Navigator;
use coursenav_core::Error;

use super::json_result;

/// Parameters for the course_terms tool.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct CourseTermsParams {
    /// URL (or path) of a course page, e.g.
    /// https://classes.berkeley.edu/content/2024-fall-compsci-61a-lec-001
    pub url: String,
}

/// Implementation of the course_terms tool.
pub async fn course_terms_impl(nav: &Navigator, params: CourseTermsParams) -> Result<CallToolResult, McpError> {
    if params.url.trim().is_empty() {
        return Err(Error::InvalidInput("url cannot be empty".into()).into());
    }

    let terms = nav.check(&params.url, |_| {}).await?;
    json_result(&terms)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tools::test_support::{navigator, output};
    use coursenav_client::{CourseTerms, TermStatus};

    #[tokio::test]
    async fn test_course_terms_annotates_grid() {
        let nav = navigator().await;
        let params = CourseTermsParams { url: "https://classes.berkeley.edu/content/2024-spring-math-1a-lec-001".into() };

        let result = course_terms_impl(&nav, params).await.unwrap();
        let terms: CourseTerms = output(&result);

        assert_eq!(terms.misses, 5);
        assert_eq!(terms.hits, 0);
        assert_eq!(terms.grid.count(TermStatus::Available), 2);
        assert_eq!(terms.grid.count(TermStatus::Unavailable), 3);
        assert_eq!(terms.grid.count(TermStatus::Current), 1);
    }

    #[tokio::test]
    async fn test_course_terms_second_call_hits_cache() {
        let nav = navigator().await;
        let url = "/content/2024-spring-math-1a-lec-001".to_string();

        course_terms_impl(&nav, CourseTermsParams { url: url.clone() }).await.unwrap();
        let result = course_terms_impl(&nav, CourseTermsParams { url }).await.unwrap();
        let terms: CourseTerms = output(&result);

        assert_eq!((terms.hits, terms.misses), (5, 0));
    }

    #[tokio::test]
    async fn test_course_terms_rejects_bad_input() {
        let nav = navigator().await;

        let empty = course_terms_impl(&nav, CourseTermsParams { url: "  ".into() }).await;
        assert!(empty.is_err());

        let not_course = course_terms_impl(&nav, CourseTermsParams { url: "https://example.edu/about".into() }).await;
        assert_eq!(not_course.unwrap_err().code.0, -32004);
    }
}
