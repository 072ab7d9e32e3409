//! cache_purge tool implementation.
//!
//! Removes expired availability entries and persists the result.

use rmcp::{ErrorData as McpError, model::CallToolResult};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use coursenav_client::Navigator;

use crate::tools::json_result;

/// Output from the cache_purge tool.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct CachePurgeOutput {
    /// Number of expired entries removed.
    pub removed: usize,
    /// Entries remaining in the cache.
    pub remaining: usize,
}

/// Implementation of the cache_purge tool.
pub async fn purge_impl(nav: &Navigator) -> Result<CallToolResult, McpError> {
    let removed = nav.purge_expired().await;
    json_result(&CachePurgeOutput { removed, remaining: nav.cache().len() })
}
