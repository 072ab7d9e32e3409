//! cache_lookup tool implementation.
//!
//! Reports the cached availability of a single URL without probing.

use rmcp::{ErrorData as McpError, model::CallToolResult};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use coursenav_client::{Navigator, probe::cache_key};
use coursenav_core::Error;

use crate::tools::json_result;

/// Parameters for the cache_lookup tool.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct CacheLookupParams {
    /// The term URL to look up.
    pub url: String,
}

/// Output from the cache_lookup tool.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct CacheLookupOutput {
    /// Canonical form of the URL used as the cache key.
    pub key: String,
    /// Whether a valid entry was found.
    pub cached: bool,
    /// Cached existence, when present.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub exists: Option<bool>,
    /// When the entry was recorded (epoch milliseconds).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub recorded_at: Option<i64>,
}

/// Implementation of the cache_lookup tool.
pub async fn lookup_impl(nav: &Navigator, params: CacheLookupParams) -> Result<CallToolResult, McpError> {
    if params.url.trim().is_empty() {
        return Err(Error::InvalidInput("url cannot be empty".into()).into());
    }

    let key = cache_key(&params.url);
    let entry = nav.lookup(&key);
    let output = CacheLookupOutput {
        key,
        cached: entry.is_some(),
        exists: entry.map(|e| e.exists),
        recorded_at: entry.map(|e| e.recorded_at),
    };

    json_result(&output)
}
