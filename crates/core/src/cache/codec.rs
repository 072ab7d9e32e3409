//! Serialized form of the availability slot.
//!
//! Version 1 layout:
//!
//! ```json
//! {"version": 1, "entries": {"<url>": {"exists": true, "recordedAt": 1700000000000}}}
//! ```
//!
//! An unversioned map of `url -> {exists, timestamp}` is read as legacy data.
//! Entries are decoded one at a time so a single malformed record is skipped
//! instead of discarding the whole slot.

use std::collections::HashMap;

use serde::Serialize;
use serde_json::Value;

use super::entry::CacheEntry;
use crate::Error;

/// Current record format version.
pub const FORMAT_VERSION: u64 = 1;

#[derive(Serialize)]
struct SlotRecord<'a> {
    version: u64,
    entries: &'a HashMap<String, CacheEntry>,
}

/// Result of decoding a slot payload.
#[derive(Debug, Default)]
pub struct Decoded {
    pub entries: HashMap<String, CacheEntry>,
    /// Keys whose records could not be decoded.
    pub skipped: Vec<String>,
}

/// Encode the full map as a version 1 record.
pub fn encode(entries: &HashMap<String, CacheEntry>) -> Result<String, Error> {
    serde_json::to_string(&SlotRecord { version: FORMAT_VERSION, entries })
        .map_err(|e| Error::StorePersist(format!("failed to encode cache: {e}")))
}

/// Decode a slot payload.
///
/// # Errors
///
/// Returns `Error::StoreRead` if the payload is not JSON, is not an object,
/// or declares an unsupported version.
pub fn decode(payload: &str) -> Result<Decoded, Error> {
    let root: Value =
        serde_json::from_str(payload).map_err(|e| Error::StoreRead(format!("corrupt cache payload: {e}")))?;

    let Value::Object(mut root) = root else {
        return Err(Error::StoreRead("cache payload is not an object".into()));
    };

    let version = root.get("version").cloned();
    let records = match version {
        None => root,
        Some(v) if v.as_u64() == Some(FORMAT_VERSION) => match root.remove("entries") {
            Some(Value::Object(entries)) => entries,
            Some(_) => return Err(Error::StoreRead("cache entries are not an object".into())),
            None => serde_json::Map::new(),
        },
        Some(v) => return Err(Error::StoreRead(format!("unsupported cache format version: {v}"))),
    };

    let mut decoded = Decoded::default();
    for (key, record) in records {
        match serde_json::from_value::<CacheEntry>(record) {
            Ok(entry) => {
                decoded.entries.insert(key, entry);
            }
            Err(e) => {
                tracing::warn!(key = %key, error = %e, "skipping malformed cache record");
                decoded.skipped.push(key);
            }
        }
    }

    Ok(decoded)
}
