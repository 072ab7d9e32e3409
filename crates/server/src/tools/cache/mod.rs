//! Cache-related MCP tools.
//!
//! This module provides tools for inspecting and sweeping the availability cache.

pub mod lookup;
pub mod purge;

pub use lookup::{CacheLookupParams, lookup_impl};
pub use purge::purge_impl;
