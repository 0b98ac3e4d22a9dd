//! MCP tool modules.
//!
//! Tools are grouped by domain: category searches over the API catalog,
//! source retrieval for search hits, and contextual help.

pub mod search;
pub mod source;
mod context;
