//! Catalog models and schema helpers for the KIS API search server.
//!
//! This crate defines the data model shared by the catalog loader, the query
//! engine, and the MCP tool layer.

pub mod models;
pub mod schema;

pub use models::*;
