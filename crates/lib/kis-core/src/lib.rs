//! Core services for the KIS API search server.
//!
//! This crate loads the API catalog into memory, exposes the query engine that
//! filters it, and fetches the example source files the catalog points at.

pub mod catalog;
pub mod control;
pub mod services;
pub mod source;
