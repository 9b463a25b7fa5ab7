//! Storage abstractions for service layer
//!
//! Contains reusable file-backed stores for data small enough to be
//! rewritten in full on every change.

pub mod json_map_store;
