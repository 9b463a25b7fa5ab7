//! Service layer for the shop table.
//! - Domain types and request-body validation live in `shops`.
//! - `storage` holds the generic JSON file-backed map the table is persisted with.
//! - Errors are collected in `errors::ServiceError`.

pub mod errors;
pub mod storage;
pub mod shops;
