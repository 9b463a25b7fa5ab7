//! Shop records: domain types, body validation, and the file-backed table.

pub mod domain;
pub mod repository;
pub mod store;

pub use domain::{NewShop, Shop, ShopPatch, ShopValidationError, REQUIRED_FIELDS};
pub use repository::ShopRepository;
pub use store::ShopStore;
