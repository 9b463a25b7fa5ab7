use async_trait::async_trait;

use crate::errors::ServiceError;
use crate::shops::domain::{NewShop, Shop, ShopPatch};

/// Trait abstraction over the shop table so handlers can be driven by any store.
#[async_trait]
pub trait ShopRepository: Send + Sync {
    /// All shops in insertion order.
    async fn list(&self) -> Vec<Shop>;
    async fn get(&self, id: u64) -> Option<Shop>;
    /// Fails with `Conflict` if a shop with the same name exists.
    async fn create(&self, input: NewShop) -> Result<Shop, ServiceError>;
    /// Fails with `NotFound` if `id` is unknown.
    async fn update(&self, id: u64, patch: ShopPatch) -> Result<Shop, ServiceError>;
    /// Returns whether a shop was removed.
    async fn delete(&self, id: u64) -> Result<bool, ServiceError>;
    /// Removes every shop, returning how many were dropped.
    async fn clear(&self) -> Result<usize, ServiceError>;
}
