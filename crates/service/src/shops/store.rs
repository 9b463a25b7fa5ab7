use std::path::PathBuf;
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::Mutex;
use tracing::{info, warn};

use crate::errors::ServiceError;
use crate::shops::domain::{NewShop, Shop, ShopPatch};
use crate::shops::repository::ShopRepository;
use crate::storage::json_map_store::JsonMapStore;

/// File-backed shop table keyed by integer id.
///
/// Ids come from a counter seeded with the highest persisted id, so an id is
/// never handed out twice while the process runs, even after deletions. The
/// counter only advances once a create has been written to disk.
pub struct ShopStore {
    table: JsonMapStore<u64, Shop>,
    next_id: Mutex<u64>,
}

impl ShopStore {
    /// Load the table from `path`, creating an empty file if none exists.
    pub async fn open<P: Into<PathBuf>>(path: P) -> Result<Arc<Self>, ServiceError> {
        let table = JsonMapStore::<u64, Shop>::open(path).await?;

        if let Some((key, id)) = table
            .read(|m| m.iter().find(|(k, s)| **k != s.id).map(|(k, s)| (*k, s.id)))
            .await
        {
            return Err(ServiceError::Corrupt(format!(
                "{}: key {key} holds shop with id {id}",
                table.path().display()
            )));
        }

        let max_id = table.read(|m| m.keys().next_back().copied().unwrap_or(0)).await;
        let shops = table.len().await;
        info!(path = %table.path().display(), shops, next_id = max_id + 1, "shop table loaded");
        Ok(Arc::new(Self { table, next_id: Mutex::new(max_id + 1) }))
    }

    pub async fn list(&self) -> Vec<Shop> {
        self.table.values().await
    }

    pub async fn get(&self, id: u64) -> Option<Shop> {
        self.table.get(&id).await
    }

    pub async fn create(&self, input: NewShop) -> Result<Shop, ServiceError> {
        // Held for the whole create so concurrent creates cannot share an id.
        let mut next_id = self.next_id.lock().await;
        let id = *next_id;
        let shop = self
            .table
            .update_map(|map| {
                if map.values().any(|s| s.name == input.name) {
                    return Err(ServiceError::conflict("shop"));
                }
                let shop = input.into_shop(id);
                map.insert(id, shop.clone());
                Ok(shop)
            })
            .await
            .inspect_err(|e| log_failure("create", e))?;
        *next_id = id + 1;
        info!(shop_id = shop.id, name = %shop.name, "shop created");
        Ok(shop)
    }

    pub async fn update(&self, id: u64, patch: ShopPatch) -> Result<Shop, ServiceError> {
        let shop = self
            .table
            .update_map(|map| {
                let existing = map.get_mut(&id).ok_or_else(|| ServiceError::not_found("shop"))?;
                patch.apply(existing);
                Ok(existing.clone())
            })
            .await
            .inspect_err(|e| log_failure("update", e))?;
        info!(shop_id = id, "shop updated");
        Ok(shop)
    }

    pub async fn delete(&self, id: u64) -> Result<bool, ServiceError> {
        let removed = self.table.remove(&id).await.inspect_err(|e| log_failure("delete", e))?;
        if removed.is_some() {
            info!(shop_id = id, "shop deleted");
        }
        Ok(removed.is_some())
    }

    pub async fn clear(&self) -> Result<usize, ServiceError> {
        let dropped = self
            .table
            .update_map(|map| {
                let n = map.len();
                map.clear();
                Ok(n)
            })
            .await
            .inspect_err(|e| log_failure("clear", e))?;
        info!(dropped, "all shops deleted");
        Ok(dropped)
    }
}

fn log_failure(op: &str, err: &ServiceError) {
    if matches!(err, ServiceError::Storage(_)) {
        warn!(op, error = %err, "shop table not persisted");
    }
}

#[async_trait]
impl ShopRepository for ShopStore {
    async fn list(&self) -> Vec<Shop> { self.list().await }
    async fn get(&self, id: u64) -> Option<Shop> { self.get(id).await }
    async fn create(&self, input: NewShop) -> Result<Shop, ServiceError> { self.create(input).await }
    async fn update(&self, id: u64, patch: ShopPatch) -> Result<Shop, ServiceError> { self.update(id, patch).await }
    async fn delete(&self, id: u64) -> Result<bool, ServiceError> { self.delete(id).await }
    async fn clear(&self) -> Result<usize, ServiceError> { self.clear().await }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::{json, Number};

    fn tmp_path() -> PathBuf {
        std::env::temp_dir().join(format!("shop_store_{}.json", uuid::Uuid::new_v4()))
    }

    fn new_shop(name: &str) -> NewShop {
        NewShop {
            name: name.into(),
            address: "Main St".into(),
            contact_info: "555-1111".into(),
            revenue: Number::from(1000),
        }
    }

    #[tokio::test]
    async fn sequential_creates_get_sequential_ids() -> Result<(), anyhow::Error> {
        let tmp = tmp_path();
        let store = ShopStore::open(&tmp).await?;
        for (i, name) in ["a", "b", "c", "d"].into_iter().enumerate() {
            let shop = store.create(new_shop(name)).await?;
            assert_eq!(shop.id, i as u64 + 1);
        }
        let ids: Vec<u64> = store.list().await.into_iter().map(|s| s.id).collect();
        assert_eq!(ids, vec![1, 2, 3, 4]);
        let _ = tokio::fs::remove_file(&tmp).await;
        Ok(())
    }

    #[tokio::test]
    async fn duplicate_name_conflicts() -> Result<(), anyhow::Error> {
        let tmp = tmp_path();
        let store = ShopStore::open(&tmp).await?;
        store.create(new_shop("Acme")).await?;
        let mut other = new_shop("Acme");
        other.address = "Elsewhere".into();
        other.revenue = Number::from_f64(3.5).unwrap();
        assert!(matches!(store.create(other).await, Err(ServiceError::Conflict(_))));
        assert_eq!(store.list().await.len(), 1);
        let _ = tokio::fs::remove_file(&tmp).await;
        Ok(())
    }

    #[tokio::test]
    async fn ids_are_not_reused_after_delete() -> Result<(), anyhow::Error> {
        let tmp = tmp_path();
        let store = ShopStore::open(&tmp).await?;
        store.create(new_shop("a")).await?;
        store.create(new_shop("b")).await?;
        assert!(store.delete(1).await?);
        let third = store.create(new_shop("c")).await?;
        assert_eq!(third.id, 3);
        assert_eq!(store.get(2).await.map(|s| s.name), Some("b".to_string()));

        // restart continues after the highest persisted id
        drop(store);
        let reopened = ShopStore::open(&tmp).await?;
        assert_eq!(reopened.create(new_shop("d")).await?.id, 4);
        let _ = tokio::fs::remove_file(&tmp).await;
        Ok(())
    }

    #[tokio::test]
    async fn update_merges_and_delete_removes() -> Result<(), anyhow::Error> {
        let tmp = tmp_path();
        let store = ShopStore::open(&tmp).await?;
        let created = store.create(new_shop("Acme")).await?;

        let patch = ShopPatch { revenue: Some(Number::from(2000)), ..Default::default() };
        let updated = store.update(created.id, patch).await?;
        assert_eq!(updated.revenue, Number::from(2000));
        assert_eq!(updated.name, "Acme");
        assert_eq!(updated.address, "Main St");

        assert!(matches!(store.update(42, ShopPatch::default()).await, Err(ServiceError::NotFound(_))));

        assert!(store.delete(created.id).await?);
        assert!(!store.delete(created.id).await?);
        assert!(store.get(created.id).await.is_none());
        let _ = tokio::fs::remove_file(&tmp).await;
        Ok(())
    }

    #[tokio::test]
    async fn clear_empties_table_and_file() -> Result<(), anyhow::Error> {
        let tmp = tmp_path();
        let store = ShopStore::open(&tmp).await?;
        store.create(new_shop("a")).await?;
        store.create(new_shop("b")).await?;
        assert_eq!(store.clear().await?, 2);
        assert!(store.list().await.is_empty());
        assert_eq!(tokio::fs::read_to_string(&tmp).await?, "{}");
        let _ = tokio::fs::remove_file(&tmp).await;
        Ok(())
    }

    #[tokio::test]
    async fn reload_returns_identical_table() -> Result<(), anyhow::Error> {
        let tmp = tmp_path();
        let store = ShopStore::open(&tmp).await?;
        store.create(new_shop("Acme")).await?;
        let mut float = new_shop("Float");
        float.revenue = Number::from_f64(1234.5).unwrap();
        store.create(float).await?;
        let before = store.list().await;

        let raw: serde_json::Value = serde_json::from_slice(&tokio::fs::read(&tmp).await?)?;
        assert_eq!(raw["1"]["name"], json!("Acme"));
        assert_eq!(raw["2"]["revenue"], json!(1234.5));

        let reopened = ShopStore::open(&tmp).await?;
        assert_eq!(reopened.list().await, before);
        let _ = tokio::fs::remove_file(&tmp).await;
        Ok(())
    }

    #[tokio::test]
    async fn failed_persist_keeps_table_and_id() -> Result<(), anyhow::Error> {
        let dir = std::env::temp_dir().join(format!("shop_store_dir_{}", uuid::Uuid::new_v4()));
        tokio::fs::create_dir_all(&dir).await?;
        let store = ShopStore::open(dir.join("shops.json")).await?;
        store.create(new_shop("a")).await?;
        let before = store.list().await;

        tokio::fs::remove_dir_all(&dir).await?;
        assert!(matches!(store.create(new_shop("b")).await, Err(ServiceError::Storage(_))));
        assert!(matches!(store.update(1, ShopPatch { name: Some("z".into()), ..Default::default() }).await, Err(ServiceError::Storage(_))));
        assert!(matches!(store.delete(1).await, Err(ServiceError::Storage(_))));
        assert!(matches!(store.clear().await, Err(ServiceError::Storage(_))));
        assert_eq!(store.list().await, before);

        // once the disk is back the next create gets the id the failed one would have had
        tokio::fs::create_dir_all(&dir).await?;
        assert_eq!(store.create(new_shop("b")).await?.id, 2);
        let _ = tokio::fs::remove_dir_all(&dir).await;
        Ok(())
    }

    #[tokio::test]
    async fn mismatched_key_fails_to_load() -> Result<(), anyhow::Error> {
        let tmp = tmp_path();
        let body = json!({"1": {"id": 2, "name": "x", "address": "y", "contact_info": "z", "revenue": 1}});
        tokio::fs::write(&tmp, serde_json::to_vec(&body)?).await?;
        assert!(matches!(ShopStore::open(&tmp).await, Err(ServiceError::Corrupt(_))));
        let _ = tokio::fs::remove_file(&tmp).await;
        Ok(())
    }
}
