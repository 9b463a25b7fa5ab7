use std::{
    collections::BTreeMap,
    io::ErrorKind,
    path::{Path, PathBuf},
};
use tokio::{fs, sync::RwLock};
use tracing::{debug, info};

use crate::errors::ServiceError;

/// Generic JSON file-backed ordered map store.
///
/// Persists a `BTreeMap<K, V>` to a JSON file as a single object and rewrites
/// the whole file after every mutation. Readers share the lock; a mutation
/// holds the write lock across both the in-memory change and the file write,
/// so the file always reflects a committed state of the map.
pub struct JsonMapStore<K, V> {
    inner: RwLock<BTreeMap<K, V>>,
    file_path: PathBuf,
}

impl<K, V> JsonMapStore<K, V>
where
    K: Ord + Clone + serde::Serialize + serde::de::DeserializeOwned,
    V: Clone + serde::Serialize + serde::de::DeserializeOwned,
{
    /// Load the map from `path`. A missing file yields an empty map and is
    /// created; unreadable or unparsable content is an error. The parent
    /// directory must already exist.
    pub async fn open<P: Into<PathBuf>>(path: P) -> Result<Self, ServiceError> {
        let file_path = path.into();

        let map: BTreeMap<K, V> = match fs::read(&file_path).await {
            Ok(bytes) => serde_json::from_slice(&bytes)
                .map_err(|e| ServiceError::Corrupt(format!("{}: {e}", file_path.display())))?,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                let empty: BTreeMap<K, V> = BTreeMap::new();
                write_map(&file_path, &empty).await?;
                info!(path = %file_path.display(), "data file not found, starting empty");
                empty
            }
            Err(e) => return Err(ServiceError::Storage(format!("{}: {e}", file_path.display()))),
        };

        Ok(Self { inner: RwLock::new(map), file_path })
    }

    pub fn path(&self) -> &Path {
        &self.file_path
    }

    /// All values in key order.
    pub async fn values(&self) -> Vec<V> {
        let map = self.inner.read().await;
        map.values().cloned().collect()
    }

    /// Get value by key.
    pub async fn get(&self, key: &K) -> Option<V> {
        let map = self.inner.read().await;
        map.get(key).cloned()
    }

    pub async fn len(&self) -> usize {
        self.inner.read().await.len()
    }

    /// Run a read-only closure against the map under the shared lock.
    pub async fn read<F, R>(&self, f: F) -> R
    where
        F: FnOnce(&BTreeMap<K, V>) -> R,
    {
        let map = self.inner.read().await;
        f(&map)
    }

    /// Remove a key and persist; returns the removed value. Nothing is
    /// written when the key is absent.
    pub async fn remove(&self, key: &K) -> Result<Option<V>, ServiceError> {
        let mut map = self.inner.write().await;
        if !map.contains_key(key) {
            return Ok(None);
        }
        let mut draft = map.clone();
        let removed = draft.remove(key);
        write_map(&self.file_path, &draft).await?;
        *map = draft;
        Ok(removed)
    }

    /// Apply a mutation to a copy of the map, persist the copy, then commit it.
    ///
    /// If `f` fails nothing is written. If the write fails the in-memory map
    /// is left untouched.
    pub async fn update_map<F, R>(&self, f: F) -> Result<R, ServiceError>
    where
        F: FnOnce(&mut BTreeMap<K, V>) -> Result<R, ServiceError>,
    {
        let mut map = self.inner.write().await;
        let mut draft = map.clone();
        let out = f(&mut draft)?;
        write_map(&self.file_path, &draft).await?;
        *map = draft;
        Ok(out)
    }
}

async fn write_map<K, V>(path: &Path, map: &BTreeMap<K, V>) -> Result<(), ServiceError>
where
    K: serde::Serialize + Ord,
    V: serde::Serialize,
{
    let data = serde_json::to_vec(map).map_err(|e| ServiceError::Storage(e.to_string()))?;
    fs::write(path, &data)
        .await
        .map_err(|e| ServiceError::Storage(format!("{}: {e}", path.display())))?;
    debug!(path = %path.display(), entries = map.len(), bytes = data.len(), "data file written");
    Ok(())
}
