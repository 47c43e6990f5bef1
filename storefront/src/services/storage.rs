//! # Persistent Key-Value Storage
//!
//! Durable string storage for the session and the cart.
//!
//! - [`FileStore`]: one JSON object file, loaded at open and rewritten atomically
//!   (temp file + rename) after every mutation. Writers are serialized by an
//!   async mutex.
//! - [`MemoryStore`]: in-process map for tests, and the fallback when the file
//!   store cannot be opened.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use parking_lot::RwLock;
use tokio::sync::Mutex;

use crate::core::error::Result;
use crate::core::service::KeyValueStore;

/// Persisted key names. These strings are shared with existing installs and
/// must not change.
pub mod keys {
    pub const USER_EMAIL: &str = "userEmail";
    pub const USER_ROLE: &str = "userRole";
    pub const USER_TOKEN: &str = "userToken";
    pub const USER_PHONE: &str = "userPhone";
    pub const USER_NAME: &str = "userName";
    pub const CART_ITEMS: &str = "cartItems";

    /// Keys removed by logout. Phone, name and cart survive.
    pub const SESSION_KEYS: [&str; 3] = [USER_TOKEN, USER_EMAIL, USER_ROLE];
}

/// In-memory store.
#[derive(Debug, Default)]
pub struct MemoryStore {
    entries: RwLock<BTreeMap<String, String>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Copy of every stored entry.
    pub fn snapshot(&self) -> BTreeMap<String, String> {
        self.entries.read().clone()
    }
}

#[async_trait]
impl KeyValueStore for MemoryStore {
    async fn get(&self, key: &str) -> Result<Option<String>> {
        Ok(self.entries.read().get(key).cloned())
    }

    async fn set(&self, key: &str, value: &str) -> Result<()> {
        self.entries.write().insert(key.to_string(), value.to_string());
        Ok(())
    }

    async fn remove(&self, keys: &[&str]) -> Result<()> {
        let mut entries = self.entries.write();
        for key in keys {
            entries.remove(*key);
        }
        Ok(())
    }
}

/// JSON-file store.
#[derive(Debug)]
pub struct FileStore {
    path: PathBuf,
    entries: Mutex<BTreeMap<String, String>>,
}

impl FileStore {
    /// Open the store at `path`. A missing file is an empty store; an unreadable
    /// or corrupt file is logged and replaced on the next write.
    pub async fn open(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        let entries = match tokio::fs::read(&path).await {
            Ok(bytes) => match serde_json::from_slice::<BTreeMap<String, String>>(&bytes) {
                Ok(entries) => entries,
                Err(e) => {
                    tracing::warn!(
                        path = %path.display(),
                        error = %e,
                        "Session file is corrupt, starting empty"
                    );
                    BTreeMap::new()
                }
            },
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => BTreeMap::new(),
            Err(e) => return Err(e.into()),
        };

        tracing::debug!(path = %path.display(), keys = entries.len(), "Session file opened");
        Ok(Self {
            path,
            entries: Mutex::new(entries),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Apply `change` to a copy, persist it, then commit it in memory. A failed
    /// write leaves both the file and the in-memory map unchanged.
    async fn mutate<F>(&self, change: F) -> Result<()>
    where
        F: FnOnce(&mut BTreeMap<String, String>),
    {
        let mut entries = self.entries.lock().await;
        let mut next = entries.clone();
        change(&mut next);
        if next == *entries {
            return Ok(());
        }
        write_atomically(&self.path, &next).await?;
        *entries = next;
        Ok(())
    }
}

async fn write_atomically(path: &Path, entries: &BTreeMap<String, String>) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        tokio::fs::create_dir_all(parent).await?;
    }
    let body = serde_json::to_vec_pretty(entries)?;
    let tmp = path.with_extension("json.tmp");
    tokio::fs::write(&tmp, body).await?;
    tokio::fs::rename(&tmp, path).await?;
    Ok(())
}

#[async_trait]
impl KeyValueStore for FileStore {
    async fn get(&self, key: &str) -> Result<Option<String>> {
        Ok(self.entries.lock().await.get(key).cloned())
    }

    async fn set(&self, key: &str, value: &str) -> Result<()> {
        self.mutate(|entries| {
            entries.insert(key.to_string(), value.to_string());
        })
        .await
    }

    async fn remove(&self, keys: &[&str]) -> Result<()> {
        self.mutate(|entries| {
            for key in keys {
                entries.remove(*key);
            }
        })
        .await
    }
}


#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_memory_store_remove_ignores_missing_keys() {
        let store = MemoryStore::new();
        store.set(keys::USER_TOKEN, "t1").await.unwrap();
        store.set(keys::USER_PHONE, "9999999999").await.unwrap();

        store.remove(&keys::SESSION_KEYS).await.unwrap();

        let left = store.snapshot();
        assert_eq!(left.len(), 1);
        assert_eq!(left.get(keys::USER_PHONE).map(String::as_str), Some("9999999999"));
    }

    #[tokio::test]
    async fn test_file_store_persists_across_reopen() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("data/session.json");

        let store = FileStore::open(&path).await.unwrap();
        assert_eq!(store.get(keys::USER_EMAIL).await.unwrap(), None);
        store.set(keys::USER_EMAIL, "a@b.com").await.unwrap();
        store.set(keys::USER_ROLE, "farmer").await.unwrap();
        store.remove(&[keys::USER_ROLE]).await.unwrap();
        drop(store);

        let reopened = FileStore::open(&path).await.unwrap();
        assert_eq!(
            reopened.get(keys::USER_EMAIL).await.unwrap().as_deref(),
            Some("a@b.com")
        );
        assert_eq!(reopened.get(keys::USER_ROLE).await.unwrap(), None);
        assert!(!path.with_extension("json.tmp").exists());
    }

    #[tokio::test]
    async fn test_file_store_tolerates_corrupt_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("session.json");
        std::fs::write(&path, b"{not json").unwrap();

        let store = FileStore::open(&path).await.unwrap();
        assert_eq!(store.get(keys::USER_TOKEN).await.unwrap(), None);

        store.set(keys::USER_TOKEN, "t2").await.unwrap();
        let raw = std::fs::read_to_string(&path).unwrap();
        assert!(raw.contains("\"userToken\": \"t2\""));
    }

    #[tokio::test]
    async fn test_file_store_concurrent_writes_all_land() {
        let dir = tempfile::tempdir().unwrap();
        let store = std::sync::Arc::new(FileStore::open(dir.path().join("s.json")).await.unwrap());

        let mut handles = Vec::new();
        for i in 0..8 {
            let store = store.clone();
            handles.push(tokio::spawn(async move {
                store.set(&format!("k{}", i), "v").await
            }));
        }
        for handle in handles {
            handle.await.unwrap().unwrap();
        }

        let reopened = FileStore::open(store.path()).await.unwrap();
        for i in 0..8 {
            assert!(reopened.get(&format!("k{}", i)).await.unwrap().is_some());
        }
    }
}
