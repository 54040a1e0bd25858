use std::collections::HashMap;
use std::sync::RwLock;

use async_trait::async_trait;

use super::{RecordStore, StoreError};

type Buckets = HashMap<String, HashMap<String, String>>;

/// Process-local RecordStore. Each call takes the lock once, so single
/// operations are serialized the same way redis serializes commands.
#[derive(Default)]
pub struct MemoryStore {
    buckets: RwLock<Buckets>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn read<T>(&self, f: impl FnOnce(&Buckets) -> T) -> Result<T, StoreError> {
        let guard = self.buckets.read().map_err(|_| StoreError::Poisoned)?;
        Ok(f(&guard))
    }

    fn write<T>(&self, f: impl FnOnce(&mut Buckets) -> T) -> Result<T, StoreError> {
        let mut guard = self.buckets.write().map_err(|_| StoreError::Poisoned)?;
        Ok(f(&mut guard))
    }
}

#[async_trait]
impl RecordStore for MemoryStore {
    async fn set(&self, bucket: &str, id: &str, document: &str) -> Result<(), StoreError> {
        self.write(|b| {
            b.entry(bucket.to_string())
                .or_default()
                .insert(id.to_string(), document.to_string());
        })
    }

    async fn get(&self, bucket: &str, id: &str) -> Result<Option<String>, StoreError> {
        self.read(|b| b.get(bucket).and_then(|h| h.get(id)).cloned())
    }

    async fn get_all(&self, bucket: &str) -> Result<HashMap<String, String>, StoreError> {
        self.read(|b| b.get(bucket).cloned().unwrap_or_default())
    }

    async fn exists(&self, bucket: &str, id: &str) -> Result<bool, StoreError> {
        self.read(|b| b.get(bucket).is_some_and(|h| h.contains_key(id)))
    }

    async fn delete(&self, bucket: &str, id: &str) -> Result<bool, StoreError> {
        self.write(|b| {
            let Some(hash) = b.get_mut(bucket) else {
                return false;
            };
            let removed = hash.remove(id).is_some();
            // redis drops a hash once its last field is gone
            if hash.is_empty() {
                b.remove(bucket);
            }
            removed
        })
    }

    async fn ping(&self) -> Result<(), StoreError> {
        self.read(|_| ())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[actix_web::test]
    async fn set_then_get_returns_same_blob() {
        let store = MemoryStore::new();
        store.set("leaves", "a", r#"{"id":"a"}"#).await.unwrap();

        assert_eq!(
            store.get("leaves", "a").await.unwrap().as_deref(),
            Some(r#"{"id":"a"}"#)
        );
        assert_eq!(store.get("leaves", "b").await.unwrap(), None);
        assert_eq!(store.get("resumes", "a").await.unwrap(), None);
    }

    #[actix_web::test]
    async fn set_overwrites_existing() {
        let store = MemoryStore::new();
        store.set("resumes", "a", "1").await.unwrap();
        store.set("resumes", "a", "2").await.unwrap();

        assert_eq!(store.get("resumes", "a").await.unwrap().as_deref(), Some("2"));
        assert_eq!(store.get_all("resumes").await.unwrap().len(), 1);
    }

    #[actix_web::test]
    async fn buckets_are_isolated() {
        let store = MemoryStore::new();
        store.set("resumes", "x", "r").await.unwrap();
        store.set("leaves", "y", "l").await.unwrap();

        let resumes = store.get_all("resumes").await.unwrap();
        assert_eq!(resumes.len(), 1);
        assert_eq!(resumes.get("x").map(String::as_str), Some("r"));
        assert!(!store.exists("resumes", "y").await.unwrap());
    }

    #[actix_web::test]
    async fn delete_reports_whether_removed() {
        let store = MemoryStore::new();
        store.set("leaves", "a", "doc").await.unwrap();

        assert!(store.delete("leaves", "a").await.unwrap());
        assert!(!store.delete("leaves", "a").await.unwrap());
        assert!(!store.exists("leaves", "a").await.unwrap());
        assert!(store.get_all("leaves").await.unwrap().is_empty());
    }

    #[actix_web::test]
    async fn get_all_on_missing_bucket_is_empty() {
        let store = MemoryStore::new();
        assert!(store.get_all("nothing").await.unwrap().is_empty());
        assert!(store.ping().await.is_ok());
    }
}
