pub mod memory;
pub mod redis_store;

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use thiserror::Error;

use crate::config::{Config, StoreBackend};

pub use memory::MemoryStore;
pub use redis_store::RedisStore;

pub const RESUMES: &str = "resumes";
pub const LEAVES: &str = "leaves";

#[derive(Error, Debug)]
pub enum StoreError {
    #[error("store connection error: {0}")]
    Connection(String),

    #[error("store command failed: {0}")]
    Command(String),

    #[error("store lock poisoned")]
    Poisoned,
}

/// Hash-bucket storage for serialized documents.
///
/// A bucket maps record id to an opaque blob. The store does no
/// validation and no merging; read-modify-write correctness belongs to
/// the caller, and nothing here is atomic across calls.
#[async_trait]
pub trait RecordStore: Send + Sync {
    /// Insert or overwrite the document for `id`.
    async fn set(&self, bucket: &str, id: &str, document: &str) -> Result<(), StoreError>;

    /// Returns None if the id is not in the bucket.
    async fn get(&self, bucket: &str, id: &str) -> Result<Option<String>, StoreError>;

    /// Every id→document pair in the bucket. Order is unspecified.
    async fn get_all(&self, bucket: &str) -> Result<HashMap<String, String>, StoreError>;

    async fn exists(&self, bucket: &str, id: &str) -> Result<bool, StoreError>;

    /// Returns true if something was removed.
    async fn delete(&self, bucket: &str, id: &str) -> Result<bool, StoreError>;

    /// Liveness check for the health endpoint.
    async fn ping(&self) -> Result<(), StoreError>;

    /// Release the underlying connection at shutdown.
    async fn close(&self) {}
}

/// Open the backend selected in config.
pub async fn init_store(config: &Config) -> Result<Arc<dyn RecordStore>, StoreError> {
    match config.store_backend {
        StoreBackend::Redis => Ok(Arc::new(RedisStore::connect(&config.redis_url).await?)),
        StoreBackend::Memory => {
            tracing::warn!("Using in-memory record store; data is lost on restart");
            Ok(Arc::new(MemoryStore::new()))
        }
    }
}
