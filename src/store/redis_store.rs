use std::collections::HashMap;
use std::sync::RwLock;

use async_trait::async_trait;
use redis::AsyncCommands;
use redis::aio::ConnectionManager;
use tracing::info;

use super::{RecordStore, StoreError};

impl From<redis::RedisError> for StoreError {
    fn from(e: redis::RedisError) -> Self {
        if e.is_connection_dropped() || e.is_connection_refusal() || e.is_timeout() {
            StoreError::Connection(e.to_string())
        } else {
            StoreError::Command(e.to_string())
        }
    }
}

/// RecordStore over redis hashes: one hash per bucket, one field per id.
///
/// A single managed connection is opened at startup and shared; the
/// manager reconnects on its own after a dropped connection. `close`
/// takes it out, after which every call fails with a connection error.
pub struct RedisStore {
    conn: RwLock<Option<ConnectionManager>>,
}

impl RedisStore {
    pub async fn connect(url: &str) -> Result<Self, StoreError> {
        let client =
            redis::Client::open(url).map_err(|e| StoreError::Connection(e.to_string()))?;
        let conn = ConnectionManager::new(client)
            .await
            .map_err(|e| StoreError::Connection(e.to_string()))?;

        info!(url, "Connected to Redis");
        Ok(Self {
            conn: RwLock::new(Some(conn)),
        })
    }

    /// Cheap clone of the shared manager for one command.
    fn conn(&self) -> Result<ConnectionManager, StoreError> {
        self.conn
            .read()
            .map_err(|_| StoreError::Poisoned)?
            .clone()
            .ok_or_else(|| StoreError::Connection("redis store is closed".into()))
    }
}

#[async_trait]
impl RecordStore for RedisStore {
    async fn set(&self, bucket: &str, id: &str, document: &str) -> Result<(), StoreError> {
        let mut conn = self.conn()?;
        conn.hset::<_, _, _, ()>(bucket, id, document).await?;
        Ok(())
    }

    async fn get(&self, bucket: &str, id: &str) -> Result<Option<String>, StoreError> {
        let mut conn = self.conn()?;
        Ok(conn.hget(bucket, id).await?)
    }

    async fn get_all(&self, bucket: &str) -> Result<HashMap<String, String>, StoreError> {
        let mut conn = self.conn()?;
        Ok(conn.hgetall(bucket).await?)
    }

    async fn exists(&self, bucket: &str, id: &str) -> Result<bool, StoreError> {
        let mut conn = self.conn()?;
        Ok(conn.hexists(bucket, id).await?)
    }

    async fn delete(&self, bucket: &str, id: &str) -> Result<bool, StoreError> {
        let mut conn = self.conn()?;
        let removed: i64 = conn.hdel(bucket, id).await?;
        Ok(removed > 0)
    }

    async fn ping(&self) -> Result<(), StoreError> {
        let mut conn = self.conn()?;
        let _pong: String = redis::cmd("PING").query_async(&mut conn).await?;
        Ok(())
    }

    async fn close(&self) {
        // in-flight commands hold their own clones and finish first
        let taken = match self.conn.write() {
            Ok(mut guard) => guard.take(),
            Err(poisoned) => poisoned.into_inner().take(),
        };
        if taken.is_some() {
            info!("Redis connection released");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[actix_web::test]
    #[ignore = "needs a redis server at REDIS_URL"]
    async fn close_releases_the_connection() {
        let url = std::env::var("REDIS_URL").unwrap_or_else(|_| "redis://127.0.0.1:6379".into());
        let store = RedisStore::connect(&url).await.unwrap();
        store.ping().await.unwrap();

        store.close().await;

        assert!(matches!(store.ping().await, Err(StoreError::Connection(_))));
        assert!(matches!(store.get("resumes", "x").await, Err(StoreError::Connection(_))));
        // closing twice is harmless
        store.close().await;
    }
}
