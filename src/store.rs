//! Store client: the two atomic Redis primitives the lock protocol needs.
//!
//! Mutual exclusion is enforced entirely by the store, so both primitives
//! must execute as a single store-side operation. A client-side
//! exists-then-set or get-then-delete sequence reopens the race this
//! protocol exists to close.

use async_trait::async_trait;
use redis::aio::ConnectionManager;
use std::time::Duration;

use crate::{Result, StoreConfig};

/// Atomic compare-and-delete, evaluated server-side.
///
/// Deletes the key only while it still holds the caller's token, so a
/// release can never remove a lock that expired and was re-acquired by
/// someone else between the get and the delete.
const RELEASE_SCRIPT: &str = r#"
    if redis.call("get", KEYS[1]) == ARGV[1] then
        return redis.call("del", KEYS[1])
    else
        return 0
    end
"#;

/// Atomic primitives the lock protocol runs on.
///
/// One round trip to the store per call, no business logic. Implemented by
/// [`RedisStore`] for production use; tests substitute an in-memory store.
#[async_trait]
pub trait LockStore: Send + Sync {
    /// Create `key` holding `token` with expiry `ttl`, only if the key is
    /// currently absent. Returns whether the store created it.
    async fn set_if_absent(&self, key: &str, token: &str, ttl: Duration) -> Result<bool>;

    /// Delete `key` only if it currently holds `token`. Returns whether a
    /// record was deleted.
    async fn delete_if_matches(&self, key: &str, token: &str) -> Result<bool>;
}

/// Redis-backed [`LockStore`].
///
/// Holds a [`ConnectionManager`], which is cheap to clone and reconnects on
/// its own; one store can serve any number of lock operations concurrently.
pub struct RedisStore {
    conn: ConnectionManager,
}

impl RedisStore {
    /// Connect to Redis using the given configuration.
    pub async fn connect(config: &StoreConfig) -> Result<Self> {
        let client = redis::Client::open(config.connection_url())?;
        let conn = client.get_connection_manager().await?;
        Ok(Self { conn })
    }

    /// Wrap an existing connection manager.
    pub fn new(conn: ConnectionManager) -> Self {
        Self { conn }
    }
}

#[async_trait]
impl LockStore for RedisStore {
    async fn set_if_absent(&self, key: &str, token: &str, ttl: Duration) -> Result<bool> {
        // PX rejects a zero expiry
        let ttl_ms = (ttl.as_millis() as u64).max(1);

        let mut conn = self.conn.clone();
        let result: Option<String> = redis::cmd("SET")
            .arg(key)
            .arg(token)
            .arg("NX")
            .arg("PX")
            .arg(ttl_ms)
            .query_async(&mut conn)
            .await?;

        Ok(result.is_some())
    }

    async fn delete_if_matches(&self, key: &str, token: &str) -> Result<bool> {
        let mut conn = self.conn.clone();
        let deleted: i32 = redis::Script::new(RELEASE_SCRIPT)
            .key(key)
            .arg(token)
            .invoke_async(&mut conn)
            .await?;

        Ok(deleted == 1)
    }
}

#[cfg(test)]
mod tests {
    use crate::{LockClient, LockError, StoreConfig};
    use std::time::Duration;

    #[tokio::test]
    #[ignore = "requires Redis"]
    async fn test_acquire_release_roundtrip() {
        let config = StoreConfig::new("redis://127.0.0.1:6379");
        let client = LockClient::connect(&config).await.unwrap();

        let handle = client
            .acquire("dlock:test:roundtrip", Duration::from_secs(3600))
            .await
            .unwrap();

        let contended = client
            .acquire("dlock:test:roundtrip", Duration::from_secs(1))
            .await;
        assert!(matches!(contended, Err(LockError::InUse)));

        handle.release().await.unwrap();
        assert!(matches!(handle.release().await, Err(LockError::NoLock)));
    }

    #[tokio::test]
    #[ignore = "requires Redis"]
    async fn test_expired_lock_can_be_reacquired() {
        let config = StoreConfig::new("redis://127.0.0.1:6379");
        let client = LockClient::connect(&config).await.unwrap();

        let stale = client
            .acquire("dlock:test:expiry", Duration::from_millis(50))
            .await
            .unwrap();
        tokio::time::sleep(Duration::from_millis(120)).await;

        let fresh = client
            .acquire("dlock:test:expiry", Duration::from_secs(3600))
            .await
            .unwrap();

        // The stale handle's token no longer matches; the new record stays.
        assert!(matches!(stale.release().await, Err(LockError::NoLock)));
        fresh.release().await.unwrap();
    }
}
