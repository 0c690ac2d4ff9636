//! Lock acquisition and release protocol.

use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, warn};
use uuid::Uuid;

use crate::store::{LockStore, RedisStore};
use crate::{LockError, Result, StoreConfig};

/// Client for acquiring distributed locks.
///
/// Holds the store handle and nothing else. All arbitration happens in the
/// store, so one client can be shared freely across tasks.
#[derive(Clone)]
pub struct LockClient {
    store: Arc<dyn LockStore>,
}

impl LockClient {
    /// Connect to Redis and create a lock client.
    ///
    /// # Examples
    ///
    /// ```rust,ignore
    /// use dlock::{LockClient, StoreConfig};
    /// use std::time::Duration;
    ///
    /// let config = StoreConfig::new("redis://127.0.0.1:6379");
    /// let client = LockClient::connect(&config).await?;
    /// let handle = client.acquire("my-resource", Duration::from_secs(30)).await?;
    /// ```
    pub async fn connect(config: &StoreConfig) -> Result<Self> {
        Ok(Self::new(Arc::new(RedisStore::connect(config).await?)))
    }

    /// Create a lock client over an existing store.
    pub fn new(store: Arc<dyn LockStore>) -> Self {
        Self { store }
    }

    /// Acquire the lock for `key`, held until released or until `ttl`
    /// elapses.
    ///
    /// Exactly one concurrent caller wins; the rest get
    /// [`LockError::InUse`]. No retry or backoff happens here - contention
    /// is an expected outcome and retry policy belongs to the caller. A
    /// retried call is a new attempt with a fresh token.
    pub async fn acquire(&self, key: impl Into<String>, ttl: Duration) -> Result<LockHandle> {
        let key = key.into();
        if key.is_empty() {
            return Err(LockError::EmptyKey);
        }

        let token = Uuid::new_v4().to_string();
        if self.store.set_if_absent(&key, &token, ttl).await? {
            debug!(%key, "acquired lock");
            Ok(LockHandle {
                store: Arc::clone(&self.store),
                key,
                token,
            })
        } else {
            debug!(%key, "lock already held");
            Err(LockError::InUse)
        }
    }
}

/// A successfully acquired lock.
///
/// Carries the key and the token generated for this acquisition. The token
/// proves which acquisition owns the key: release only removes the stored
/// record while it still holds this handle's token. The remote record can
/// disappear on its own once the TTL lapses; the handle does not track that,
/// the store stays authoritative.
pub struct LockHandle {
    store: Arc<dyn LockStore>,
    key: String,
    token: String,
}

impl std::fmt::Debug for LockHandle {
    // The token is the proof of ownership; keep it out of debug output.
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LockHandle")
            .field("key", &self.key)
            .finish_non_exhaustive()
    }
}

impl LockHandle {
    /// Get the lock key.
    pub fn key(&self) -> &str {
        &self.key
    }

    /// Release the lock.
    ///
    /// Succeeds if the stored record still holds this handle's token.
    /// Returns [`LockError::NoLock`] if it does not - the lock expired, was
    /// re-acquired by someone else, or was already released; those cases are
    /// indistinguishable after the fact. Releasing more than once is safe:
    /// the first call removes the record, later calls get `NoLock`.
    pub async fn release(&self) -> Result<()> {
        if self.store.delete_if_matches(&self.key, &self.token).await? {
            debug!(key = %self.key, "released lock");
            Ok(())
        } else {
            warn!(key = %self.key, "release found no matching lock");
            Err(LockError::NoLock)
        }
    }
}
