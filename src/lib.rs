//! # dlock
//!
//! Redis-backed distributed mutual-exclusion locks.
//!
//! Lock state lives in Redis, not in process memory, so independent
//! processes and machines can coordinate exclusive access to a named
//! resource. The protocol rests on two store-side atomics:
//!
//! - **Acquire**: `SET key token NX PX ttl` - exactly one concurrent caller
//!   creates the record, everyone else sees the key as held.
//! - **Release**: a Lua compare-and-delete - the key is removed only while
//!   it still holds the releasing handle's token, so a handle whose lock
//!   expired and was re-acquired by someone else can never delete the new
//!   holder's record.
//!
//! Each acquisition gets a fresh random token (UUIDv4); the token is the
//! proof of ownership at release time. Locks expire on their own once the
//! TTL lapses - there is no renewal, no queueing of waiters, and no retry
//! inside the protocol. Contention surfaces as [`LockError::InUse`] and
//! retry policy belongs to the caller.
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use dlock::{LockClient, LockError, StoreConfig};
//! use std::time::Duration;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = StoreConfig::from_env().build();
//!     let client = LockClient::connect(&config).await?;
//!
//!     match client.acquire("my-resource", Duration::from_secs(30)).await {
//!         Ok(handle) => {
//!             // Critical section
//!             handle.release().await?;
//!         }
//!         Err(LockError::InUse) => {
//!             // Someone else holds it - poll, back off, or give up
//!         }
//!         Err(other) => return Err(other.into()),
//!     }
//!
//!     Ok(())
//! }
//! ```
//!
//! ## Caveats
//!
//! Release proves only that the token still matched at the moment of the
//! delete. Side effects performed "while holding the lock" are not fenced
//! against running after the TTL reassigned the key; callers needing that
//! guarantee need fencing tokens, which this crate does not provide.

mod config;
mod error;
mod lock;
mod store;

pub use config::{StoreConfig, StoreConfigBuilder};
pub use error::{LockError, Result};
pub use lock::{LockClient, LockHandle};
pub use store::{LockStore, RedisStore};

// Re-export redis crate for convenience
pub use redis;

/// Prelude for common imports.
///
/// ```
/// use dlock::prelude::*;
/// ```
pub mod prelude {
    pub use crate::config::{StoreConfig, StoreConfigBuilder};
    pub use crate::error::{LockError, Result};
    pub use crate::lock::{LockClient, LockHandle};
    pub use crate::store::{LockStore, RedisStore};
}
