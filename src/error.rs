//! Lock error types.

use thiserror::Error;

/// Result type for lock operations.
pub type Result<T> = std::result::Result<T, LockError>;

/// Errors returned by lock operations.
#[derive(Debug, Error)]
pub enum LockError {
    /// The key is already held by another live acquisition.
    #[error("Lock in use")]
    InUse,

    /// No stored record matched the handle's token.
    ///
    /// Covers a lock that was never acquired, already expired, or already
    /// released; the store cannot tell these apart after the fact.
    #[error("Lock does not exist")]
    NoLock,

    /// Resource keys must be non-empty.
    #[error("Resource key must be non-empty")]
    EmptyKey,

    /// Underlying Redis error.
    #[error("Store error: {0}")]
    Store(#[from] redis::RedisError),
}

impl LockError {
    /// Check if the caller can reasonably retry the operation.
    ///
    /// Contention clears once the holder releases or the TTL lapses; store
    /// failures clear once the store recovers. A retried acquisition is a
    /// fresh attempt with a new token, not a resumption.
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::InUse | Self::Store(_))
    }

    /// Check if this error is contention rather than a fault.
    pub fn is_contention(&self) -> bool {
        matches!(self, Self::InUse)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_retryable_classification() {
        assert!(LockError::InUse.is_retryable());
        assert!(!LockError::NoLock.is_retryable());
        assert!(!LockError::EmptyKey.is_retryable());
    }

    #[test]
    fn test_contention_is_only_in_use() {
        assert!(LockError::InUse.is_contention());
        assert!(!LockError::NoLock.is_contention());
    }
}
