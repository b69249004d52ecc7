//! Error types for key-value store operations.

/// Errors returned by a [`KeyValueStore`](crate::KeyValueStore).
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// The store could not be reached.
    #[error("store unavailable: {reason}")]
    Unavailable { reason: String },

    /// A command did not complete within the configured timeout.
    #[error("store operation '{operation}' timed out after {millis}ms")]
    Timeout {
        operation: &'static str,
        millis: u64,
    },

    /// The store rejected or failed a command.
    #[error("store backend error during '{operation}': {reason}")]
    Backend {
        operation: &'static str,
        reason: String,
    },

    /// The glob pattern could not be compiled.
    #[error("invalid key pattern '{pattern}': {reason}")]
    InvalidPattern { pattern: String, reason: String },
}

impl StoreError {
    /// Creates a new unavailable error.
    pub fn unavailable(reason: impl Into<String>) -> Self {
        Self::Unavailable {
            reason: reason.into(),
        }
    }

    /// Creates a new backend error.
    pub fn backend(operation: &'static str, reason: impl Into<String>) -> Self {
        Self::Backend {
            operation,
            reason: reason.into(),
        }
    }

    /// Maps a Redis client error, separating connection failures from command failures.
    pub(crate) fn from_redis(operation: &'static str, err: redis::RedisError) -> Self {
        if err.is_io_error() || err.is_connection_dropped() || err.is_connection_refusal() {
            Self::unavailable(format!("{operation}: {err}"))
        } else if err.is_timeout() {
            Self::Timeout {
                operation,
                millis: 0,
            }
        } else {
            Self::backend(operation, err.to_string())
        }
    }

    /// Returns true if this is a transient error that might succeed on retry.
    pub fn is_transient(&self) -> bool {
        matches!(self, Self::Unavailable { .. } | Self::Timeout { .. })
    }
}

/// Result alias for store operations.
pub type StoreResult<T> = Result<T, StoreError>;
