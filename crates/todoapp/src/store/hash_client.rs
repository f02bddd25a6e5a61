//! The key-value seam under the remote backend.
//!
//! [`HashStore`](super::hash_store::HashStore) talks to the service only
//! through [`HashClient`]. The shipped client is
//! [`RedisHashClient`](super::redis_client::RedisHashClient); tests use the
//! in-process `MemHashClient` (behind the `test_utils` feature).

use std::collections::HashMap;
use std::sync::Arc;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("{command} failed: {reason}")]
pub struct RemoteError {
    pub command: &'static str,
    pub reason: String,
}

impl RemoteError {
    pub fn new(command: &'static str, reason: impl Into<String>) -> Self {
        Self {
            command,
            reason: reason.into(),
        }
    }
}

/// The subset of a remote key-value service the hash store talks to.
///
/// Each call is one network round trip in a real client. Implementations
/// must not retry; the caller decides what a failure means.
pub trait HashClient: Send + Sync {
    /// Set `fields` on the hash at `key`, creating it if needed.
    fn hset(&self, key: &str, fields: &[(&str, &str)]) -> Result<(), RemoteError>;

    /// All fields of the hash at `key`. A missing key is an empty map.
    fn hgetall(&self, key: &str) -> Result<HashMap<String, String>, RemoteError>;

    /// Keys matching `pattern`.
    fn keys(&self, pattern: &str) -> Result<Vec<String>, RemoteError>;

    /// Delete `key`. Returns whether it existed.
    fn del(&self, key: &str) -> Result<bool, RemoteError>;
}

impl<C: HashClient + ?Sized> HashClient for Arc<C> {
    fn hset(&self, key: &str, fields: &[(&str, &str)]) -> Result<(), RemoteError> {
        (**self).hset(key, fields)
    }

    fn hgetall(&self, key: &str) -> Result<HashMap<String, String>, RemoteError> {
        (**self).hgetall(key)
    }

    fn keys(&self, pattern: &str) -> Result<Vec<String>, RemoteError> {
        (**self).keys(pattern)
    }

    fn del(&self, key: &str) -> Result<bool, RemoteError> {
        (**self).del(key)
    }
}
