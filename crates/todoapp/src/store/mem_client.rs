//! In-process [`HashClient`] for tests.

use super::hash_client::{HashClient, RemoteError};
use parking_lot::RwLock;
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};

/// Hash client backed by maps in memory.
///
/// Patterns support exact keys, `*`, and a single trailing `*` wildcard
/// (`todo:*`). That covers the hash store's namespace scans; it is not a
/// general glob matcher.
#[derive(Default)]
pub struct MemHashClient {
    hashes: RwLock<HashMap<String, HashMap<String, String>>>,
    unavailable: AtomicBool,
}

impl MemHashClient {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make every command fail as if the service were unreachable.
    pub fn set_unavailable(&self, unavailable: bool) {
        self.unavailable.store(unavailable, Ordering::SeqCst);
    }

    fn guard(&self, command: &'static str) -> Result<(), RemoteError> {
        if self.unavailable.load(Ordering::SeqCst) {
            return Err(RemoteError::new(command, "connection refused"));
        }
        Ok(())
    }
}

fn matches(pattern: &str, key: &str) -> bool {
    match pattern.strip_suffix('*') {
        Some(prefix) => key.starts_with(prefix),
        None => pattern == key,
    }
}

impl HashClient for MemHashClient {
    fn hset(&self, key: &str, fields: &[(&str, &str)]) -> Result<(), RemoteError> {
        self.guard("HSET")?;
        let mut hashes = self.hashes.write();
        let hash = hashes.entry(key.to_string()).or_default();
        for (field, value) in fields {
            hash.insert(field.to_string(), value.to_string());
        }
        Ok(())
    }

    fn hgetall(&self, key: &str) -> Result<HashMap<String, String>, RemoteError> {
        self.guard("HGETALL")?;
        Ok(self.hashes.read().get(key).cloned().unwrap_or_default())
    }

    fn keys(&self, pattern: &str) -> Result<Vec<String>, RemoteError> {
        self.guard("KEYS")?;
        Ok(self
            .hashes
            .read()
            .keys()
            .filter(|k| matches(pattern, k))
            .cloned()
            .collect())
    }

    fn del(&self, key: &str) -> Result<bool, RemoteError> {
        self.guard("DEL")?;
        Ok(self.hashes.write().remove(key).is_some())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hset_merges_fields() {
        let client = MemHashClient::new();
        client.hset("k", &[("a", "1"), ("b", "2")]).unwrap();
        client.hset("k", &[("b", "3")]).unwrap();

        let fields = client.hgetall("k").unwrap();
        assert_eq!(fields.get("a").map(String::as_str), Some("1"));
        assert_eq!(fields.get("b").map(String::as_str), Some("3"));
    }

    #[test]
    fn test_hgetall_missing_key_is_empty() {
        let client = MemHashClient::new();
        assert!(client.hgetall("nope").unwrap().is_empty());
    }

    #[test]
    fn test_keys_prefix_pattern() {
        let client = MemHashClient::new();
        client.hset("todo:1", &[("id", "1")]).unwrap();
        client.hset("todo:2", &[("id", "2")]).unwrap();
        client.hset("other:1", &[("id", "1")]).unwrap();

        let mut keys = client.keys("todo:*").unwrap();
        keys.sort();
        assert_eq!(keys, vec!["todo:1", "todo:2"]);
        assert_eq!(client.keys("*").unwrap().len(), 3);
        assert_eq!(client.keys("other:1").unwrap(), vec!["other:1"]);
    }

    #[test]
    fn test_del_reports_existence() {
        let client = MemHashClient::new();
        client.hset("k", &[("a", "1")]).unwrap();
        assert!(client.del("k").unwrap());
        assert!(!client.del("k").unwrap());
    }

    #[test]
    fn test_unavailable_fails_every_command() {
        let client = MemHashClient::new();
        client.set_unavailable(true);
        assert_eq!(client.keys("*").unwrap_err().command, "KEYS");
        assert!(client.hset("k", &[("a", "1")]).is_err());
        assert!(client.hgetall("k").is_err());
        assert!(client.del("k").is_err());
    }
}
