//! # Backend Selection
//!
//! The backend is chosen exactly once, when the process builds its
//! [`TodoApi`](crate::api::TodoApi), and stays fixed afterwards. Nothing in
//! the library reads ambient process state to pick a backend: the caller
//! passes a [`TodoConfig`] (usually from [`TodoConfig::load`]) and a data
//! directory.
//!
//! | `backend` | Store | Location |
//! |-----------|-------|----------|
//! | `json` | [`JsonArrayStore`] | `file` or `<data_dir>/todo.json` |
//! | `jsonmap` | [`JsonMapStore`] | `file` or `<data_dir>/todo.map.json` |
//! | `text` | [`TextStore`] | `file` or `<data_dir>/todo.text` |
//! | `remote` | [`HashStore`] | `namespace` on the Redis server at `redis_url` |
//!
//! The Redis connection is made lazily, so an unreachable server surfaces
//! as `BackendUnavailable` on the first operation rather than here.

use crate::config::{BackendKind, TodoConfig};
use crate::error::{Operation, Result, TodoError};
use crate::store::hash_client::HashClient;
use crate::store::hash_store::HashStore;
use crate::store::json_array::JsonArrayStore;
use crate::store::json_map::JsonMapStore;
use crate::store::redis_client::RedisHashClient;
use crate::store::text::TextStore;
use crate::store::TodoStore;
use std::path::{Path, PathBuf};

/// Open the configured store.
pub fn open_store(config: &TodoConfig, data_dir: &Path) -> Result<Box<dyn TodoStore>> {
    let store: Box<dyn TodoStore> = match config.backend {
        BackendKind::JsonArray => Box::new(JsonArrayStore::open(store_file(config, data_dir)?)?),
        BackendKind::JsonMap => Box::new(JsonMapStore::open(store_file(config, data_dir)?)?),
        BackendKind::Text => Box::new(TextStore::open(store_file(config, data_dir)?)?),
        BackendKind::Remote => {
            let client = RedisHashClient::open(&config.redis_url).map_err(|e| {
                TodoError::Config(format!("invalid redis url {:?}: {}", config.redis_url, e))
            })?;
            open_remote_store(config, client)
        }
    };

    tracing::debug!(backend = store.name(), "opened store");
    Ok(store)
}

/// The remote backend over any [`HashClient`], keyed by the configured
/// namespace.
pub fn open_remote_store<C: HashClient + 'static>(
    config: &TodoConfig,
    client: C,
) -> Box<dyn TodoStore> {
    Box::new(HashStore::new(client, config.namespace.clone()))
}

fn store_file(config: &TodoConfig, data_dir: &Path) -> Result<PathBuf> {
    config.store_file(data_dir).ok_or_else(|| {
        TodoError::unavailable(
            Operation::Open,
            config.backend.as_str(),
            "backend has no store file",
        )
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::context::Context;
    use crate::error::ErrorKind;
    use crate::model::{Status, Todo};
    use crate::store::mem_client::MemHashClient;
    use crate::test_utils::TestEnv;
    use std::sync::Arc;

    fn config(backend: BackendKind) -> TodoConfig {
        TodoConfig {
            backend,
            ..Default::default()
        }
    }

    #[test]
    fn test_opens_each_file_backend_at_default_path() {
        let env = TestEnv::new();
        for (kind, file, empty) in [
            (BackendKind::JsonArray, "todo.json", "[]"),
            (BackendKind::JsonMap, "todo.map.json", "{}"),
            (BackendKind::Text, "todo.text", ""),
        ] {
            let store = open_store(&config(kind), &env.root).unwrap();
            assert_eq!(store.name(), kind.as_str());
            assert_eq!(
                std::fs::read_to_string(env.root.join(file)).unwrap(),
                empty
            );
        }
    }

    #[test]
    fn test_remote_uses_supplied_client() {
        let client = Arc::new(MemHashClient::new());
        let store = open_remote_store(&config(BackendKind::Remote), client.clone());

        store
            .add(&Context::background(), Todo::with_id("1", "one", Status::Pending))
            .unwrap();
        assert_eq!(client.keys("todo:*").unwrap(), vec!["todo:1"]);
    }

    #[test]
    fn test_remote_with_unreachable_server_is_unavailable() {
        let env = TestEnv::new();
        let cfg = TodoConfig {
            backend: BackendKind::Remote,
            redis_url: "redis://127.0.0.1:1".to_string(),
            ..Default::default()
        };
        let store = open_store(&cfg, &env.root).unwrap();
        assert_eq!(store.name(), "remote");

        let err = store.get_all(&Context::background()).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::BackendUnavailable);
        assert!(err.to_string().contains("unavailable"), "{}", err);
    }

    #[test]
    fn test_remote_with_bad_url_is_config_error() {
        let env = TestEnv::new();
        let cfg = TodoConfig {
            backend: BackendKind::Remote,
            redis_url: "not a url".to_string(),
            ..Default::default()
        };
        let err = open_store(&cfg, &env.root).err().unwrap();
        assert_eq!(err.kind(), ErrorKind::Config);
    }

    #[test]
    fn test_explicit_file_overrides_default_name() {
        let env = TestEnv::new();
        let cfg = TodoConfig {
            backend: BackendKind::Text,
            file: Some("mine.txt".into()),
            ..Default::default()
        };
        open_store(&cfg, &env.root).unwrap();
        assert!(env.root.join("mine.txt").exists());
        assert!(!env.root.join("todo.text").exists());
    }
}
