//! # Configuration
//!
//! Configuration is managed by [`confique`], which handles layered loading
//! from environment variables, a TOML file, and compiled defaults.
//!
//! ## Resolution Order
//!
//! 1. **Environment variables**: `TODO_BACKEND`, `TODO_FILE`, `TODO_NAMESPACE`,
//!    `TODO_REDIS_URL`.
//! 2. **Config file**: `todo.toml` in the data directory.
//! 3. **Compiled defaults**: `backend = "json"`, `namespace = "todo"`.
//!
//! Command line flags override the loaded values (see the `todo` binary).
//!
//! ## Available Settings
//!
//! | Key | Default | Description |
//! |-----|---------|-------------|
//! | `backend` | `json` | One of `json`, `jsonmap`, `text`, `remote` |
//! | `file` | per backend | Store file for the file backends |
//! | `namespace` | `todo` | Key prefix for the remote backend |
//! | `redis_url` | `redis://127.0.0.1:6379` | Server for the remote backend |
//!
//! When `file` is unset or empty the backend's default file name (`todo.json`,
//! `todo.map.json`, `todo.text`) is placed in the data directory.

use crate::error::{Result, TodoError};
use confique::Config;
use directories::ProjectDirs;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

pub const CONFIG_FILE_NAME: &str = "todo.toml";
pub const DEFAULT_REDIS_URL: &str = "redis://127.0.0.1:6379";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum BackendKind {
    #[default]
    JsonArray,
    JsonMap,
    Text,
    Remote,
}

impl BackendKind {
    pub const ALL: [BackendKind; 4] = [
        BackendKind::JsonArray,
        BackendKind::JsonMap,
        BackendKind::Text,
        BackendKind::Remote,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            BackendKind::JsonArray => "json",
            BackendKind::JsonMap => "jsonmap",
            BackendKind::Text => "text",
            BackendKind::Remote => "remote",
        }
    }

    /// File name used when no explicit file is configured.
    /// `None` for backends that do not persist to a file.
    pub fn default_file_name(&self) -> Option<&'static str> {
        match self {
            BackendKind::JsonArray => Some("todo.json"),
            BackendKind::JsonMap => Some("todo.map.json"),
            BackendKind::Text => Some("todo.text"),
            BackendKind::Remote => None,
        }
    }
}

impl fmt::Display for BackendKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for BackendKind {
    type Err = TodoError;

    fn from_str(s: &str) -> Result<Self> {
        BackendKind::ALL
            .into_iter()
            .find(|kind| kind.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| {
                TodoError::Config(format!(
                    "unknown backend {:?} (expected json, jsonmap, text or remote)",
                    s
                ))
            })
    }
}

impl Serialize for BackendKind {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for BackendKind {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(serde::de::Error::custom)
    }
}

/// Configuration for todoapp, stored in `todo.toml`.
#[derive(Config, Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct TodoConfig {
    /// Storage backend: json, jsonmap, text or remote.
    #[config(env = "TODO_BACKEND", default = "json")]
    pub backend: BackendKind,

    /// Store file for the file backends.
    #[config(env = "TODO_FILE")]
    pub file: Option<PathBuf>,

    /// Key prefix for the remote backend.
    #[config(env = "TODO_NAMESPACE", default = "todo")]
    pub namespace: String,

    /// Server URL for the remote backend.
    #[config(env = "TODO_REDIS_URL", default = "redis://127.0.0.1:6379")]
    pub redis_url: String,
}

impl Default for TodoConfig {
    fn default() -> Self {
        Self {
            backend: BackendKind::JsonArray,
            file: None,
            namespace: crate::store::hash_store::DEFAULT_NAMESPACE.to_string(),
            redis_url: DEFAULT_REDIS_URL.to_string(),
        }
    }
}

impl TodoConfig {
    /// Load from the environment and `<dir>/todo.toml`, falling back to
    /// defaults. A missing file is not an error.
    pub fn load(dir: &Path) -> Result<Self> {
        TodoConfig::builder()
            .env()
            .file(dir.join(CONFIG_FILE_NAME))
            .load()
            .map_err(|e| TodoError::Config(e.to_string()))
    }

    /// The store file for file backends, relative paths resolved against
    /// `data_dir`. An empty `file` counts as unset. `None` for the remote
    /// backend.
    pub fn store_file(&self, data_dir: &Path) -> Option<PathBuf> {
        let default_name = self.backend.default_file_name()?;
        let file = self.file.as_ref().filter(|f| !f.as_os_str().is_empty());
        Some(match file {
            Some(file) if file.is_absolute() => file.clone(),
            Some(file) => data_dir.join(file),
            None => data_dir.join(default_name),
        })
    }
}

/// OS-appropriate data directory for todo files.
pub fn default_data_dir() -> Option<PathBuf> {
    ProjectDirs::from("com", "todoapp", "todo").map(|dirs| dirs.data_dir().to_path_buf())
}
