#![allow(dead_code)]

use std::sync::Arc;
use tempfile::TempDir;
use todoapp::store::mem_client::MemHashClient;
use todoapp::store::hash_store::HashStore;
use todoapp::store::json_array::JsonArrayStore;
use todoapp::store::json_map::JsonMapStore;
use todoapp::store::text::TextStore;
use todoapp::store::TodoStore;

pub struct Fixture {
    // Kept so the directory outlives the store
    pub _dir: TempDir,
    pub store: Arc<dyn TodoStore>,
}

fn temp_dir() -> TempDir {
    TempDir::new().unwrap()
}

pub fn json_array() -> Fixture {
    let dir = temp_dir();
    let store = JsonArrayStore::open(dir.path().join("todo.json")).unwrap();
    Fixture {
        _dir: dir,
        store: Arc::new(store),
    }
}

pub fn json_map() -> Fixture {
    let dir = temp_dir();
    let store = JsonMapStore::open(dir.path().join("todo.map.json")).unwrap();
    Fixture {
        _dir: dir,
        store: Arc::new(store),
    }
}

pub fn text() -> Fixture {
    let dir = temp_dir();
    let store = TextStore::open(dir.path().join("todo.text")).unwrap();
    Fixture {
        _dir: dir,
        store: Arc::new(store),
    }
}

pub fn remote() -> Fixture {
    Fixture {
        _dir: temp_dir(),
        store: Arc::new(HashStore::new(MemHashClient::new(), "todo")),
    }
}
