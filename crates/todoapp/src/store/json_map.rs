//! JSON object backend: `{"<id>": {"id":..,"data":..,"status":..}, ...}`.
//!
//! Lookups by id are direct map accesses, but every mutation still rewrites
//! the whole file. The embedded `id` of each value must equal its key; a
//! file where they disagree is rejected as undecodable. Iteration order of
//! `get_all` is the hash map's and is not stable between calls that
//! rewrite the file.

use super::file_store::{FileFormat, FileStore, FormatError};
use crate::model::Todo;
use std::collections::HashMap;

pub type JsonMapStore = FileStore<JsonMap>;

pub struct JsonMap;

impl FileFormat for JsonMap {
    type Collection = HashMap<String, Todo>;

    const NAME: &'static str = "jsonmap";
    const EMPTY: &'static str = "{}";

    fn decode(raw: &str) -> Result<HashMap<String, Todo>, FormatError> {
        let map: HashMap<String, Todo> = serde_json::from_str(raw)?;
        if let Some((key, todo)) = map.iter().find(|(key, todo)| **key != todo.id) {
            return Err(FormatError::KeyMismatch {
                key: key.clone(),
                id: todo.id.clone(),
            });
        }
        Ok(map)
    }

    fn encode(items: &HashMap<String, Todo>) -> Result<String, FormatError> {
        Ok(serde_json::to_string(items)?)
    }

    fn items(items: &HashMap<String, Todo>) -> Vec<Todo> {
        items.values().cloned().collect()
    }

    fn find<'a>(items: &'a HashMap<String, Todo>, id: &str) -> Option<&'a Todo> {
        items.get(id)
    }

    fn find_mut<'a>(items: &'a mut HashMap<String, Todo>, id: &str) -> Option<&'a mut Todo> {
        items.get_mut(id)
    }

    fn insert(items: &mut HashMap<String, Todo>, todo: Todo) {
        items.insert(todo.id.clone(), todo);
    }

    fn take(items: &mut HashMap<String, Todo>, id: &str) -> Option<Todo> {
        items.remove(id)
    }
}
