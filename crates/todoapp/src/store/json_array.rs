//! JSON array backend: `[{"id":..,"data":..,"status":..}, ...]`.
//!
//! Lookups scan the decoded list, so every operation is O(n) in the number
//! of items. Items keep insertion order.

use super::file_store::{FileFormat, FileStore, FormatError};
use crate::model::Todo;

pub type JsonArrayStore = FileStore<JsonArray>;

pub struct JsonArray;

impl FileFormat for JsonArray {
    type Collection = Vec<Todo>;

    const NAME: &'static str = "json";
    const EMPTY: &'static str = "[]";

    fn decode(raw: &str) -> Result<Vec<Todo>, FormatError> {
        Ok(serde_json::from_str(raw)?)
    }

    fn encode(items: &Vec<Todo>) -> Result<String, FormatError> {
        Ok(serde_json::to_string(items)?)
    }

    fn items(items: &Vec<Todo>) -> Vec<Todo> {
        items.clone()
    }

    fn find<'a>(items: &'a Vec<Todo>, id: &str) -> Option<&'a Todo> {
        items.iter().find(|t| t.id == id)
    }

    fn find_mut<'a>(items: &'a mut Vec<Todo>, id: &str) -> Option<&'a mut Todo> {
        items.iter_mut().find(|t| t.id == id)
    }

    fn insert(items: &mut Vec<Todo>, todo: Todo) {
        items.push(todo);
    }

    fn take(items: &mut Vec<Todo>, id: &str) -> Option<Todo> {
        let pos = items.iter().position(|t| t.id == id)?;
        Some(items.remove(pos))
    }
}
