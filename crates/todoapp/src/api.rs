//! # API Facade
//!
//! The API layer is a **thin facade** over the storage contract. It is the
//! single entry point for todo operations regardless of the UI in front of
//! it.
//!
//! ## Role and Responsibilities
//!
//! The facade:
//! - **Assigns ids** to new items ([`Todo::new`])
//! - **Normalizes inputs**: human status strings become [`Status`] values
//!   before any store is touched
//! - **Applies the call budget**: every call runs under a fresh
//!   [`Context`], bounded by the configured timeout if any
//! - **Returns structured types** (`Result<CmdResult>`)
//!
//! It does no printing and no formatting; rendering belongs to the client.
//!
//! ## Generic Over the Backend
//!
//! `TodoApi` holds a `Box<dyn TodoStore>` picked once at startup
//! ([`crate::init::open_store`]). Tests build it over any store directly.

use crate::context::Context;
use crate::error::{Operation, Result};
use crate::model::{Status, Todo};
use crate::store::TodoStore;
use serde::Serialize;
use std::time::Duration;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum MessageLevel {
    Info,
    Success,
}

#[derive(Debug, Clone, Serialize)]
pub struct CmdMessage {
    pub level: MessageLevel,
    pub content: String,
}

impl CmdMessage {
    pub fn info(content: impl Into<String>) -> Self {
        Self {
            level: MessageLevel::Info,
            content: content.into(),
        }
    }

    pub fn success(content: impl Into<String>) -> Self {
        Self {
            level: MessageLevel::Success,
            content: content.into(),
        }
    }
}

/// Structured outcome of an API call.
///
/// - `affected`: items as they are after a mutation
/// - `previous`: the same items as they were before it
/// - `listed`: items returned by a read
#[derive(Debug, Default, Serialize)]
pub struct CmdResult {
    pub affected: Vec<Todo>,
    pub previous: Vec<Todo>,
    pub listed: Vec<Todo>,
    pub messages: Vec<CmdMessage>,
}

impl CmdResult {
    pub fn add_message(&mut self, message: CmdMessage) {
        self.messages.push(message);
    }

    pub fn with_listed(mut self, todos: Vec<Todo>) -> Self {
        self.listed = todos;
        self
    }
}

pub struct TodoApi {
    store: Box<dyn TodoStore>,
    timeout: Option<Duration>,
}

impl TodoApi {
    pub fn new(store: Box<dyn TodoStore>) -> Self {
        Self {
            store,
            timeout: None,
        }
    }

    /// Bound every subsequent call to `timeout`.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    pub fn store(&self) -> &dyn TodoStore {
        self.store.as_ref()
    }

    fn context(&self) -> Context {
        match self.timeout {
            Some(timeout) => Context::background().with_timeout(timeout),
            None => Context::background(),
        }
    }

    pub fn add(&self, data: impl Into<String>, status: Option<&str>) -> Result<CmdResult> {
        let status = status
            .map(Status::from_user_input)
            .transpose()
            .map_err(|e| e.with_operation(Operation::Add, None))?
            .unwrap_or_default();
        let todo = Todo {
            status,
            ..Todo::new(data)
        };
        self.store.add(&self.context(), todo.clone())?;

        let mut result = CmdResult::default();
        result.add_message(CmdMessage::success(format!("Added todo {}", todo.id)));
        result.affected.push(todo);
        Ok(result)
    }

    pub fn list(&self) -> Result<CmdResult> {
        let todos = self.store.get_all(&self.context())?;
        Ok(listing(todos))
    }

    pub fn list_by_status(&self, status: &str) -> Result<CmdResult> {
        let status = Status::from_user_input(status)
            .map_err(|e| e.with_operation(Operation::GetByStatus, None))?;
        let todos = self.store.get_by_status(&self.context(), status)?;
        Ok(listing(todos))
    }

    pub fn get(&self, id: &str) -> Result<CmdResult> {
        let todo = self.store.get(&self.context(), id)?;
        Ok(CmdResult::default().with_listed(vec![todo]))
    }

    pub fn update_data(&self, id: &str, data: &str) -> Result<CmdResult> {
        let old = self.store.update_data(&self.context(), id, data)?;
        let new = Todo {
            data: data.to_string(),
            ..old.clone()
        };
        let message = format!("Updated todo {}", new.id);
        Ok(modification(old, new, message))
    }

    pub fn update_status(&self, id: &str, status: &str) -> Result<CmdResult> {
        let status = Status::from_user_input(status)
            .map_err(|e| e.with_operation(Operation::UpdateStatus, Some(id)))?;
        let old = self.store.update_status(&self.context(), id, status)?;
        let new = Todo {
            status,
            ..old.clone()
        };
        let message = format!("Marked todo {} as {}", new.id, new.status);
        Ok(modification(old, new, message))
    }

    pub fn remove(&self, id: &str) -> Result<CmdResult> {
        let old = self.store.remove(&self.context(), id)?;

        let mut result = CmdResult::default();
        result.add_message(CmdMessage::success(format!("Removed todo {}", old.id)));
        result.previous.push(old);
        Ok(result)
    }
}

fn listing(todos: Vec<Todo>) -> CmdResult {
    let mut result = CmdResult::default();
    if todos.is_empty() {
        result.add_message(CmdMessage::info("No todos."));
    }
    result.with_listed(todos)
}

fn modification(old: Todo, new: Todo, message: String) -> CmdResult {
    let mut result = CmdResult::default();
    result.add_message(CmdMessage::success(message));
    result.previous.push(old);
    result.affected.push(new);
    result
}
