//! # Storage Layer
//!
//! This module defines the storage contract for todoapp. The [`TodoStore`]
//! trait is implemented by every backend, and callers only ever hold a
//! `Box<dyn TodoStore>` chosen once at startup (see [`crate::init`]).
//!
//! ## Backends
//!
//! | Backend | Type | Persisted as |
//! |---------|------|--------------|
//! | `json` | [`json_array::JsonArrayStore`] | one JSON array in one file |
//! | `jsonmap` | [`json_map::JsonMapStore`] | one JSON object keyed by id |
//! | `text` | [`text::TextStore`] | one `id: data: status` line per item |
//! | `remote` | [`hash_store::HashStore`] | one hash record per item in a key-value service |
//!
//! The three file backends share the read-modify-write engine in
//! [`file_store`]; they only differ in their [`file_store::FileFormat`].
//!
//! ## Contract
//!
//! - `add` inserts. Array and text stores do not check for an existing id:
//!   duplicate ids are undefined behaviour and lookups act on the first
//!   match. The map and remote stores key by id and replace the entry.
//! - `get_all` on an empty collection is an empty list, never an error.
//!   Ordering is insertion order for the array and text stores and
//!   unspecified for the map and remote stores.
//! - `get`, `update_data`, `update_status` and `remove` fail with
//!   [`TodoError::NotFound`](crate::error::TodoError::NotFound) when the id
//!   is absent.
//! - Updates and `remove` return the item as it was before the call.
//! - A failed mutation leaves the backend untouched: the new collection is
//!   built in memory and only then written (file stores), or the single
//!   field write is the last step (remote store).
//!
//! ## Concurrency
//!
//! Each store instance serializes its operations with an internal
//! `parking_lot::Mutex`, so one instance may be shared across threads.
//! Two instances over the same file or namespace are not coordinated.

use crate::context::Context;
use crate::error::{Operation, Result};
use crate::model::{Status, Todo};

pub mod file_store;
pub mod hash_client;
pub mod hash_store;
pub mod json_array;
pub mod json_map;
#[cfg(any(test, feature = "test_utils"))]
pub mod mem_client;
pub mod redis_client;
pub mod text;

/// Abstract interface for todo storage.
pub trait TodoStore: Send + Sync {
    /// Short backend name used in logs.
    fn name(&self) -> &'static str;

    fn add(&self, ctx: &Context, todo: Todo) -> Result<()>;

    fn get_all(&self, ctx: &Context) -> Result<Vec<Todo>>;

    fn get(&self, ctx: &Context, id: &str) -> Result<Todo>;

    fn get_by_status(&self, ctx: &Context, status: Status) -> Result<Vec<Todo>>;

    /// Replace the data of `id`, returning the previous item.
    fn update_data(&self, ctx: &Context, id: &str, data: &str) -> Result<Todo>;

    /// Replace the status of `id`, returning the previous item.
    fn update_status(&self, ctx: &Context, id: &str, status: Status) -> Result<Todo>;

    /// Delete `id`, returning the deleted item.
    fn remove(&self, ctx: &Context, id: &str) -> Result<Todo>;

    /// [`get_by_status`](Self::get_by_status) with a raw status token.
    /// Unknown tokens fail with `InvalidStatus` before any I/O.
    fn get_by_status_token(&self, ctx: &Context, token: &str) -> Result<Vec<Todo>> {
        let status =
            Status::parse(token).map_err(|e| e.with_operation(Operation::GetByStatus, None))?;
        self.get_by_status(ctx, status)
    }

    /// [`update_status`](Self::update_status) with a raw status token.
    /// Unknown tokens fail with `InvalidStatus` and nothing is written.
    fn update_status_token(&self, ctx: &Context, id: &str, token: &str) -> Result<Todo> {
        let status = Status::parse(token)
            .map_err(|e| e.with_operation(Operation::UpdateStatus, Some(id)))?;
        self.update_status(ctx, id, status)
    }
}

impl<S: TodoStore + ?Sized> TodoStore for Box<S> {
    fn name(&self) -> &'static str {
        (**self).name()
    }

    fn add(&self, ctx: &Context, todo: Todo) -> Result<()> {
        (**self).add(ctx, todo)
    }

    fn get_all(&self, ctx: &Context) -> Result<Vec<Todo>> {
        (**self).get_all(ctx)
    }

    fn get(&self, ctx: &Context, id: &str) -> Result<Todo> {
        (**self).get(ctx, id)
    }

    fn get_by_status(&self, ctx: &Context, status: Status) -> Result<Vec<Todo>> {
        (**self).get_by_status(ctx, status)
    }

    fn update_data(&self, ctx: &Context, id: &str, data: &str) -> Result<Todo> {
        (**self).update_data(ctx, id, data)
    }

    fn update_status(&self, ctx: &Context, id: &str, status: Status) -> Result<Todo> {
        (**self).update_status(ctx, id, status)
    }

    fn remove(&self, ctx: &Context, id: &str) -> Result<Todo> {
        (**self).remove(ctx, id)
    }
}
