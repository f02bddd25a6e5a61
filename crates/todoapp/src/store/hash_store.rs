//! # Remote Hash Backend
//!
//! Each todo is one hash record in a key-value service, stored under
//! `"{namespace}:{id}"` with the fields `id`, `data` and `status`:
//!
//! ```text
//! todo:1 -> { id: "1", data: "buy milk", status: "TODO" }
//! ```
//!
//! There is no local cache; every call goes to the [`HashClient`].
//!
//! ## Costs
//!
//! `get_all` lists the namespace with a `"{namespace}:*"` key scan and then
//! reads each record, so it costs one round trip per item plus the scan.
//! There is no pagination and no server-side status index: `get_by_status`
//! filters the full scan client-side. This bounds how large a namespace can
//! usefully grow but does not affect correctness.
//!
//! ## Record Rules
//!
//! - A key whose hash has no fields is treated as absent (`NotFound`).
//! - A record without a `data` field, or with an unknown status token, is
//!   undecodable. A missing `status` field reads as pending.
//! - Updates write only the changed field.

use super::hash_client::{HashClient, RemoteError};
use super::TodoStore;
use crate::context::Context;
use crate::error::{Operation, Result, TodoError};
use crate::model::{Status, Todo};
use parking_lot::Mutex;
use std::collections::HashMap;

pub const DEFAULT_NAMESPACE: &str = "todo";

const FIELD_ID: &str = "id";
const FIELD_DATA: &str = "data";
const FIELD_STATUS: &str = "status";

pub struct HashStore<C: HashClient> {
    client: C,
    namespace: String,
    lock: Mutex<()>,
}

impl<C: HashClient> HashStore<C> {
    pub fn new(client: C, namespace: impl Into<String>) -> Self {
        Self {
            client,
            namespace: namespace.into(),
            lock: Mutex::new(()),
        }
    }

    pub fn client(&self) -> &C {
        &self.client
    }

    pub fn namespace(&self) -> &str {
        &self.namespace
    }

    pub fn key(&self, id: &str) -> String {
        format!("{}:{}", self.namespace, id)
    }

    fn unavailable(&self, op: Operation, key: &str, err: RemoteError) -> TodoError {
        TodoError::unavailable(op, key.to_string(), err)
    }

    /// Read and decode one record. `Ok(None)` when the key holds nothing.
    fn fetch(&self, ctx: &Context, op: Operation, id: &str) -> Result<Option<Todo>> {
        ctx.check(op)?;
        let key = self.key(id);
        let fields = self
            .client
            .hgetall(&key)
            .map_err(|e| self.unavailable(op, &key, e))?;
        if fields.is_empty() {
            return Ok(None);
        }
        decode_record(op, &key, id, fields).map(Some)
    }

    fn fetch_existing(&self, ctx: &Context, op: Operation, id: &str) -> Result<Todo> {
        self.fetch(ctx, op, id)?
            .ok_or_else(|| TodoError::not_found(op, id))
    }

    fn scan(&self, ctx: &Context, op: Operation) -> Result<Vec<Todo>> {
        ctx.check(op)?;
        let pattern = format!("{}:*", self.namespace);
        let keys = self
            .client
            .keys(&pattern)
            .map_err(|e| self.unavailable(op, &pattern, e))?;

        let prefix = format!("{}:", self.namespace);
        let mut todos = Vec::with_capacity(keys.len());
        for key in keys {
            let Some(id) = key.strip_prefix(&prefix) else {
                continue;
            };
            // Keys can vanish between the scan and the read.
            if let Some(todo) = self.fetch(ctx, op, id)? {
                todos.push(todo);
            }
        }
        Ok(todos)
    }

    fn write_field(
        &self,
        ctx: &Context,
        op: Operation,
        id: &str,
        field: &str,
        value: &str,
    ) -> Result<()> {
        ctx.check(op)?;
        let key = self.key(id);
        self.client
            .hset(&key, &[(field, value)])
            .map_err(|e| self.unavailable(op, &key, e))
    }
}

fn decode_record(
    op: Operation,
    key: &str,
    key_id: &str,
    mut fields: HashMap<String, String>,
) -> Result<Todo> {
    let data = fields
        .remove(FIELD_DATA)
        .ok_or_else(|| TodoError::decode(op, key, "record has no data field"))?;
    let status_token = fields.remove(FIELD_STATUS).unwrap_or_default();
    let status = Status::parse(&status_token).map_err(|e| TodoError::decode(op, key, e))?;
    let id = fields
        .remove(FIELD_ID)
        .unwrap_or_else(|| key_id.to_string());
    if id != key_id {
        tracing::warn!(key, id = %id, "record id disagrees with its key");
        return Err(TodoError::decode(
            op,
            key,
            format!("record id {:?} does not match key", id),
        ));
    }
    Ok(Todo { id, data, status })
}

impl<C: HashClient> TodoStore for HashStore<C> {
    fn name(&self) -> &'static str {
        "remote"
    }

    fn add(&self, ctx: &Context, todo: Todo) -> Result<()> {
        let op = Operation::Add;
        tracing::debug!(backend = "remote", id = %todo.id, "add");
        let _guard = ctx.lock(&self.lock, op)?;
        ctx.check(op)?;
        let key = self.key(&todo.id);
        self.client
            .hset(
                &key,
                &[
                    (FIELD_ID, todo.id.as_str()),
                    (FIELD_DATA, todo.data.as_str()),
                    (FIELD_STATUS, todo.status.as_str()),
                ],
            )
            .map_err(|e| self.unavailable(op, &key, e))
    }

    fn get_all(&self, ctx: &Context) -> Result<Vec<Todo>> {
        tracing::debug!(backend = "remote", "get_all");
        let _guard = ctx.lock(&self.lock, Operation::GetAll)?;
        self.scan(ctx, Operation::GetAll)
    }

    fn get(&self, ctx: &Context, id: &str) -> Result<Todo> {
        tracing::debug!(backend = "remote", id, "get");
        let _guard = ctx.lock(&self.lock, Operation::Get)?;
        self.fetch_existing(ctx, Operation::Get, id)
    }

    fn get_by_status(&self, ctx: &Context, status: Status) -> Result<Vec<Todo>> {
        tracing::debug!(backend = "remote", %status, "get_by_status");
        let _guard = ctx.lock(&self.lock, Operation::GetByStatus)?;
        let all = self.scan(ctx, Operation::GetByStatus)?;
        Ok(all.into_iter().filter(|t| t.status == status).collect())
    }

    fn update_data(&self, ctx: &Context, id: &str, data: &str) -> Result<Todo> {
        let op = Operation::UpdateData;
        tracing::debug!(backend = "remote", id, "update_data");
        let _guard = ctx.lock(&self.lock, op)?;
        let old = self.fetch_existing(ctx, op, id)?;
        self.write_field(ctx, op, id, FIELD_DATA, data)?;
        Ok(old)
    }

    fn update_status(&self, ctx: &Context, id: &str, status: Status) -> Result<Todo> {
        let op = Operation::UpdateStatus;
        tracing::debug!(backend = "remote", id, %status, "update_status");
        let _guard = ctx.lock(&self.lock, op)?;
        let old = self.fetch_existing(ctx, op, id)?;
        self.write_field(ctx, op, id, FIELD_STATUS, status.as_str())?;
        Ok(old)
    }

    fn remove(&self, ctx: &Context, id: &str) -> Result<Todo> {
        let op = Operation::Remove;
        tracing::debug!(backend = "remote", id, "remove");
        let _guard = ctx.lock(&self.lock, op)?;
        let old = self.fetch_existing(ctx, op, id)?;
        ctx.check(op)?;
        let key = self.key(id);
        self.client
            .del(&key)
            .map_err(|e| self.unavailable(op, &key, e))?;
        Ok(old)
    }
}
