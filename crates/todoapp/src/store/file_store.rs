//! Read-modify-write engine shared by the file backends.
//!
//! A [`FileStore`] owns one file path. Every operation reads and decodes the
//! whole file; mutations transform the decoded collection in memory and
//! write it back through a temp file and `rename`, so a reader never sees a
//! truncated collection. The on-disk shape is delegated to a
//! [`FileFormat`].

use super::TodoStore;
use crate::context::Context;
use crate::error::{Operation, Result, TodoError};
use crate::model::{Status, Todo};
use parking_lot::Mutex;
use std::fs;
use std::io;
use std::marker::PhantomData;
use std::path::{Path, PathBuf};
use thiserror::Error;
use uuid::Uuid;

#[derive(Error, Debug)]
pub enum FormatError {
    #[error(transparent)]
    Json(#[from] serde_json::Error),

    #[error("entry {key:?} holds a record with id {id:?}")]
    KeyMismatch { key: String, id: String },

    #[error("line {line}: {reason}")]
    Line { line: usize, reason: String },
}

/// On-disk representation of a todo collection.
pub trait FileFormat: Send + Sync + 'static {
    type Collection: Default;

    /// Backend name for logs and [`TodoStore::name`].
    const NAME: &'static str;

    /// Content of a freshly initialized file.
    const EMPTY: &'static str;

    fn decode(raw: &str) -> std::result::Result<Self::Collection, FormatError>;

    fn encode(items: &Self::Collection) -> std::result::Result<String, FormatError>;

    /// All items, in the format's natural order.
    fn items(items: &Self::Collection) -> Vec<Todo>;

    fn find<'a>(items: &'a Self::Collection, id: &str) -> Option<&'a Todo>;

    fn find_mut<'a>(items: &'a mut Self::Collection, id: &str) -> Option<&'a mut Todo>;

    fn insert(items: &mut Self::Collection, todo: Todo);

    fn take(items: &mut Self::Collection, id: &str) -> Option<Todo>;
}

pub struct FileStore<F: FileFormat> {
    path: PathBuf,
    lock: Mutex<()>,
    _format: PhantomData<fn() -> F>,
}

impl<F: FileFormat> FileStore<F> {
    /// Open the store at `path`, creating the file (and its parent
    /// directories) with the format's empty content if it is missing or empty.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        let store = Self {
            path,
            lock: Mutex::new(()),
            _format: PhantomData,
        };
        store.ensure_initialized()?;
        Ok(store)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn location(&self) -> String {
        self.path.display().to_string()
    }

    fn ensure_initialized(&self) -> Result<()> {
        let needs_init = match fs::metadata(&self.path) {
            Ok(meta) => meta.len() == 0,
            Err(e) if e.kind() == io::ErrorKind::NotFound => true,
            Err(e) => return Err(TodoError::unavailable(Operation::Open, self.location(), e)),
        };
        if !needs_init {
            return Ok(());
        }

        if let Some(parent) = self.parent_dir() {
            fs::create_dir_all(parent)
                .map_err(|e| TodoError::unavailable(Operation::Open, self.location(), e))?;
        }
        tracing::debug!(backend = F::NAME, path = %self.path.display(), "initializing store file");
        self.write_atomic(Operation::Open, F::EMPTY)
    }

    fn parent_dir(&self) -> Option<&Path> {
        self.path.parent().filter(|p| !p.as_os_str().is_empty())
    }

    fn load(&self, op: Operation) -> Result<F::Collection> {
        let raw = fs::read_to_string(&self.path).map_err(|e| {
            if e.kind() == io::ErrorKind::InvalidData {
                TodoError::decode(op, self.location(), e)
            } else {
                TodoError::unavailable(op, self.location(), e)
            }
        })?;

        if raw.is_empty() {
            return Ok(F::Collection::default());
        }

        F::decode(&raw).map_err(|e| self.format_error(op, e))
    }

    fn save(&self, op: Operation, items: &F::Collection) -> Result<()> {
        let content = F::encode(items).map_err(|e| self.format_error(op, e))?;
        self.write_atomic(op, &content)
    }

    fn write_atomic(&self, op: Operation, content: &str) -> Result<()> {
        let file_name = self
            .path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| "todo".to_string());
        let tmp_name = format!(".{}-{}.tmp", file_name, Uuid::new_v4());
        let tmp_path = match self.parent_dir() {
            Some(parent) => parent.join(tmp_name),
            None => PathBuf::from(tmp_name),
        };

        let result = fs::write(&tmp_path, content).and_then(|_| fs::rename(&tmp_path, &self.path));
        if let Err(e) = result {
            let _ = fs::remove_file(&tmp_path);
            return Err(TodoError::unavailable(op, self.location(), e));
        }

        tracing::debug!(backend = F::NAME, %op, bytes = content.len(), "wrote store file");
        Ok(())
    }

    fn format_error(&self, op: Operation, err: FormatError) -> TodoError {
        match err {
            FormatError::Line { line, reason } => {
                tracing::warn!(backend = F::NAME, line, %reason, "rejected malformed line");
                TodoError::MalformedLine {
                    op,
                    location: self.location(),
                    line,
                    reason,
                }
            }
            other => {
                tracing::warn!(backend = F::NAME, error = %other, "rejected store content");
                TodoError::decode(op, self.location(), other)
            }
        }
    }

    fn read(&self, ctx: &Context, op: Operation) -> Result<F::Collection> {
        let _guard = ctx.lock(&self.lock, op)?;
        ctx.check(op)?;
        self.load(op)
    }

    /// Load, apply `change`, and write the result back. Nothing is written
    /// when `change` fails or the context fires before the write.
    fn mutate<R>(
        &self,
        ctx: &Context,
        op: Operation,
        change: impl FnOnce(&mut F::Collection) -> Result<R>,
    ) -> Result<R> {
        let _guard = ctx.lock(&self.lock, op)?;
        ctx.check(op)?;
        let mut items = self.load(op)?;
        let out = change(&mut items)?;
        ctx.check(op)?;
        self.save(op, &items)?;
        Ok(out)
    }
}

impl<F: FileFormat> TodoStore for FileStore<F> {
    fn name(&self) -> &'static str {
        F::NAME
    }

    fn add(&self, ctx: &Context, todo: Todo) -> Result<()> {
        tracing::debug!(backend = F::NAME, id = %todo.id, "add");
        self.mutate(ctx, Operation::Add, |items| {
            F::insert(items, todo);
            Ok(())
        })
    }

    fn get_all(&self, ctx: &Context) -> Result<Vec<Todo>> {
        tracing::debug!(backend = F::NAME, "get_all");
        let items = self.read(ctx, Operation::GetAll)?;
        Ok(F::items(&items))
    }

    fn get(&self, ctx: &Context, id: &str) -> Result<Todo> {
        tracing::debug!(backend = F::NAME, id, "get");
        let items = self.read(ctx, Operation::Get)?;
        F::find(&items, id)
            .cloned()
            .ok_or_else(|| TodoError::not_found(Operation::Get, id))
    }

    fn get_by_status(&self, ctx: &Context, status: Status) -> Result<Vec<Todo>> {
        tracing::debug!(backend = F::NAME, %status, "get_by_status");
        let items = self.read(ctx, Operation::GetByStatus)?;
        Ok(F::items(&items)
            .into_iter()
            .filter(|t| t.status == status)
            .collect())
    }

    fn update_data(&self, ctx: &Context, id: &str, data: &str) -> Result<Todo> {
        tracing::debug!(backend = F::NAME, id, "update_data");
        self.mutate(ctx, Operation::UpdateData, |items| {
            let todo = F::find_mut(items, id)
                .ok_or_else(|| TodoError::not_found(Operation::UpdateData, id))?;
            let old = todo.clone();
            todo.data = data.to_string();
            Ok(old)
        })
    }

    fn update_status(&self, ctx: &Context, id: &str, status: Status) -> Result<Todo> {
        tracing::debug!(backend = F::NAME, id, %status, "update_status");
        self.mutate(ctx, Operation::UpdateStatus, |items| {
            let todo = F::find_mut(items, id)
                .ok_or_else(|| TodoError::not_found(Operation::UpdateStatus, id))?;
            let old = todo.clone();
            todo.status = status;
            Ok(old)
        })
    }

    fn remove(&self, ctx: &Context, id: &str) -> Result<Todo> {
        tracing::debug!(backend = F::NAME, id, "remove");
        self.mutate(ctx, Operation::Remove, |items| {
            F::take(items, id).ok_or_else(|| TodoError::not_found(Operation::Remove, id))
        })
    }
}
