use std::fmt;
use thiserror::Error;

/// Boxed cause carried by decode and backend failures.
pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// The storage contract operation an error was raised from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operation {
    Open,
    Add,
    GetAll,
    Get,
    GetByStatus,
    UpdateData,
    UpdateStatus,
    Remove,
}

impl Operation {
    pub fn as_str(&self) -> &'static str {
        match self {
            Operation::Open => "open",
            Operation::Add => "add",
            Operation::GetAll => "get_all",
            Operation::Get => "get",
            Operation::GetByStatus => "get_by_status",
            Operation::UpdateData => "update_data",
            Operation::UpdateStatus => "update_status",
            Operation::Remove => "remove",
        }
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Error, Debug)]
pub enum TodoError {
    #[error("{op}: todo not found: {id}")]
    NotFound { op: Operation, id: String },

    #[error(
        "{}invalid status {token:?}{} (expected TODO, DONE or empty)",
        op_prefix(.op),
        id_suffix(.id)
    )]
    InvalidStatus {
        op: Option<Operation>,
        id: Option<String>,
        token: String,
    },

    #[error("{op}: cannot decode {location}: {source}")]
    Decode {
        op: Operation,
        location: String,
        #[source]
        source: BoxError,
    },

    #[error("{op}: malformed line {line} in {location}: {reason}")]
    MalformedLine {
        op: Operation,
        location: String,
        line: usize,
        reason: String,
    },

    #[error("{op}: backend unavailable ({location}): {source}")]
    BackendUnavailable {
        op: Operation,
        location: String,
        #[source]
        source: BoxError,
    },

    #[error("{op}: cancelled")]
    Cancelled { op: Operation },

    #[error("Config error: {0}")]
    Config(String),
}

/// Flat classification of [`TodoError`], for callers that branch on the
/// failure class without caring about its payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    NotFound,
    InvalidStatus,
    Decode,
    MalformedLine,
    BackendUnavailable,
    Cancelled,
    Config,
}

impl TodoError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            TodoError::NotFound { .. } => ErrorKind::NotFound,
            TodoError::InvalidStatus { .. } => ErrorKind::InvalidStatus,
            TodoError::Decode { .. } => ErrorKind::Decode,
            TodoError::MalformedLine { .. } => ErrorKind::MalformedLine,
            TodoError::BackendUnavailable { .. } => ErrorKind::BackendUnavailable,
            TodoError::Cancelled { .. } => ErrorKind::Cancelled,
            TodoError::Config(_) => ErrorKind::Config,
        }
    }

    pub(crate) fn not_found(op: Operation, id: &str) -> Self {
        TodoError::NotFound {
            op,
            id: id.to_string(),
        }
    }

    pub(crate) fn invalid_status(token: impl Into<String>) -> Self {
        TodoError::InvalidStatus {
            op: None,
            id: None,
            token: token.into(),
        }
    }

    /// Attach the operation (and target id) to a status error raised while
    /// parsing its input. Other errors already carry theirs.
    pub(crate) fn with_operation(self, op: Operation, id: Option<&str>) -> Self {
        match self {
            TodoError::InvalidStatus { token, .. } => TodoError::InvalidStatus {
                op: Some(op),
                id: id.map(str::to_string),
                token,
            },
            other => other,
        }
    }

    pub(crate) fn unavailable(
        op: Operation,
        location: impl Into<String>,
        source: impl Into<BoxError>,
    ) -> Self {
        TodoError::BackendUnavailable {
            op,
            location: location.into(),
            source: source.into(),
        }
    }

    pub(crate) fn decode(
        op: Operation,
        location: impl Into<String>,
        source: impl Into<BoxError>,
    ) -> Self {
        TodoError::Decode {
            op,
            location: location.into(),
            source: source.into(),
        }
    }
}

pub type Result<T> = std::result::Result<T, TodoError>;

fn op_prefix(op: &Option<Operation>) -> String {
    op.map(|op| format!("{}: ", op)).unwrap_or_default()
}

fn id_suffix(id: &Option<String>) -> String {
    id.as_deref()
        .map(|id| format!(" for todo {}", id))
        .unwrap_or_default()
}
