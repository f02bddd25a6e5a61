//! # Domain Model
//!
//! A [`Todo`] is a free-text task with a two-valued [`Status`].
//!
//! ## Status Tokens
//!
//! Persisted files and remote records use the tokens `TODO` and `DONE`.
//! The empty string is accepted wherever a status is read and normalizes to
//! [`Status::Pending`], so an item read back through a store always carries
//! a concrete status. Any other token is rejected with
//! [`TodoError::InvalidStatus`].
//!
//! | Token    | Status             |
//! |----------|--------------------|
//! | `"TODO"` | [`Status::Pending`] |
//! | `""`     | [`Status::Pending`] |
//! | `"DONE"` | [`Status::Done`]    |
//!
//! ## Identity
//!
//! Ids are opaque strings assigned by the caller at creation time
//! ([`Todo::new`] uses a UUID v4). Stores never generate or rewrite them.

use crate::error::{Result, TodoError};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Status {
    #[default]
    Pending,
    Done,
}

impl Status {
    pub const PENDING_TOKEN: &'static str = "TODO";
    pub const DONE_TOKEN: &'static str = "DONE";

    /// Parse a persisted status token. Empty means pending.
    pub fn parse(token: &str) -> Result<Self> {
        match token {
            "" | Self::PENDING_TOKEN => Ok(Status::Pending),
            Self::DONE_TOKEN => Ok(Status::Done),
            other => Err(TodoError::invalid_status(other)),
        }
    }

    /// Lenient parsing for human input: persisted tokens plus
    /// case-insensitive `todo`, `pending` and `done`.
    pub fn from_user_input(input: &str) -> Result<Self> {
        let trimmed = input.trim();
        match trimmed.to_ascii_lowercase().as_str() {
            "" | "todo" | "pending" => Ok(Status::Pending),
            "done" => Ok(Status::Done),
            _ => Err(TodoError::invalid_status(trimmed)),
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Status::Pending => Self::PENDING_TOKEN,
            Status::Done => Self::DONE_TOKEN,
        }
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Status {
    type Err = TodoError;

    fn from_str(s: &str) -> Result<Self> {
        Status::parse(s)
    }
}

impl Serialize for Status {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for Status {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let token = String::deserialize(deserializer)?;
        Status::parse(&token).map_err(serde::de::Error::custom)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Todo {
    pub id: String,
    pub data: String,
    // Records written without a status field read back as pending
    #[serde(default)]
    pub status: Status,
}

impl Todo {
    /// A fresh pending item with a generated id.
    pub fn new(data: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            data: data.into(),
            status: Status::Pending,
        }
    }

    pub fn with_id(id: impl Into<String>, data: impl Into<String>, status: Status) -> Self {
        Self {
            id: id.into(),
            data: data.into(),
            status,
        }
    }
}
