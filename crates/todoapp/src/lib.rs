//! # Todoapp Architecture
//!
//! Todoapp is a **UI-agnostic task tracking library**. The `todo` binary is
//! one client of it; an HTTP service would be another.
//!
//! ## Layers
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │  Client (the `todo` CLI, or any other UI)                   │
//! │  - Parses input, renders output, owns the process           │
//! └─────────────────────────────────────────────────────────────┘
//!                              │
//!                              ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │  API Layer (api.rs)                                         │
//! │  - Assigns ids, validates statuses, applies call budgets    │
//! │  - Returns structured CmdResult values                      │
//! └─────────────────────────────────────────────────────────────┘
//!                              │
//!                              ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │  Storage Layer (store/)                                     │
//! │  - TodoStore trait                                          │
//! │  - JSON array, JSON map, text lines, remote hash backends   │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! The backend is picked once from a [`config::TodoConfig`] by
//! [`init::open_store`] and never changes for the life of the process.
//!
//! ## Key Principle: No I/O Assumptions in Core
//!
//! From `api.rs` inward, code never writes to stdout/stderr, never exits the
//! process, and only reads environment variables inside
//! [`config::TodoConfig::load`]. Every failure is returned as a
//! [`error::TodoError`]; nothing is retried inside the library.
//!
//! ## Module Overview
//!
//! - [`api`]: The API facade, entry point for all operations
//! - [`store`]: Storage contract and backends
//! - [`model`]: `Todo` and `Status`
//! - [`context`]: Deadlines and cancellation for storage calls
//! - [`config`]: Layered configuration
//! - [`init`]: Backend selection
//! - [`error`]: Error types

pub mod api;
pub mod config;
pub mod context;
pub mod error;
pub mod init;
pub mod model;
pub mod store;

#[cfg(test)]
pub(crate) mod test_utils;
