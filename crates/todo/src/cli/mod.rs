//! # CLI Behavior
//!
//! One client for todoapp. It owns terminal I/O, exit codes and output
//! formatting; the library does none of that.
//!
//! Running `todo` with no subcommand lists every todo.
//!
//! ## Choosing a Backend
//!
//! Settings are layered, later layers winning:
//!
//! 1. Built-in defaults (`json` backend, `todo.json` in the data directory)
//! 2. `todo.toml` in the data directory
//! 3. `TODO_BACKEND`, `TODO_FILE`, `TODO_NAMESPACE`, `TODO_REDIS_URL`
//! 4. `--backend`, `--file`, `--namespace`, `--redis-url`
//!
//! The data directory is `--data`, else `TODO_DATA_DIR`, else the platform
//! data directory.
//!
//! The `remote` backend stores one hash per todo on the Redis server at
//! `redis_url` (default `redis://127.0.0.1:6379`).
//!
//! ## Module Structure
//!
//! - `commands`: setup and dispatch to the API
//! - `render`: output formatting (tables, colors, messages, JSON)
//! - `setup`: argument parsing via clap

mod commands;
mod render;
pub mod setup;

pub use commands::run;
