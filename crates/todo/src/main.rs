//! # Todo CLI
//!
//! The binary is thin: everything lives in `src/cli/`, and this file only
//! calls `cli::run()` and turns a failure into an exit code.
//!
//! ```text
//! ┌───────────────────────────────────────────────┐
//! │  CLI (crates/todo/src/cli/)                   │
//! │  - clap parsing (setup.rs)                    │
//! │  - config, logging, dispatch (commands.rs)    │
//! │  - terminal output (render.rs)                │
//! └───────────────────────────────────────────────┘
//!                         │
//!                         ▼
//! ┌───────────────────────────────────────────────┐
//! │  API (crates/todoapp/src/api.rs)              │
//! │  - returns structured `CmdResult` values      │
//! └───────────────────────────────────────────────┘
//!                         │
//!                         ▼
//! ┌───────────────────────────────────────────────┐
//! │  Stores (crates/todoapp/src/store/)           │
//! │  - one `TodoStore` contract, four backends    │
//! └───────────────────────────────────────────────┘
//! ```
//!
//! Nothing below the CLI prints, exits or reads process arguments.

mod cli;

fn main() {
    if let Err(e) = cli::run() {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}
