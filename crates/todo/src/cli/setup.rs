use clap::{Parser, Subcommand};
use std::path::PathBuf;
use todoapp::config::BackendKind;

#[derive(Parser, Debug)]
#[command(
    name = "todo",
    bin_name = "todo",
    version,
    disable_help_subcommand = true
)]
#[command(about = "Keep a todo list in a file or a hash store", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Storage backend: json, jsonmap, text or remote
    #[arg(short, long, global = true, help_heading = "Options")]
    pub backend: Option<BackendKind>,

    /// Store file for file backends, relative to the data directory
    #[arg(short, long, global = true, help_heading = "Options")]
    pub file: Option<PathBuf>,

    /// Key namespace for the remote backend
    #[arg(long, global = true, help_heading = "Options")]
    pub namespace: Option<String>,

    /// Server URL for the remote backend
    #[arg(long, global = true, value_name = "URL", help_heading = "Options")]
    pub redis_url: Option<String>,

    /// Data directory holding todo.toml and the store files
    #[arg(
        long = "data",
        id = "data_dir",
        value_name = "DIR",
        global = true,
        help_heading = "Options"
    )]
    pub data_dir: Option<PathBuf>,

    /// Print results as JSON
    #[arg(long, global = true, help_heading = "Options")]
    pub json: bool,

    /// Verbose output
    #[arg(short, long, global = true, help_heading = "Options")]
    pub verbose: bool,
}

#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Commands {
    /// Add a new todo
    Add {
        /// Text of the todo
        data: String,

        /// Initial status (todo or done)
        #[arg(short, long)]
        status: Option<String>,
    },

    /// List todos
    #[command(alias = "ls")]
    List {
        /// Only show todos with this status (todo or done)
        #[arg(short, long)]
        status: Option<String>,
    },

    /// Show one todo
    Get {
        /// Todo id
        id: String,
    },

    /// Replace the text of a todo
    Update {
        /// Todo id
        id: String,

        /// New text
        data: String,
    },

    /// Set the status of a todo
    Status {
        /// Todo id
        id: String,

        /// New status (todo or done)
        status: String,
    },

    /// Remove a todo
    #[command(alias = "remove")]
    Rm {
        /// Todo id
        id: String,
    },
}

pub fn parse_cli() -> Cli {
    Cli::parse()
}
