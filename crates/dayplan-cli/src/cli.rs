use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use dayplan_core::{FilterMode, Priority, SortMode, TaskId, ViewQuery};

/// Single-user to-do list backed by a local SQLite file.
#[derive(Parser, Debug)]
#[command(name = "dayplan", version, about = "Plan your day from the terminal")]
pub struct Cli {
    /// Path to the SQLite database file.
    #[arg(long, global = true, env = "DAYPLAN_DB", default_value = "database.sqlite")]
    pub db: PathBuf,

    /// Keep tasks in memory only (nothing is written to disk). Overrides --db.
    #[arg(long, global = true)]
    pub in_memory: bool,

    /// More log output on stderr (-v debug, -vv trace). RUST_LOG wins when set.
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Show tasks, optionally searched, filtered and sorted.
    List {
        #[command(flatten)]
        view: ViewArgs,

        /// Print JSON instead of a table.
        #[arg(long)]
        json: bool,
    },

    /// Add a task.
    Add(AddArgs),

    /// Mark a task done, or not done again.
    Toggle { id: TaskId },

    /// Replace a task's text.
    Rename {
        id: TaskId,
        #[arg(required = true, num_args = 1..)]
        text: Vec<String>,
    },

    /// Delete a task.
    Delete {
        id: TaskId,
        /// Do not ask for confirmation.
        #[arg(short, long)]
        yes: bool,
    },

    /// Delete every completed task.
    ClearCompleted {
        /// Do not ask for confirmation.
        #[arg(short, long)]
        yes: bool,
    },

    /// Interactive session keeping search/filter/sort between commands.
    Shell,
}

#[derive(Args, Debug, Clone)]
pub struct AddArgs {
    /// Task text (words are joined with spaces).
    #[arg(num_args = 0..)]
    pub text: Vec<String>,

    #[arg(short, long, default_value = "General")]
    pub category: String,

    /// Due date, e.g. 2025-01-01 or 2025-01-01T17:00.
    #[arg(short, long)]
    pub due: Option<String>,

    #[arg(short, long, default_value_t = Priority::default())]
    pub priority: Priority,
}

#[derive(Args, Debug, Clone, Default)]
pub struct ViewArgs {
    /// Case-insensitive text search.
    #[arg(short, long, default_value = "")]
    pub search: String,

    #[arg(short, long, default_value_t = FilterMode::All)]
    pub filter: FilterMode,

    #[arg(long, default_value_t = SortMode::None)]
    pub sort: SortMode,
}

impl ViewArgs {
    pub fn into_query(self) -> ViewQuery {
        ViewQuery {
            search: self.search,
            filter: self.filter,
            sort: self.sort,
        }
    }
}

/// One line typed into `dayplan shell`.
#[derive(Parser, Debug)]
#[command(no_binary_name = true, disable_version_flag = true)]
pub enum ShellCommand {
    /// Show the current view.
    #[command(alias = "ls")]
    List,
    /// Add a task.
    Add(AddArgs),
    /// Toggle completion.
    Toggle { id: TaskId },
    /// Replace a task's text.
    Rename {
        id: TaskId,
        #[arg(num_args = 0..)]
        text: Vec<String>,
    },
    /// Delete a task.
    #[command(alias = "rm")]
    Delete { id: TaskId },
    /// Delete every completed task.
    #[command(alias = "clear")]
    ClearCompleted,
    /// Set the search term (no words clears it).
    Search {
        #[arg(num_args = 0..)]
        term: Vec<String>,
    },
    /// all, completed or pending.
    Filter { mode: FilterMode },
    /// none, due-date or priority.
    Sort { mode: SortMode },
    /// Leave the shell.
    #[command(alias = "exit")]
    Quit,
}
