//! CLI argument definitions for taskmirror.

use clap::{Parser, Subcommand};

/// Taskmirror - mirror a remote task list into a locally indexed snapshot.
///
/// Tasks are addressed by the display index shown in listings, not by the
/// service's identifiers.
#[derive(Parser, Debug)]
#[command(name = "tm")]
#[command(author, version, about = "Mirror and query a remote task list by stable local indices", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

/// Top-level commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Fetch remote state and rebuild the local cache
    Sync,

    /// List projects with visible task counts
    Projects,

    /// List labels with usage counts
    Labels,

    /// List tasks, optionally filtered by project or label name
    List {
        #[command(subcommand)]
        filter: Option<ListFilter>,
    },

    /// Add a task to a project
    Add {
        /// Project name (created when it does not exist)
        project: String,

        /// Task words; words starting with @ become label attachments
        #[arg(required = true)]
        words: Vec<String>,
    },

    /// Mark the task with the given display index as done
    Done {
        /// Display index from a listing
        index: u32,
    },

    /// Move the task with the given display index to another project
    Move {
        /// Display index from a listing
        index: u32,

        /// Target project name
        #[arg(required = true)]
        project: Vec<String>,
    },

    /// Archive a project
    Archive {
        /// Project name (exact, case-insensitive)
        #[arg(required = true)]
        project: Vec<String>,
    },

    /// Delete entities on the remote service
    Delete {
        #[command(subcommand)]
        command: DeleteCommands,
    },

    /// Query the cached snapshot without touching the network
    Cache {
        #[command(subcommand)]
        command: CacheCommands,
    },
}

/// Filters for `tm list`
#[derive(Subcommand, Debug)]
pub enum ListFilter {
    /// Tasks in projects whose name matches
    Project {
        #[arg(required = true)]
        name: Vec<String>,
    },

    /// Tasks carrying a label whose name matches
    Label {
        #[arg(required = true)]
        name: Vec<String>,
    },
}

/// Delete subcommands
#[derive(Subcommand, Debug)]
pub enum DeleteCommands {
    /// Delete a label by name (exact, case-insensitive)
    Label {
        #[arg(required = true)]
        name: Vec<String>,
    },
}

/// Cache subcommands
#[derive(Subcommand, Debug)]
pub enum CacheCommands {
    /// List cached project names
    Projects,
}
