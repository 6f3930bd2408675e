//! Top-level clap definitions for `tm`

use clap::{Parser, Subcommand};
use clap_complete::Shell;
use std::path::PathBuf;

use super::add::AddArgs;
use super::clear::ClearArgs;
use super::list::ListArgs;
use super::remove::RemoveArgs;
use super::show::ShowArgs;
use super::status::StatusArgs;
use super::update::UpdateArgs;

#[derive(Parser)]
#[command(name = "tm")]
#[command(about = "Track short-lived tasks in a local JSON file", version)]
pub struct Cli {
    /// Task file to use (defaults to the configured file, then ./tasks.json)
    #[arg(long, global = true, env = "TASK_TRACKER_FILE")]
    pub file: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Add a new task
    Add(AddArgs),

    /// List tasks
    List(ListArgs),

    /// Mark task as done
    Done(StatusArgs),

    /// Mark task as pending
    Pending(StatusArgs),

    /// Remove a task
    Remove(RemoveArgs),

    /// Update a task
    Update(UpdateArgs),

    /// Show a specific task
    Show(ShowArgs),

    /// Clear all tasks
    Clear(ClearArgs),

    /// Menu-driven interface
    Interactive,

    /// Generate shell completions
    Completion {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}
