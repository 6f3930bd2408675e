//! CLI command implementations
//!
//! Commands write to any `Write` sink so they can be driven from tests; `main`
//! hands them a locked stdout.

pub mod add;
pub mod clear;
pub mod definition;
pub mod interactive;
pub mod list;
pub mod remove;
pub mod show;
pub mod status;
pub mod update;

pub use definition::{Cli, Commands};

use std::io::{self, BufRead, Write};

use crate::task::{Task, TaskId};

const RULE_WIDTH: usize = 50;

/// Print a titled block of rendered tasks, or a "No ... found." line.
pub fn write_task_list(out: &mut impl Write, tasks: &[&Task], title: &str) -> io::Result<()> {
    if tasks.is_empty() {
        return writeln!(out, "No {} found.", title.to_lowercase());
    }

    writeln!(out, "\n{}:", title)?;
    writeln!(out, "{}", "-".repeat(RULE_WIDTH))?;
    for task in tasks {
        writeln!(out, "{}", task)?;
    }
    writeln!(out, "{}", "-".repeat(RULE_WIDTH))
}

pub fn write_task_details(out: &mut impl Write, task: &Task) -> io::Result<()> {
    writeln!(out, "ID: {}", task.id)?;
    writeln!(out, "Title: {}", task.title)?;
    writeln!(out, "Description: {}", task.description)?;
    writeln!(out, "Priority: {}/10", task.priority)?;
    writeln!(out, "Status: {}", task.status)?;
    writeln!(out, "Created: {}", format_timestamp(&task.created_at))?;
    if let Some(completed_at) = &task.completed_at {
        writeln!(out, "Completed: {}", format_timestamp(completed_at))?;
    }
    Ok(())
}

pub fn write_not_found(out: &mut impl Write, id: TaskId) -> io::Result<()> {
    writeln!(out, "✗ Task {} not found", id)
}

fn format_timestamp(ts: &chrono::NaiveDateTime) -> String {
    ts.format("%Y-%m-%d %H:%M:%S").to_string()
}

/// Show `message`, read one line, and return it trimmed. `None` means end of input.
pub fn prompt(
    input: &mut impl BufRead,
    out: &mut impl Write,
    message: &str,
) -> io::Result<Option<String>> {
    write!(out, "{}", message)?;
    out.flush()?;

    let mut response = String::new();
    if input.read_line(&mut response)? == 0 {
        return Ok(None);
    }
    Ok(Some(response.trim().to_string()))
}
