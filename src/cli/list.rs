//! `tm list` command implementation

use anyhow::Result;
use clap::Args;
use std::io::Write;

use crate::task::{Task, TaskStatus, TaskStore};

#[derive(Args)]
pub struct ListArgs {
    /// Filter by status (pending, done)
    #[arg(short, long)]
    status: Option<TaskStatus>,

    /// Filter by priority (ignored when --status is given)
    #[arg(short, long, value_parser = clap::value_parser!(u8).range(1..=10))]
    priority: Option<u8>,

    /// Output as JSON
    #[arg(long)]
    json: bool,
}

pub fn run(store: &TaskStore, args: ListArgs, out: &mut impl Write) -> Result<()> {
    let (tasks, title) = if let Some(status) = args.status {
        (store.list(Some(status)), format!("{} Tasks", capitalize(status.label())))
    } else if let Some(priority) = args.priority {
        (
            store.list_by_priority(priority),
            format!("Priority {} Tasks", priority),
        )
    } else {
        (store.list(None), "All Tasks".to_string())
    };

    if args.json {
        return write_json(out, &tasks);
    }

    super::write_task_list(out, &tasks, &title)?;
    Ok(())
}

fn write_json(out: &mut impl Write, tasks: &[&Task]) -> Result<()> {
    let records = tasks
        .iter()
        .map(|t| t.to_record())
        .collect::<crate::task::Result<Vec<_>>>()?;
    writeln!(out, "{}", serde_json::to_string_pretty(&records)?)?;
    Ok(())
}

fn capitalize(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}
