//! `tm remove` command implementation

use anyhow::Result;
use clap::Args;
use std::io::Write;

use crate::task::{TaskId, TaskStore};

#[derive(Args)]
pub struct RemoveArgs {
    /// Task ID
    id: TaskId,
}

pub fn run(store: &mut TaskStore, args: RemoveArgs, out: &mut impl Write) -> Result<()> {
    match store.remove(args.id)? {
        Some(task) => writeln!(out, "✓ Task {} removed: {}", task.id, task.title)?,
        None => super::write_not_found(out, args.id)?,
    }
    Ok(())
}
