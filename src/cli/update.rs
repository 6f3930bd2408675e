//! `tm update` command implementation

use anyhow::Result;
use clap::Args;
use std::io::Write;

use crate::task::{TaskId, TaskStore, TaskUpdate};

#[derive(Args)]
pub struct UpdateArgs {
    /// Task ID
    id: TaskId,

    /// New title
    #[arg(short, long)]
    title: Option<String>,

    /// New description
    #[arg(short, long)]
    description: Option<String>,

    /// New priority (1-10)
    #[arg(short, long, value_parser = clap::value_parser!(u8).range(1..=10))]
    priority: Option<u8>,
}

pub fn run(store: &mut TaskStore, args: UpdateArgs, out: &mut impl Write) -> Result<()> {
    let changes = TaskUpdate {
        title: args.title,
        description: args.description,
        priority: args.priority,
    };

    if !store.update(args.id, changes)? {
        super::write_not_found(out, args.id)?;
        return Ok(());
    }

    writeln!(out, "✓ Task {} updated", args.id)?;
    let task = store.require(args.id)?;
    writeln!(out, "Updated task: {}", task)?;
    Ok(())
}
