//! `tm done` / `tm pending` command implementations

use anyhow::Result;
use clap::Args;
use std::io::Write;

use crate::task::{TaskId, TaskStore};

#[derive(Args)]
pub struct StatusArgs {
    /// Task ID
    id: TaskId,
}

pub fn run_done(store: &mut TaskStore, args: StatusArgs, out: &mut impl Write) -> Result<()> {
    if store.mark_done(args.id)? {
        writeln!(out, "✓ Task {} marked as done", args.id)?;
    } else {
        super::write_not_found(out, args.id)?;
    }
    Ok(())
}

pub fn run_pending(store: &mut TaskStore, args: StatusArgs, out: &mut impl Write) -> Result<()> {
    if store.mark_pending(args.id)? {
        writeln!(out, "✓ Task {} marked as pending", args.id)?;
    } else {
        super::write_not_found(out, args.id)?;
    }
    Ok(())
}
