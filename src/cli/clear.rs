//! `tm clear` command implementation

use anyhow::Result;
use clap::Args;
use std::io::{BufRead, Write};

use crate::task::TaskStore;

/// Word the user has to type before everything is deleted
const CONFIRM_WORD: &str = "DELETE";

#[derive(Args)]
pub struct ClearArgs {
    /// Skip confirmation prompt
    #[arg(long)]
    confirm: bool,
}

pub fn run(
    store: &mut TaskStore,
    args: ClearArgs,
    input: &mut impl BufRead,
    out: &mut impl Write,
) -> Result<()> {
    if store.is_empty() {
        writeln!(out, "No tasks to clear.")?;
        return Ok(());
    }

    if args.confirm {
        let count = store.clear()?;
        writeln!(out, "✓ All {} task(s) cleared!", count)?;
        return Ok(());
    }

    writeln!(out, "You have {} task(s).", store.len())?;
    let answer = super::prompt(
        input,
        out,
        "Are you sure you want to delete ALL tasks? This cannot be undone! (type 'DELETE' to confirm): ",
    )?;

    if answer.as_deref() == Some(CONFIRM_WORD) {
        store.clear()?;
        writeln!(out, "✓ All tasks have been cleared!")?;
    } else {
        writeln!(out, "Task clearing cancelled.")?;
    }
    Ok(())
}
