//! `tm show` command implementation

use anyhow::Result;
use clap::Args;
use std::io::Write;

use crate::task::{TaskId, TaskStore};

#[derive(Args)]
pub struct ShowArgs {
    /// Task ID
    id: TaskId,

    /// Output as JSON
    #[arg(long)]
    json: bool,
}

pub fn run(store: &TaskStore, args: ShowArgs, out: &mut impl Write) -> Result<()> {
    let Some(task) = store.get(args.id) else {
        super::write_not_found(out, args.id)?;
        return Ok(());
    };

    if args.json {
        writeln!(out, "{}", serde_json::to_string_pretty(&task.to_record()?)?)?;
        return Ok(());
    }

    writeln!(out, "\nTask Details:")?;
    super::write_task_details(out, task)?;
    Ok(())
}
