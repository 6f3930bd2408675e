//! `tm add` command implementation

use anyhow::Result;
use clap::Args;
use std::io::Write;

use crate::task::TaskStore;

#[derive(Args)]
pub struct AddArgs {
    /// Task title
    title: String,

    /// Task description
    #[arg(short, long)]
    description: Option<String>,

    /// Priority (1-10, default 5)
    #[arg(short, long, value_parser = clap::value_parser!(u8).range(1..=10))]
    priority: Option<u8>,
}

pub fn run(store: &mut TaskStore, args: AddArgs, out: &mut impl Write) -> Result<()> {
    let task = store.add(&args.title, args.description.as_deref(), args.priority)?;
    writeln!(out, "✓ Task added: {}", task)?;
    Ok(())
}
