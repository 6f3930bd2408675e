//! tm - local command-line task tracker

use anyhow::{Context, Result};
use clap::{CommandFactory, Parser};
use clap_complete::generate;
use std::io::{self, Write};
use task_tracker::cli::{self, Cli, Commands};
use task_tracker::config::Config;
use task_tracker::task::TaskStore;

fn main() -> Result<()> {
    if std::env::var("TASK_TRACKER_DEBUG").is_ok() {
        tracing_subscriber::fmt()
            .with_env_filter("task_tracker=debug")
            .with_writer(io::stderr)
            .init();
    }

    let cli = Cli::parse();

    // Commands that never touch the task file
    let command = match cli.command {
        Some(Commands::Completion { shell }) => {
            generate(shell, &mut Cli::command(), "tm", &mut io::stdout());
            return Ok(());
        }
        Some(command) => command,
        None => {
            Cli::command().print_help()?;
            return Ok(());
        }
    };

    let config = Config::load()?;
    let path = config.resolve_tasks_file(cli.file);
    let mut store = TaskStore::open(&path)
        .with_context(|| format!("Failed to open task file {}", path.display()))?
        .with_backup(config.storage.backup_on_save);

    let stdout = io::stdout();
    let mut out = stdout.lock();

    match command {
        Commands::Add(args) => cli::add::run(&mut store, args, &mut out)?,
        Commands::List(args) => cli::list::run(&store, args, &mut out)?,
        Commands::Done(args) => cli::status::run_done(&mut store, args, &mut out)?,
        Commands::Pending(args) => cli::status::run_pending(&mut store, args, &mut out)?,
        Commands::Remove(args) => cli::remove::run(&mut store, args, &mut out)?,
        Commands::Update(args) => cli::update::run(&mut store, args, &mut out)?,
        Commands::Show(args) => cli::show::run(&store, args, &mut out)?,
        Commands::Clear(args) => {
            cli::clear::run(&mut store, args, &mut io::stdin().lock(), &mut out)?
        }
        Commands::Interactive => {
            cli::interactive::Menu::new(&mut store, io::stdin().lock(), &mut out).run()?
        }
        Commands::Completion { .. } => unreachable!(),
    }

    out.flush()?;
    Ok(())
}
