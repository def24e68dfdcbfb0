//! Taskmirror CLI - mirror a remote task list into a locally indexed
//! snapshot and address tasks by their display index.

use clap::Parser;
use taskmirror::cli::{CacheCommands, Cli, Commands, DeleteCommands, ListFilter};
use taskmirror::commands;
use taskmirror::config::Config;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

fn main() {
    // Tracing is opt-in via RUST_LOG; logs go to stderr so listings on
    // stdout stay clean.
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("off"));
    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(filter)
        .init();

    let cli = Cli::parse();
    match run(cli.command) {
        Ok(lines) => {
            if !lines.is_empty() {
                println!("{}", lines.join("\n"));
            }
        }
        // Lookup misses are user-facing messages, not process failures.
        Err(e) if e.is_benign() => println!("{e}"),
        Err(e) => {
            eprintln!("Error: {e}");
            std::process::exit(1);
        }
    }
}

fn run(command: Commands) -> taskmirror::Result<Vec<String>> {
    let config = Config::resolve()?;
    match command {
        Commands::Sync => commands::sync(&config),
        Commands::Projects => commands::projects(&config),
        Commands::Labels => commands::labels(&config),
        Commands::List { filter } => match filter {
            None => commands::list_all(&config),
            Some(ListFilter::Project { name }) => {
                commands::list_project(&config, &name.join(" "))
            }
            Some(ListFilter::Label { name }) => commands::list_label(&config, &name.join(" ")),
        },
        Commands::Add { project, words } => commands::add(&config, &project, &words),
        Commands::Done { index } => commands::done(&config, index),
        Commands::Move { index, project } => {
            commands::move_item(&config, index, &project.join(" "))
        }
        Commands::Archive { project } => commands::archive(&config, &project.join(" ")),
        Commands::Delete {
            command: DeleteCommands::Label { name },
        } => commands::delete_label(&config, &name.join(" ")),
        Commands::Cache {
            command: CacheCommands::Projects,
        } => commands::cache_projects(&config),
    }
}
