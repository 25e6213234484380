//! linkman CLI
//!
//! Command-line interface for linkman - a personal bookmark manager.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};

use linkman_core::{Config, Store};

mod commands;
mod logging;
mod metadata;
mod output;

use commands::add::AddArgs;
use commands::list::ListArgs;
use output::{recovery_hint, Output, OutputFormat};

#[derive(Parser)]
#[command(name = "linkman")]
#[command(about = "linkman - save, filter and archive links")]
#[command(version)]
#[command(propagate_version = true)]
struct Cli {
    /// Output as JSON
    #[arg(long, global = true)]
    json: bool,

    /// Quiet mode - minimal output
    #[arg(short, long, global = true)]
    quiet: bool,

    /// Path to the config file
    #[arg(long, global = true, value_name = "PATH")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Add links
    Add(AddArgs),
    /// List links
    #[command(alias = "ls")]
    List(ListArgs),
    /// Archive links by id
    Archive {
        /// Link IDs
        #[arg(required = true)]
        ids: Vec<String>,
    },
    /// Show or set configuration
    Config {
        #[command(subcommand)]
        command: Option<ConfigCommands>,
    },
}

#[derive(Subcommand, Clone)]
enum ConfigCommands {
    /// Show current configuration
    Show,
    /// Set a configuration value
    Set {
        /// Configuration key (data_dir, fetch_titles, fetch_timeout_secs, log_file)
        key: String,
        /// Configuration value
        value: String,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    let output = Output::new(OutputFormat::from_flags(cli.json, cli.quiet));

    let result = run(&cli, &output);
    if let Some(hint) = result.as_ref().err().and_then(recovery_hint) {
        output.warn(hint);
    }
    result
}

fn run(cli: &Cli, output: &Output) -> Result<()> {
    let config_path = cli.config.as_ref();

    // Config commands don't need the store
    if let Commands::Config { command } = &cli.command {
        return handle_config_command(command.clone(), config_path, output);
    }

    let config =
        Config::load_with_cli_override(config_path).context("Failed to load configuration")?;
    logging::init(&config);

    let db_path = config.ensure_data_dir()?;
    let store = Store::open(db_path).context("Unable to open links store")?;

    match &cli.command {
        Commands::Add(args) => commands::add::run(&store, &config, args, output),
        Commands::List(args) => commands::list::run(&store, args, output),
        Commands::Archive { ids } => commands::archive::run(&store, ids, output),
        Commands::Config { .. } => unreachable!(), // Handled above
    }
}

fn handle_config_command(
    command: Option<ConfigCommands>,
    config_path: Option<&PathBuf>,
    output: &Output,
) -> Result<()> {
    match command {
        Some(ConfigCommands::Show) | None => commands::config::show(config_path, output),
        Some(ConfigCommands::Set { key, value }) => {
            commands::config::set(key, value, config_path, output)
        }
    }
}
