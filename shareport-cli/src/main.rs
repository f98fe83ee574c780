//! SharePort CLI - batch download from a SharePort USB share.
//!
//! Logs in to the device, lists one directory on the attached USB volume and
//! saves every file in it locally.

mod commands;
mod error;
mod progress;
mod runner;

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use shareport::config::config_file_path;

use commands::common::{ConnectionArgs, SaveArgs};
use commands::config::ConfigCommands;
use error::CliError;
use runner::CliRunner;

#[derive(Parser)]
#[command(name = "shareport")]
#[command(version, about = "Download files from a SharePort USB share", long_about = None)]
struct Cli {
    /// Configuration file (default: <config dir>/shareport/config.ini)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Enable debug logging
    #[arg(long, short = 'v', global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Download every file in the remote directory
    Fetch {
        #[command(flatten)]
        connection: ConnectionArgs,

        #[command(flatten)]
        save: SaveArgs,
    },

    /// List the remote directory without downloading
    List {
        #[command(flatten)]
        connection: ConnectionArgs,
    },

    /// Create a configuration file with default values
    Init,

    /// View or modify configuration settings
    Config {
        #[command(subcommand)]
        command: ConfigCommands,
    },
}

fn main() {
    let cli = Cli::parse();

    if let Err(e) = run(cli) {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> Result<(), CliError> {
    let config_path = cli.config.unwrap_or_else(config_file_path);

    match cli.command {
        Commands::Fetch { connection, save } => {
            let runner = CliRunner::new(&config_path, cli.verbose)?;
            commands::fetch::run(runner, commands::fetch::FetchArgs { connection, save })
        }
        Commands::List { connection } => {
            let runner = CliRunner::new(&config_path, cli.verbose)?;
            commands::list::run(runner, connection)
        }
        Commands::Init => commands::init::run(&config_path),
        Commands::Config { command } => commands::config::run(command, &config_path),
    }
}
