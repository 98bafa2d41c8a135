//! casim CLI - evolve one-dimensional cellular automata from the terminal.
//!
//! Parameters come from defaults, a JSON config file, `CASIM_*` environment
//! variables and flags, in increasing order of precedence.

use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing::Level;
use tracing_subscriber::fmt::format::FmtSpan;

mod commands;
mod config;
mod render;

use commands::run::{RunArgs, SimulationArgs};
use commands::{config as config_cmd, run, table};
use config::Config;

/// casim - one-dimensional cellular automaton simulator.
///
/// Run `casim` or `casim run` to evolve the configured automaton and print the
/// space-time grid.
#[derive(Parser, Debug)]
#[command(
    name = "casim",
    author,
    version,
    about = "casim: rule-number driven one-dimensional cellular automata",
    long_about = None
)]
struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Suppress all output except errors
    #[arg(short, long, global = true)]
    quiet: bool,

    /// Config file to use instead of the default location
    #[arg(short, long, global = true, env = "CASIM_CONFIG")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Commands>,
}

/// Available CLI commands.
#[derive(Subcommand, Debug)]
enum Commands {
    /// Evolve the automaton and print the grid (default command).
    Run(RunArgs),

    /// Print the rule table: one `neighborhood -> output` line per entry.
    Table(SimulationArgs),

    /// Manage stored configuration.
    #[command(subcommand)]
    Config(ConfigCommands),
}

/// Configuration subcommands.
#[derive(Subcommand, Debug)]
enum ConfigCommands {
    /// Show current configuration.
    Show,

    /// List parameters with their current values.
    Params,

    /// Set a configuration value (r, k, width, height, rule, initial, palette).
    Set {
        /// Configuration key.
        key: String,
        /// Configuration value.
        #[arg(allow_hyphen_values = true)]
        value: String,
    },

    /// Get a configuration value.
    Get {
        /// Configuration key.
        key: String,
    },

    /// Reset configuration to defaults.
    Reset,

    /// Show path to config file.
    Path,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Setup tracing based on verbosity
    let level = if cli.quiet {
        Level::ERROR
    } else if cli.verbose {
        Level::DEBUG
    } else {
        Level::WARN // Default to less noise
    };

    // stdout carries the grid, so diagnostics go to stderr
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_span_events(FmtSpan::CLOSE)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    // Load configuration
    let config = Config::load(cli.config.as_deref())?;

    // Default to run if no command given
    let command = cli.command.unwrap_or(Commands::Run(RunArgs::default()));

    match command {
        Commands::Run(args) => run::execute(&config, &args)?,

        Commands::Table(args) => table::execute(&config, &args)?,

        Commands::Config(config_cmd_inner) => {
            match config_cmd_inner {
                ConfigCommands::Show => config_cmd::show(&config)?,
                ConfigCommands::Params => config_cmd::params(&config)?,
                ConfigCommands::Set { key, value } => {
                    // Environment overrides must not leak into the saved file
                    let mut stored = Config::load_file(cli.config.as_deref())?;
                    config_cmd::set(&mut stored, &key, &value)?;
                }
                ConfigCommands::Get { key } => config_cmd::get(&config, &key)?,
                ConfigCommands::Reset => config_cmd::reset(&config)?,
                ConfigCommands::Path => {
                    match config.source.clone().or_else(Config::config_file_path) {
                        Some(path) => println!("{}", path.display()),
                        None => println!("(no config file path available)"),
                    }
                }
            }
        }
    }

    Ok(())
}
