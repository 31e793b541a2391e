//! carebook: terminal record desk for a care home
//!
//! Residents, meals and staff accounts managed from an immediate-mode
//! terminal UI over a local JSON record store.

use anyhow::{Context, Result};
use carebook::{
    cli,
    config::{AppConfig, CliOverrides},
};
use clap::{CommandFactory, Parser, Subcommand};
use clap_complete::{Shell, generate};
use std::fs::OpenOptions;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "carebook")]
#[command(version)]
#[command(about = "Terminal record desk for residents, meals and staff accounts", long_about = None)]
#[command(after_help = "EXAMPLES:
    # First run: create the administrator account
    CAREBOOK_PASSWORD=... carebook add-user matron --admin

    # Start the UI against a specific store, logging to a file
    carebook --store ./records.json --log-file carebook.log

    # Print an example configuration
    carebook init-config > .carebook.yaml")]
struct Cli {
    /// Path to configuration file
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Record store file (overrides the configuration)
    #[arg(long, global = true)]
    store: Option<PathBuf>,

    /// Write logs to this file (the terminal belongs to the UI)
    #[arg(long, global = true)]
    log_file: Option<PathBuf>,

    /// Enable debug logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the terminal UI (the default)
    Run,

    /// Create a user account from the command line
    AddUser {
        /// Login name (3-24 lower-case letters, digits, '.' or '_')
        username: String,

        /// Grant user management rights
        #[arg(long)]
        admin: bool,

        /// Initial password
        #[arg(long, env = "CAREBOOK_PASSWORD", hide_env_values = true)]
        password: String,
    },

    /// Generate JSON Schema for the config file format
    ConfigSchema {
        /// Output file path (stdout if not specified)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Print an example configuration file
    InitConfig,

    /// Generate shell completions
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let overrides = CliOverrides {
        store: cli.store.clone(),
        log_file: cli.log_file.clone(),
        verbose: cli.verbose,
    };
    let (config, loaded_from) = AppConfig::from_file_with_overrides(cli.config.as_deref(), &overrides);

    init_logging(&config)?;
    if let Some(path) = &loaded_from {
        tracing::debug!(path = %path.display(), "loaded configuration");
    }

    config.ensure_valid()?;

    match cli.command.unwrap_or(Commands::Run) {
        Commands::Run => cli::run_app(&config),

        Commands::AddUser {
            username,
            admin,
            password,
        } => cli::add_user(&config, &username, &password, admin),

        Commands::ConfigSchema { output } => {
            let schema = carebook::config::generate_json_schema();
            match output {
                Some(path) => {
                    std::fs::write(&path, &schema)
                        .with_context(|| format!("failed to write {}", path.display()))?;
                    eprintln!("Schema written to {}", path.display());
                }
                None => {
                    println!("{schema}");
                }
            }
            Ok(())
        }

        Commands::InitConfig => {
            print!("{}", carebook::config::generate_example_config());
            Ok(())
        }

        Commands::Completions { shell } => {
            generate(shell, &mut Cli::command(), "carebook", &mut io::stdout());
            Ok(())
        }
    }
}

/// Initialize logging. Without a log file only the filter is installed, so
/// nothing is written over the UI.
fn init_logging(config: &AppConfig) -> Result<()> {
    let filter = tracing_subscriber::EnvFilter::new(
        std::env::var("RUST_LOG").unwrap_or_else(|_| config.logging.level.clone()),
    );
    let file_layer = match &config.logging.file {
        Some(path) => Some(
            tracing_subscriber::fmt::layer()
                .with_target(false)
                .with_ansi(false)
                .with_writer(Mutex::new(open_log(path)?)),
        ),
        None => None,
    };
    tracing_subscriber::registry()
        .with(filter)
        .with(file_layer)
        .init();
    Ok(())
}

fn open_log(path: &Path) -> Result<std::fs::File> {
    OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .with_context(|| format!("failed to open log file {}", path.display()))
}
