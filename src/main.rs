// Module-specific lints configuration
#![allow(clippy::uninlined_format_args)]

use anyhow::{Context, Result};
use clap::{CommandFactory, Parser, Subcommand, ValueEnum};
use clap_complete::{Shell, generate};
use log::{LevelFilter, error, info, warn};
use std::io::IsTerminal;
use std::path::Path;

use shelfquery::app_config::{self, Config};
use shelfquery::app_controller::Controller;
use shelfquery::logger::CustomLogger;
use shelfquery::providers::ollama::Ollama;
use shelfquery::session::QuerySession;

/// CLI Wrapper for LogLevel to implement ValueEnum
#[derive(Debug, Clone, ValueEnum)]
enum CliLogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl From<CliLogLevel> for app_config::LogLevel {
    fn from(cli_level: CliLogLevel) -> Self {
        match cli_level {
            CliLogLevel::Error => app_config::LogLevel::Error,
            CliLogLevel::Warn => app_config::LogLevel::Warn,
            CliLogLevel::Info => app_config::LogLevel::Info,
            CliLogLevel::Debug => app_config::LogLevel::Debug,
            CliLogLevel::Trace => app_config::LogLevel::Trace,
        }
    }
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Generate shell completions for shelfquery
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}

/// shelfquery - ask a library database questions in plain language
///
/// Questions are turned into SQL by a local Ollama model and run against
/// the library database; the rows and the generated SQL are printed.
#[derive(Parser, Debug)]
#[command(name = "shelfquery")]
#[command(version)]
#[command(about = "Natural-language questions over a library database")]
#[command(long_about = "shelfquery turns questions about books and inventory into SQL with a local language model and prints the results.

EXAMPLES:
    shelfquery                                  # Use conf.json in the current directory
    shelfquery -d ./library.db                  # Query a specific database file
    shelfquery -m llama3.2:3b                   # Use another Ollama model
    shelfquery --log-level debug                # Show generated prompts and raw responses
    shelfquery completions bash > shelfquery.bash

CONFIGURATION:
    Configuration is stored in conf.json by default. If the file doesn't exist,
    a default one will be created automatically.")]
struct CommandLineOptions {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Configuration file path
    #[arg(short, long, default_value = "conf.json")]
    config_path: String,

    /// Database file to query, overriding the configuration
    #[arg(short, long)]
    database: Option<String>,

    /// Model name to use for SQL generation
    #[arg(short, long)]
    model: Option<String>,

    /// Set logging level
    #[arg(short, long, value_enum)]
    log_level: Option<CliLogLevel>,
}

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize the logger once with info level by default
    // The level is updated after the config is loaded
    CustomLogger::init(LevelFilter::Info)?;

    let cli = CommandLineOptions::parse();

    if let Some(Commands::Completions { shell }) = &cli.command {
        let mut cmd = CommandLineOptions::command();
        generate(*shell, &mut cmd, "shelfquery", &mut std::io::stdout());
        return Ok(());
    }

    if let Err(e) = run(cli).await {
        error!("Critical startup error: {:#}", e);
        println!("System error: {:#}", e);
        std::process::exit(1);
    }

    Ok(())
}

fn load_config(options: &CommandLineOptions) -> Result<Config> {
    let mut config = Config::load_or_create(Path::new(&options.config_path))
        .context("Failed to load configuration")?;

    if let Some(database) = &options.database {
        config.database.database = database.clone();
    }
    if let Some(model) = &options.model {
        config.model.model = model.clone();
    }
    if let Some(log_level) = &options.log_level {
        config.log_level = log_level.clone().into();
    }

    config.validate().context("Configuration validation failed")?;
    Ok(config)
}

async fn run(options: CommandLineOptions) -> Result<()> {
    if let Some(log_level) = &options.log_level {
        let level: app_config::LogLevel = log_level.clone().into();
        log::set_max_level(level.to_level_filter());
    }

    let config = load_config(&options)?;
    log::set_max_level(config.log_level.to_level_filter());

    let provider = Ollama::from_config(&config.model);
    info!("Using model '{}' at {}", config.model.model, provider.base_url());

    let session = QuerySession::open(&config, Box::new(provider)).context("Startup failed")?;
    session.check_backend().await;

    let mut controller = Controller::new(&session).with_spinner(std::io::stdout().is_terminal());
    let stdin = tokio::io::BufReader::new(tokio::io::stdin());
    let result = controller.run(stdin, &mut std::io::stdout()).await;

    if let Err(e) = session.close() {
        warn!("Failed to close database connection: {:#}", e);
    }

    result
}
