use log::warn;
use serde::{Deserialize, Serialize};
use std::default::Default;
use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use crate::errors::AppError;

/// Application configuration module
/// This module handles the application configuration including loading,
/// validating and saving configuration settings.
/// Represents the application configuration
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Config {
    /// Database connection settings
    #[serde(default)]
    pub database: DatabaseConfig,

    /// Language-model backend settings
    #[serde(default)]
    pub model: ModelConfig,

    /// Log level
    #[serde(default)]
    pub log_level: LogLevel,
}

/// Database connection configuration
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct DatabaseConfig {
    // @field: Driver identifier ("sqlite")
    #[serde(default = "default_driver")]
    pub driver: String,

    // @field: Host name, recorded in the connection descriptor
    #[serde(default = "default_host")]
    pub host: String,

    // @field: Database name; the file path for SQLite
    #[serde(default = "default_database")]
    pub database: String,

    // @field: User name
    #[serde(default = "String::new")]
    pub username: String,

    // @field: Password
    #[serde(default = "String::new")]
    pub password: String,

    // @field: Schema holding the required tables
    #[serde(default = "default_schema")]
    pub schema: String,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            driver: default_driver(),
            host: default_host(),
            database: default_database(),
            username: String::new(),
            password: String::new(),
            schema: default_schema(),
        }
    }
}

/// Language-model backend configuration
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct ModelConfig {
    /// Model name served by Ollama
    #[serde(default = "default_model")]
    pub model: String,

    /// Service endpoint URL
    #[serde(default = "default_endpoint")]
    pub endpoint: String,

    /// Request timeout in seconds
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,

    /// Temperature parameter for generation (0.0 to 2.0)
    /// Lower values make the generated SQL more deterministic
    #[serde(default = "default_temperature")]
    pub temperature: f32,

    /// Retry count for failed requests
    #[serde(default)]
    pub retry_count: u32,

    /// Backoff multiplier for retries (in milliseconds)
    #[serde(default = "default_retry_backoff_ms")]
    pub retry_backoff_ms: u64,
}

impl Default for ModelConfig {
    fn default() -> Self {
        Self {
            model: default_model(),
            endpoint: default_endpoint(),
            timeout_secs: default_timeout_secs(),
            temperature: default_temperature(),
            retry_count: 0,
            retry_backoff_ms: default_retry_backoff_ms(),
        }
    }
}

/// Log verbosity level
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Error,
    Warn,
    #[default]
    Info,
    Debug,
    Trace,
}

impl LogLevel {
    /// Convert to the `log` crate's level filter
    pub fn to_level_filter(&self) -> log::LevelFilter {
        match self {
            Self::Error => log::LevelFilter::Error,
            Self::Warn => log::LevelFilter::Warn,
            Self::Info => log::LevelFilter::Info,
            Self::Debug => log::LevelFilter::Debug,
            Self::Trace => log::LevelFilter::Trace,
        }
    }
}

/// Upper bound on `retry_count`
pub const MAX_RETRY_COUNT: u32 = 10;

fn default_driver() -> String {
    "sqlite".to_string()
}

fn default_host() -> String {
    "localhost".to_string()
}

fn default_database() -> String {
    "library.db".to_string()
}

fn default_schema() -> String {
    "main".to_string()
}

fn default_model() -> String {
    "gemma3n".to_string()
}

fn default_endpoint() -> String {
    "http://localhost:11434".to_string()
}

fn default_timeout_secs() -> u64 {
    120
}

fn default_temperature() -> f32 {
    0.1
}

fn default_retry_backoff_ms() -> u64 {
    1000 // 1 second base backoff time, doubled on each retry
}

/// Plain SQL identifier: letters, digits and underscores, not starting with a digit
pub fn is_plain_identifier(name: &str) -> bool {
    let mut chars = name.chars();
    match chars.next() {
        Some(first) if first.is_ascii_alphabetic() || first == '_' => {
            chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
        }
        _ => false,
    }
}

impl Config {
    /// Load the configuration file, or write a default one when it does not exist
    pub fn load_or_create(config_path: &Path) -> Result<Self, AppError> {
        if config_path.exists() {
            let file = File::open(config_path).map_err(|e| {
                AppError::Config(format!("Failed to open config file {:?}: {}", config_path, e))
            })?;

            let reader = BufReader::new(file);
            let config: Config = serde_json::from_reader(reader).map_err(|e| {
                AppError::Config(format!("Failed to parse config file {:?}: {}", config_path, e))
            })?;

            return Ok(config);
        }

        warn!("Config file not found at {:?}, creating default config.", config_path);

        let config = Config::default();
        let config_json = serde_json::to_string_pretty(&config)?;
        std::fs::write(config_path, config_json)?;

        Ok(config)
    }

    /// Validate the configuration for consistency and required values
    pub fn validate(&self) -> Result<(), AppError> {
        let db = &self.database;
        if db.driver.trim().is_empty() {
            return Err(AppError::Config("Database driver must not be empty".to_string()));
        }
        if db.database.trim().is_empty() {
            return Err(AppError::Config("Database name must not be empty".to_string()));
        }
        if !is_plain_identifier(&db.schema) {
            return Err(AppError::Config(format!("Invalid schema name: '{}'", db.schema)));
        }

        let model = &self.model;
        if model.model.trim().is_empty() {
            return Err(AppError::Config("Model name must not be empty".to_string()));
        }
        if url::Url::parse(&model.endpoint).is_err() {
            return Err(AppError::Config(format!("Invalid model endpoint: '{}'", model.endpoint)));
        }
        if !(0.0..=2.0).contains(&model.temperature) {
            return Err(AppError::Config(format!(
                "Temperature must be between 0.0 and 2.0, got {}",
                model.temperature
            )));
        }
        if model.timeout_secs == 0 {
            return Err(AppError::Config("Request timeout must be greater than zero".to_string()));
        }
        if model.retry_count > MAX_RETRY_COUNT {
            return Err(AppError::Config(format!(
                "Retry count must be at most {}, got {}",
                MAX_RETRY_COUNT, model.retry_count
            )));
        }

        Ok(())
    }
}

/// Default implementation for Config
impl Default for Config {
    fn default() -> Self {
        Config {
            database: DatabaseConfig::default(),
            model: ModelConfig::default(),
            log_level: LogLevel::default(),
        }
    }
}
