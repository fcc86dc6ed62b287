/*!
 * Error types for the shelfquery application.
 *
 * Startup failures (configuration, connection, schema validation) are fatal and
 * surface through `DatabaseError` or `anyhow` at the application edge. Failures
 * while answering a single question are `QueryError` values, which the query
 * session turns into user-facing messages without ever ending the loop.
 */

use thiserror::Error;

/// Errors that can occur when working with the language-model backend
#[derive(Error, Debug)]
pub enum ProviderError {
    /// Error when making an API request fails
    #[error("API request failed: {0}")]
    RequestFailed(String),

    /// Error when parsing an API response fails
    #[error("Failed to parse API response: {0}")]
    ParseError(String),

    /// Error returned by the API itself
    #[error("API responded with error: {status_code} - {message}")]
    ApiError {
        /// HTTP status code
        status_code: u16,
        /// Error message from the API
        message: String,
    },

    /// Error establishing or maintaining a connection
    #[error("Connection error: {0}")]
    ConnectionError(String),
}

/// Errors raised while bootstrapping the database before the query loop starts
#[derive(Error, Debug)]
pub enum DatabaseError {
    /// The configured driver identifier is not one we can open
    #[error("Unsupported database driver: {0}")]
    UnsupportedDriver(String),

    /// The database could not be opened
    #[error("Failed to open database '{database}': {message}")]
    ConnectionFailed {
        /// Database name or path from the configuration
        database: String,
        /// Driver error message
        message: String,
    },

    /// The schema name is not a plain identifier
    #[error("Invalid schema name: '{0}'")]
    InvalidSchema(String),

    /// One or more required tables are absent from the schema
    #[error("Required tables missing: {}", .0.join(", "))]
    RequiredTablesMissing(Vec<String>),

    /// Catalog introspection failed
    #[error("Schema introspection failed: {0}")]
    Introspection(String),
}

impl From<rusqlite::Error> for DatabaseError {
    fn from(error: rusqlite::Error) -> Self {
        Self::Introspection(error.to_string())
    }
}

/// Errors for a single question; none of them terminate the session
#[derive(Error, Debug)]
pub enum QueryError {
    /// The backend could not produce a response
    #[error("Translation failed: {0}")]
    Translation(#[from] ProviderError),

    /// The backend answered but no SQL could be extracted
    #[error("SQL could not be generated")]
    EmptySql,

    /// The generated SQL failed when executed
    #[error("SQL execution error: {0}")]
    Execution(String),
}

/// Main application error type that wraps all other errors
#[derive(Error, Debug)]
pub enum AppError {
    /// Error reading, writing or validating the configuration
    #[error("Configuration error: {0}")]
    Config(String),

    /// Error from the database bootstrap
    #[error("Database error: {0}")]
    Database(#[from] DatabaseError),
}

impl From<std::io::Error> for AppError {
    fn from(error: std::io::Error) -> Self {
        Self::Config(error.to_string())
    }
}

impl From<serde_json::Error> for AppError {
    fn from(error: serde_json::Error) -> Self {
        Self::Config(error.to_string())
    }
}
