/*!
 * # shelfquery - natural-language questions over a library database
 *
 * A Rust library that turns plain-language questions about books and
 * inventory into SQL with a local language model, runs the SQL and renders
 * the rows as text.
 *
 * ## Features
 *
 * - Startup validation that the `books` and `inventory` tables exist
 * - SQL generation through an Ollama server
 * - Guarded execution: a bad statement is reported, never fatal
 * - Flat-list and grid rendering of results
 *
 * ## Architecture
 *
 * The library is organized in these main modules:
 * - `app_config`: Configuration management
 * - `database`: Connection bootstrap, schema validation and guarded execution
 * - `providers`: Language-model backends:
 *   - `providers::ollama`: Ollama API client
 *   - `providers::mock`: Scripted provider for tests
 * - `translation`: Question to SQL translation:
 *   - `translation::core`: The translator bound to a validated schema
 *   - `translation::extraction`: SQL extraction from model output
 *   - `translation::prompts`: Instruction template and prompt builder
 * - `session`: The query session and per-question outcomes
 * - `formatting`: Result rendering
 * - `app_controller`: Interactive question loop
 * - `logger`: Colored stderr logger
 * - `errors`: Custom error types for the application
 *
 * ## License
 *
 * This project is licensed under the MIT License
 */

// Global lints configuration
// These lints will be allowed but not auto-fixed
#![allow(clippy::uninlined_format_args)]
#![allow(clippy::redundant_closure_for_method_calls)]

// Public modules
pub mod app_config;
pub mod app_controller;
pub mod database;
pub mod errors;
pub mod formatting;
pub mod logger;
pub mod providers;
pub mod session;
pub mod translation;

// Re-export main types for easier usage
pub use app_config::Config;
pub use database::{DatabaseConnection, QueryResult, SqlValue, ValidatedSchema};
pub use errors::{AppError, DatabaseError, ProviderError, QueryError};
pub use session::{QueryOutcome, QuerySession};
pub use translation::SqlTranslator;
