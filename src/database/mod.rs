/*!
 * Database module for the library catalog.
 *
 * This module provides:
 * - Connection bootstrap from configuration
 * - Table catalog introspection and required-table validation
 * - Guarded execution of generated SQL
 */

pub mod connection;
pub mod executor;
pub mod models;
pub mod schema;

// Re-export main types
pub use connection::{ConnectionDescriptor, DatabaseConnection};
pub use executor::execute_guarded;
pub use models::{QueryResult, SqlValue, TableInfo};
pub use schema::{REQUIRED_TABLES, ValidatedSchema, validate_schema};
