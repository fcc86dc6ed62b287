/*!
 * Query session module.
 *
 * This module provides:
 * - The session owning the connection and translator
 * - The tagged outcome of each question
 */

pub mod manager;
pub mod models;

// Re-export main types
pub use manager::QuerySession;
pub use models::QueryOutcome;
