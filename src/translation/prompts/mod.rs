/*!
 * Prompt construction for SQL generation.
 *
 * This module provides:
 * - The fixed instruction template naming the library tables and columns
 * - The text-to-SQL prompt carrying the introspected schema context
 */

pub mod templates;

// Re-export main types
pub use templates::{PromptTemplate, build_sql_prompt};
