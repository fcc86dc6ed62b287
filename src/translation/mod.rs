/*!
 * Question to SQL translation using a language model.
 *
 * - `core`: the translator bound to a validated schema
 * - `extraction`: pulling the statement out of a model response
 * - `prompts`: instruction template and prompt builder
 */

// Re-export main types for easier usage
pub use self::core::{GeneratedSql, SqlTranslator};
pub use self::extraction::extract_sql;
pub use self::prompts::{PromptTemplate, build_sql_prompt};

// Submodules
pub mod core;
pub mod extraction;
pub mod prompts;
