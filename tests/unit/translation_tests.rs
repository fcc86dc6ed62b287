/*!
 * Tests for SQL extraction, prompt building and the translator
 */

use anyhow::Result;
use shelfquery::database::{DatabaseConnection, validate_schema};
use shelfquery::errors::QueryError;
use shelfquery::providers::mock::{MockBehavior, MockProvider};
use shelfquery::translation::{PromptTemplate, SqlTranslator, build_sql_prompt, extract_sql};
use crate::common;

fn translator_with(provider: MockProvider) -> Result<(tempfile::TempDir, SqlTranslator)> {
    let dir = common::create_temp_dir()?;
    let db_path = common::create_library_db(dir.path())?;
    let config = common::config_for(&db_path);
    let db = DatabaseConnection::open(&config.database)?;
    let schema = validate_schema(&db, "main")?;
    Ok((dir, SqlTranslator::new(Box::new(provider), schema, config.model.temperature)))
}

#[test]
fn test_extractSql_withExplanationAfterFence_shouldKeepOnlyStatement() {
    let response = "Sure! Here is the SQL you asked for:\n\n```SQL\nSELECT books.title, inventory.status\nFROM books\nJOIN inventory ON books.book_id = inventory.book_id;\n```\n\nIt joins both tables.";
    assert_eq!(
        extract_sql(response),
        "SELECT books.title, inventory.status\nFROM books\nJOIN inventory ON books.book_id = inventory.book_id"
    );
}

#[test]
fn test_extractSql_withQueryEngineLayout_shouldTakeQuerySection() {
    let response = "Question: how many?\nSQLQuery: SELECT COUNT(*) FROM books;\nSQLResult: [(3,)]\nAnswer: 3";
    assert_eq!(extract_sql(response), "SELECT COUNT(*) FROM books");
}

#[test]
fn test_extractSql_withSeveralTrailingSemicolons_shouldStripAll() {
    assert_eq!(extract_sql("SELECT 1;;  \n"), "SELECT 1");
}

#[test]
fn test_buildSqlPrompt_shouldNameDialectAndSchema() {
    let prompt = build_sql_prompt("SQLite", "Table 'books' has columns: title (TEXT).", "list titles");
    assert!(prompt.contains("syntactically correct SQLite query"));
    assert!(prompt.contains("Table 'books' has columns: title (TEXT)."));
    assert!(prompt.contains("Question: list titles\nSQLQuery: "));
}

/// The validated schema reaches the prompt with real column types
#[test]
fn test_buildRequest_shouldDescribeBothTables() -> Result<()> {
    let (_dir, translator) = translator_with(MockProvider::empty())?;
    let request = translator.build_request("Which books are available?");

    assert!(request.prompt.contains("Table 'books' has columns: book_id (INTEGER), title (TEXT)"));
    assert!(request.prompt.contains("Table 'inventory' has columns: inventory_id (INTEGER)"));
    assert!(request.system.unwrap_or_default().contains("Table names MUST be: 'books' and 'inventory'"));
    assert_eq!(request.temperature, 0.1);
    Ok(())
}

#[tokio::test]
async fn test_translate_withCustomTemplate_shouldSendRenderedSystemMessage() -> Result<()> {
    let provider = MockProvider::responding("SELECT title FROM books");
    let (_dir, translator) = translator_with(provider.clone())?;
    let translator = translator.with_template(PromptTemplate::new("SQLite only. {user_query}"));

    let generated = translator.translate("titles please").await?;

    assert_eq!(generated.sql, "SELECT title FROM books");
    let sent = provider.last_request().expect("request recorded");
    assert_eq!(sent.system.as_deref(), Some("SQLite only. titles please"));
    Ok(())
}

#[tokio::test]
async fn test_translate_withProseOnly_shouldReturnEmptySql() -> Result<()> {
    let (_dir, translator) = translator_with(MockProvider::new(MockBehavior::Respond(
        "Answer: I cannot answer that.".to_string(),
    )))?;
    let result = translator.translate("what is the meaning of life?").await;
    assert!(matches!(result, Err(QueryError::EmptySql)));
    Ok(())
}
