/*!
 * Guarded execution of generated SQL.
 *
 * Every failure (prepare, step, lock, a panicking worker) is logged and returned
 * as `QueryError::Execution`; nothing escapes as a panic or a propagated error.
 */

use log::{debug, error};
use rusqlite::Connection;

use super::connection::DatabaseConnection;
use super::models::{QueryResult, SqlValue};
use crate::errors::QueryError;

/// Trim whitespace and trailing statement terminators
pub fn normalize_statement(sql: &str) -> &str {
    sql.trim().trim_end_matches(|c: char| c == ';' || c.is_whitespace())
}

/// Execute `sql` and collect every row, converting any failure into a typed error
pub async fn execute_guarded(db: &DatabaseConnection, sql: &str) -> Result<QueryResult, QueryError> {
    let statement = normalize_statement(sql).to_string();
    if statement.is_empty() {
        error!("SQL execution error: empty statement");
        return Err(QueryError::Execution("empty statement".to_string()));
    }

    debug!("Executing SQL: {}", statement);

    match db.execute_async(move |conn| run_statement(conn, &statement)).await {
        Ok(result) => {
            debug!("Query returned {} row(s)", result.rows.len());
            Ok(result)
        }
        Err(e) => {
            error!("SQL execution error: {:#}", e);
            Err(QueryError::Execution(format!("{:#}", e)))
        }
    }
}

fn run_statement(conn: &Connection, sql: &str) -> anyhow::Result<QueryResult> {
    let mut stmt = conn.prepare(sql)?;
    let columns: Vec<String> = stmt.column_names().into_iter().map(String::from).collect();
    let column_count = columns.len();

    let mut rows = stmt.query([])?;
    let mut collected = Vec::new();
    while let Some(row) = rows.next()? {
        let mut values = Vec::with_capacity(column_count);
        for index in 0..column_count {
            values.push(SqlValue::from(row.get_ref(index)?));
        }
        collected.push(values);
    }

    Ok(QueryResult::new(columns, collected))
}
