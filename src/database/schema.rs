/*!
 * Table catalog introspection and required-table validation.
 *
 * Validation runs once at startup. Only table presence is checked; column
 * names reach the model through the instruction template and the schema
 * context, they are never compared against the generated SQL.
 */

use log::{info, warn};
use rusqlite::Connection;
use std::collections::BTreeSet;

use super::connection::DatabaseConnection;
use super::models::{ColumnInfo, TableInfo};
use crate::app_config::is_plain_identifier;
use crate::errors::DatabaseError;

/// Tables every library database must provide
pub const REQUIRED_TABLES: [&str; 2] = ["books", "inventory"];

/// Schema whose required tables were confirmed present.
///
/// Only `validate_schema` creates this value, so holding one proves the check ran.
#[derive(Debug, Clone)]
pub struct ValidatedSchema {
    schema: String,
    tables: Vec<TableInfo>,
}

impl ValidatedSchema {
    /// Schema name the tables live in
    pub fn schema(&self) -> &str {
        &self.schema
    }

    /// The required tables with their columns
    pub fn tables(&self) -> &[TableInfo] {
        &self.tables
    }

    /// Names of the validated tables
    pub fn table_names(&self) -> Vec<&str> {
        self.tables.iter().map(|t| t.name.as_str()).collect()
    }

    /// Schema description handed to the model, one line per table
    pub fn context(&self) -> String {
        self.tables
            .iter()
            .map(TableInfo::describe)
            .collect::<Vec<_>>()
            .join("\n")
    }
}

/// List user tables in the schema
pub fn list_tables(conn: &Connection, schema: &str) -> Result<Vec<String>, DatabaseError> {
    if !is_plain_identifier(schema) {
        return Err(DatabaseError::InvalidSchema(schema.to_string()));
    }

    let sql = format!(
        "SELECT name FROM \"{}\".sqlite_master \
         WHERE type = 'table' AND name NOT LIKE 'sqlite_%' ORDER BY name",
        schema
    );
    let mut stmt = conn.prepare(&sql)?;
    let names = stmt
        .query_map([], |row| row.get::<_, String>(0))?
        .collect::<Result<Vec<_>, _>>()?;

    Ok(names)
}

/// Read the columns of one table
pub fn describe_table(conn: &Connection, schema: &str, table: &str) -> Result<TableInfo, DatabaseError> {
    if !is_plain_identifier(schema) {
        return Err(DatabaseError::InvalidSchema(schema.to_string()));
    }

    let sql = format!(
        "PRAGMA \"{}\".table_info(\"{}\")",
        schema,
        table.replace('"', "\"\"")
    );
    let mut stmt = conn.prepare(&sql)?;
    let columns = stmt
        .query_map([], |row| {
            Ok(ColumnInfo {
                name: row.get("name")?,
                data_type: row.get("type")?,
            })
        })?
        .collect::<Result<Vec<_>, _>>()?;

    Ok(TableInfo {
        name: table.to_string(),
        columns,
    })
}

/// Required tables absent from `available`, sorted
pub fn missing_tables(required: &[&str], available: &[String]) -> Vec<String> {
    let available: BTreeSet<&str> = available.iter().map(String::as_str).collect();
    let required: BTreeSet<&str> = required.iter().copied().collect();

    required
        .difference(&available)
        .map(|name| name.to_string())
        .collect()
}

/// Confirm the required tables exist and capture their columns
pub fn validate_schema(db: &DatabaseConnection, schema: &str) -> Result<ValidatedSchema, DatabaseError> {
    let schema_name = schema.to_string();

    db.execute(move |conn| Ok(validate_with_connection(conn, &schema_name)))
        .map_err(|e| DatabaseError::Introspection(e.to_string()))?
}

fn validate_with_connection(conn: &Connection, schema: &str) -> Result<ValidatedSchema, DatabaseError> {
    let available = list_tables(conn, schema)?;
    info!("Available tables: {:?}", available);

    let missing = missing_tables(&REQUIRED_TABLES, &available);
    if !missing.is_empty() {
        warn!("Missing tables - {:?}", missing);
        return Err(DatabaseError::RequiredTablesMissing(missing));
    }

    let tables = REQUIRED_TABLES
        .iter()
        .map(|table| describe_table(conn, schema, table))
        .collect::<Result<Vec<_>, _>>()?;

    Ok(ValidatedSchema {
        schema: schema.to_string(),
        tables,
    })
}
