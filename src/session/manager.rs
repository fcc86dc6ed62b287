/*!
 * The query session: one open connection and one translator for the process.
 *
 * The session is built once at startup. Opening it runs the connection
 * bootstrap and the schema validation; a session value therefore always sits
 * on a database that has the required tables. The connection is released when
 * the session is dropped or closed.
 */

use anyhow::Result;
use log::{debug, error, info, warn};
use std::time::Instant;

use super::models::QueryOutcome;
use crate::app_config::Config;
use crate::database::{DatabaseConnection, execute_guarded, validate_schema};
use crate::errors::{AppError, QueryError};
use crate::providers::Provider;
use crate::translation::SqlTranslator;

/// Session owning the database connection and the translator
#[derive(Debug)]
pub struct QuerySession {
    db: DatabaseConnection,
    translator: SqlTranslator,
}

impl QuerySession {
    /// Open the database, validate its schema and bind a translator to it
    pub fn open(config: &Config, provider: Box<dyn Provider>) -> Result<Self, AppError> {
        let db = DatabaseConnection::open(&config.database)?;
        info!("Connected to {}", db.descriptor());

        let schema = validate_schema(&db, &config.database.schema)?;
        let translator = SqlTranslator::new(provider, schema, config.model.temperature);

        Ok(Self { db, translator })
    }

    /// Assemble a session from an open connection and a translator
    pub fn new(db: DatabaseConnection, translator: SqlTranslator) -> Self {
        Self { db, translator }
    }

    /// Run one question through translation and execution
    ///
    /// Never fails: every per-question error is folded into the outcome.
    pub async fn ask(&self, question: &str) -> QueryOutcome {
        let start = Instant::now();

        let generated = match self.translator.translate(question).await {
            Ok(generated) => generated,
            Err(QueryError::EmptySql) => {
                return QueryOutcome::NoSql {
                    elapsed: start.elapsed(),
                };
            }
            Err(e) => {
                error!("Query processing error: {}", e);
                return QueryOutcome::TranslationFailed {
                    error: e.to_string(),
                    elapsed: start.elapsed(),
                };
            }
        };

        info!("Generated SQL: {}", generated.sql);

        match execute_guarded(&self.db, &generated.sql).await {
            Ok(result) => {
                let elapsed = start.elapsed();
                debug!("Answered in {:?} with {} row(s)", elapsed, result.rows.len());
                QueryOutcome::Answered {
                    sql: generated.sql,
                    result,
                    elapsed,
                }
            }
            Err(e) => QueryOutcome::ExecutionFailed {
                sql: generated.sql,
                error: e.to_string(),
                elapsed: start.elapsed(),
            },
        }
    }

    /// Check that the model backend answers; a failure is only a warning
    pub async fn check_backend(&self) -> bool {
        match self.translator.check_backend().await {
            Ok(()) => true,
            Err(e) => {
                warn!("Model backend '{}' is not reachable: {}", self.translator.model(), e);
                false
            }
        }
    }

    /// The translator in use
    pub fn translator(&self) -> &SqlTranslator {
        &self.translator
    }

    /// The database connection in use
    pub fn database(&self) -> &DatabaseConnection {
        &self.db
    }

    /// Close the connection explicitly
    pub fn close(self) -> Result<()> {
        self.db.close()
    }
}
