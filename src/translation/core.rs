/*!
 * Natural-language to SQL translation.
 *
 * `SqlTranslator` can only be built from a `ValidatedSchema`, so no question
 * is ever translated against a database whose required tables were not
 * confirmed at startup.
 */

use log::{debug, warn};

use super::extraction::extract_sql;
use super::prompts::{PromptTemplate, build_sql_prompt};
use crate::database::ValidatedSchema;
use crate::errors::{ProviderError, QueryError};
use crate::providers::{CompletionRequest, Provider};

/// SQL dialect named in the prompt
pub const DIALECT: &str = "SQLite";

/// A statement produced by the model
#[derive(Debug, Clone, PartialEq)]
pub struct GeneratedSql {
    /// Statement extracted from the response
    pub sql: String,
    /// Unprocessed model output
    pub raw_response: String,
}

/// Translator from questions to SQL bound to one validated schema
#[derive(Debug)]
pub struct SqlTranslator {
    provider: Box<dyn Provider>,
    schema: ValidatedSchema,
    template: PromptTemplate,
    temperature: f32,
}

impl SqlTranslator {
    /// Create a translator using the default library instruction template
    pub fn new(provider: Box<dyn Provider>, schema: ValidatedSchema, temperature: f32) -> Self {
        Self {
            provider,
            schema,
            template: PromptTemplate::default(),
            temperature,
        }
    }

    /// Replace the instruction template
    pub fn with_template(mut self, template: PromptTemplate) -> Self {
        self.template = template;
        self
    }

    /// Build the model request for a question
    pub fn build_request(&self, question: &str) -> CompletionRequest {
        let prompt = build_sql_prompt(DIALECT, &self.schema.context(), question);
        CompletionRequest::new(prompt, self.temperature).system(self.template.render(question))
    }

    /// Translate a question into a single SQL statement
    pub async fn translate(&self, question: &str) -> Result<GeneratedSql, QueryError> {
        let request = self.build_request(question);
        let response = self.provider.complete(request).await?;
        debug!("Raw model response: {}", response.text);

        let sql = extract_sql(&response.text);
        if sql.is_empty() {
            warn!("Model returned no SQL for question: {}", question);
            return Err(QueryError::EmptySql);
        }

        Ok(GeneratedSql {
            sql,
            raw_response: response.text,
        })
    }

    /// Check that the model backend answers
    pub async fn check_backend(&self) -> Result<(), ProviderError> {
        self.provider.test_connection().await
    }

    /// The schema this translator was built for
    pub fn schema(&self) -> &ValidatedSchema {
        &self.schema
    }

    /// Name of the model behind the translator
    pub fn model(&self) -> &str {
        self.provider.model()
    }
}
