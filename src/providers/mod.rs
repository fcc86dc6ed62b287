/*!
 * Language-model backends used for SQL generation.
 *
 * - Ollama: Local LLM server
 * - Mock: scripted provider for tests and offline runs
 */

use async_trait::async_trait;
use std::fmt::Debug;

use crate::errors::ProviderError;

/// A single prompt sent to a backend
#[derive(Debug, Clone, PartialEq)]
pub struct CompletionRequest {
    /// System message constraining the model's output
    pub system: Option<String>,
    /// Prompt text
    pub prompt: String,
    /// Sampling temperature
    pub temperature: f32,
}

impl CompletionRequest {
    /// Create a request with no system message
    pub fn new(prompt: impl Into<String>, temperature: f32) -> Self {
        Self {
            system: None,
            prompt: prompt.into(),
            temperature,
        }
    }

    /// Set the system message
    pub fn system(mut self, system: impl Into<String>) -> Self {
        self.system = Some(system.into());
        self
    }
}

/// Text produced by a backend
#[derive(Debug, Clone, PartialEq)]
pub struct CompletionResponse {
    /// Generated text
    pub text: String,
    /// Model that produced the text
    pub model: String,
    /// Number of generated tokens, when reported
    pub eval_count: Option<u64>,
}

/// Common trait for all LLM providers
///
/// The translator only talks to the backend through this trait, so tests can
/// substitute a scripted provider for a live server.
#[async_trait]
pub trait Provider: Send + Sync + Debug {
    /// Complete a prompt
    ///
    /// # Arguments
    /// * `request` - The prompt and sampling settings
    ///
    /// # Returns
    /// * `Result<CompletionResponse, ProviderError>` - The generated text or an error
    async fn complete(&self, request: CompletionRequest) -> Result<CompletionResponse, ProviderError>;

    /// Test the connection to the provider
    ///
    /// # Returns
    /// * `Result<(), ProviderError>` - Ok if the connection is successful, or an error
    async fn test_connection(&self) -> Result<(), ProviderError>;

    /// Model identifier used for completions
    fn model(&self) -> &str;
}

pub mod mock;
pub mod ollama;
