use async_trait::async_trait;
use log::{debug, error};
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::app_config::ModelConfig;
use crate::errors::ProviderError;
use crate::providers::{CompletionRequest, CompletionResponse, Provider};

/// Ollama client for interacting with Ollama API
#[derive(Debug)]
pub struct Ollama {
    /// Base URL of the Ollama API
    base_url: String,
    /// Model used for completions
    model: String,
    /// HTTP client for making requests
    client: Client,
    /// Maximum number of retry attempts
    max_retries: u32,
    /// Base backoff time in milliseconds for exponential backoff
    backoff_base_ms: u64,
}

/// Generate request for the Ollama API
#[derive(Debug, Serialize, Deserialize)]
pub struct GenerationRequest {
    /// Model name to use for generation
    model: String,
    /// Prompt to generate from
    prompt: String,
    /// System message to guide the model
    #[serde(skip_serializing_if = "Option::is_none")]
    system: Option<String>,
    /// Additional model parameters
    #[serde(skip_serializing_if = "Option::is_none")]
    options: Option<GenerationOptions>,
    /// Whether to stream the response
    #[serde(skip_serializing_if = "Option::is_none")]
    stream: Option<bool>,
}

/// Generation options for the Ollama API
#[derive(Debug, Default, Serialize, Deserialize)]
pub struct GenerationOptions {
    /// Temperature for generation (default: 0.8)
    #[serde(skip_serializing_if = "Option::is_none")]
    temperature: Option<f32>,
}

/// Generation response from the Ollama API
#[derive(Debug, Serialize, Deserialize)]
pub struct GenerationResponse {
    /// Model name
    pub model: String,
    /// Creation timestamp
    pub created_at: String,
    /// Generated text
    pub response: String,
    /// Whether the generation is complete
    pub done: bool,
    /// Total duration of the request in nanoseconds
    #[serde(skip_serializing_if = "Option::is_none")]
    pub total_duration: Option<u64>,
    /// Number of prompt tokens
    #[serde(skip_serializing_if = "Option::is_none")]
    pub prompt_eval_count: Option<u64>,
    /// Number of generated tokens
    #[serde(skip_serializing_if = "Option::is_none")]
    pub eval_count: Option<u64>,
}

impl GenerationRequest {
    /// Create a new generation request
    pub fn new(model: impl Into<String>, prompt: impl Into<String>) -> Self {
        Self {
            model: model.into(),
            prompt: prompt.into(),
            system: None,
            options: None,
            stream: Some(false),
        }
    }

    /// Set the system prompt
    pub fn system(mut self, system: impl Into<String>) -> Self {
        self.system = Some(system.into());
        self
    }

    /// Set the temperature
    pub fn temperature(mut self, temperature: f32) -> Self {
        self.options.get_or_insert_with(GenerationOptions::default).temperature = Some(temperature);
        self
    }
}

/// Exponential backoff before retry `attempt` (1-based), saturating instead of overflowing
fn backoff_delay_ms(base_ms: u64, attempt: u32) -> u64 {
    let factor = 1u64.checked_shl(attempt.saturating_sub(1)).unwrap_or(u64::MAX);
    base_ms.saturating_mul(factor)
}

/// First 500 characters of a body, for log lines
fn preview(text: &str) -> String {
    if text.chars().count() > 500 {
        text.chars().take(500).collect()
    } else {
        text.to_string()
    }
}

/// Parse a `/api/generate` body.
///
/// A non-streaming call returns one JSON object. If the server streamed anyway,
/// the body is JSON lines and the `response` fragments are concatenated.
pub fn parse_generation_response(body: &str) -> Result<GenerationResponse, ProviderError> {
    match serde_json::from_str::<GenerationResponse>(body) {
        Ok(response) => return Ok(response),
        Err(e) => debug!("Ollama response is not a single object ({}), trying JSON lines", e),
    }

    let mut model = None;
    let mut created_at = None;
    let mut text = String::new();
    let mut done = false;
    let mut prompt_eval_count = None;
    let mut eval_count = None;
    let mut parsed_lines = 0usize;

    for line in body.lines().map(str::trim).filter(|l| !l.is_empty()) {
        let value: serde_json::Value = serde_json::from_str(line).map_err(|e| {
            error!(
                "Failed to parse Ollama API response: {}. Raw response (first 500 chars): {}",
                e,
                preview(body)
            );
            ProviderError::ParseError(format!("invalid JSON in Ollama response: {}", e))
        })?;
        parsed_lines += 1;

        if let Some(part) = value.get("response").and_then(|v| v.as_str()) {
            text.push_str(part);
        }
        if let Some(m) = value.get("model").and_then(|v| v.as_str()) {
            model.get_or_insert_with(|| m.to_string());
        }
        if let Some(c) = value.get("created_at").and_then(|v| v.as_str()) {
            created_at.get_or_insert_with(|| c.to_string());
        }
        if value.get("done").and_then(|v| v.as_bool()).unwrap_or(false) {
            done = true;
            prompt_eval_count = value.get("prompt_eval_count").and_then(|v| v.as_u64());
            eval_count = value.get("eval_count").and_then(|v| v.as_u64());
        }
    }

    if parsed_lines == 0 {
        return Err(ProviderError::ParseError("empty Ollama response body".to_string()));
    }

    Ok(GenerationResponse {
        model: model.unwrap_or_else(|| "unknown".to_string()),
        created_at: created_at.unwrap_or_default(),
        response: text,
        done,
        total_duration: None,
        prompt_eval_count,
        eval_count,
    })
}

impl Ollama {
    /// Create a client for the endpoint and model in the configuration
    ///
    /// Ollama uses HTTP/1.1, so we don't force HTTP/2.
    pub fn from_config(config: &ModelConfig) -> Self {
        Self {
            base_url: config.endpoint.trim_end_matches('/').to_string(),
            model: config.model.clone(),
            client: Client::builder()
                .timeout(Duration::from_secs(config.timeout_secs))
                .http1_only()
                .tcp_keepalive(Duration::from_secs(60))
                .build()
                .unwrap_or_default(),
            max_retries: config.retry_count,
            backoff_base_ms: config.retry_backoff_ms,
        }
    }

    /// Base URL requests are sent to
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Generate text from the Ollama API with retry logic
    ///
    /// Network failures and server errors are retried with exponential backoff,
    /// client errors are returned immediately.
    pub async fn generate(&self, request: &GenerationRequest) -> Result<GenerationResponse, ProviderError> {
        let url = format!("{}/api/generate", self.base_url);

        let mut attempt = 0;
        let mut last_error = None;

        while attempt <= self.max_retries {
            match self.client.post(&url).json(request).send().await {
                Ok(response) => {
                    let status = response.status();
                    if status.is_success() {
                        let body = response.text().await.map_err(|e| {
                            ProviderError::RequestFailed(format!(
                                "Failed to get response text from Ollama API: {}",
                                e
                            ))
                        })?;
                        return parse_generation_response(&body);
                    }

                    let error_text = response
                        .text()
                        .await
                        .unwrap_or_else(|_| "Failed to get error response text".to_string());
                    let api_error = ProviderError::ApiError {
                        status_code: status.as_u16(),
                        message: error_text,
                    };

                    if !status.is_server_error() {
                        // Client error - don't retry
                        error!("Ollama API error: {}", api_error);
                        return Err(api_error);
                    }

                    error!(
                        "Ollama API error: {} - attempt {}/{}",
                        api_error,
                        attempt + 1,
                        self.max_retries + 1
                    );
                    last_error = Some(api_error);
                }
                Err(e) => {
                    let network_error = if e.is_connect() || e.is_timeout() {
                        ProviderError::ConnectionError(format!("Failed to reach Ollama at {}: {}", self.base_url, e))
                    } else {
                        ProviderError::RequestFailed(format!("Failed to send request to Ollama API: {}", e))
                    };
                    error!(
                        "Ollama API network error: {} - attempt {}/{}",
                        network_error,
                        attempt + 1,
                        self.max_retries + 1
                    );
                    last_error = Some(network_error);
                }
            }

            attempt += 1;

            // If we have more retries left, wait with exponential backoff
            if attempt <= self.max_retries {
                let backoff_ms = backoff_delay_ms(self.backoff_base_ms, attempt);
                tokio::time::sleep(Duration::from_millis(backoff_ms)).await;
            }
        }

        Err(last_error.unwrap_or_else(|| {
            ProviderError::RequestFailed(format!(
                "Ollama API request failed after {} attempts",
                self.max_retries + 1
            ))
        }))
    }

    /// Get the Ollama API version
    pub async fn version(&self) -> Result<String, ProviderError> {
        let url = format!("{}/api/version", self.base_url);
        let response: serde_json::Value = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|e| ProviderError::ConnectionError(format!("Failed to connect to Ollama: {}", e)))?
            .json()
            .await
            .map_err(|e| ProviderError::ParseError(format!("Failed to parse Ollama version response: {}", e)))?;

        let version = response["version"]
            .as_str()
            .ok_or_else(|| ProviderError::ParseError("Invalid version format in response".to_string()))?
            .to_string();

        Ok(version)
    }
}

#[async_trait]
impl Provider for Ollama {
    async fn complete(&self, request: CompletionRequest) -> Result<CompletionResponse, ProviderError> {
        let mut generation = GenerationRequest::new(&self.model, request.prompt).temperature(request.temperature);
        if let Some(system) = request.system {
            generation = generation.system(system);
        }

        let response = self.generate(&generation).await?;

        Ok(CompletionResponse {
            text: response.response,
            model: response.model,
            eval_count: response.eval_count,
        })
    }

    async fn test_connection(&self) -> Result<(), ProviderError> {
        let version = self.version().await?;
        debug!("Connected to Ollama {} at {}", version, self.base_url);
        Ok(())
    }

    fn model(&self) -> &str {
        &self.model
    }
}
