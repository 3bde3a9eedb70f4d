use async_trait::async_trait;
use fitola_core::Result;
use serde::{Deserialize, Serialize};

/// A single-prompt generation request.
#[derive(Debug, Clone)]
pub struct GenerateRequest {
    /// Model identifier, e.g. "gemini-2.5-flash".
    pub model: String,
    /// Full prompt text. Fitola builds prompts from templates, so there is
    /// no separate system/message split.
    pub prompt: String,
    /// Sampling temperature. None = provider default.
    pub temperature: Option<f32>,
    /// Cap on generated tokens. None = provider default.
    pub max_output_tokens: Option<u32>,
}

impl GenerateRequest {
    pub fn new(model: impl Into<String>, prompt: impl Into<String>) -> Self {
        Self {
            model: model.into(),
            prompt: prompt.into(),
            temperature: None,
            max_output_tokens: None,
        }
    }

    pub fn with_temperature(mut self, temperature: Option<f32>) -> Self {
        self.temperature = temperature;
        self
    }
}

/// Generated text plus token accounting.
#[derive(Debug, Clone)]
pub struct GenerateResponse {
    pub text: String,
    pub usage: Usage,
}

/// Token usage statistics.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Usage {
    pub input_tokens: u32,
    pub output_tokens: u32,
}

impl Usage {
    pub fn total_tokens(&self) -> u32 {
        self.input_tokens + self.output_tokens
    }
}

/// Trait implemented by each text-generation backend.
#[async_trait]
pub trait LlmProvider: Send + Sync {
    /// Human-readable name, e.g. "gemini", "mock".
    fn name(&self) -> &str;

    /// Generate text for a prompt. Any failure is returned as-is; callers
    /// decide whether to degrade or surface it.
    async fn generate(&self, request: &GenerateRequest) -> Result<GenerateResponse>;

    /// Check if this provider is usable.
    async fn health_check(&self) -> Result<()>;
}
