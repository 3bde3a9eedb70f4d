use async_trait::async_trait;
use fitola_core::{FitolaError, Result};
use std::time::Duration;
use tracing::{debug, info};

use crate::provider::*;

/// Google Gemini `generateContent` REST provider.
pub struct GeminiProvider {
    client: reqwest::Client,
    api_key: String,
    base_url: String,
}

impl GeminiProvider {
    pub fn new(api_key: String, timeout: Duration) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| FitolaError::LlmProvider(e.to_string()))?;
        Ok(Self {
            client,
            api_key,
            base_url: "https://generativelanguage.googleapis.com/v1beta".into(),
        })
    }

    /// Use a custom base URL (proxies, tests).
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into().trim_end_matches('/').to_string();
        self
    }

    fn build_body(request: &GenerateRequest) -> serde_json::Value {
        let mut body = serde_json::json!({
            "contents": [
                { "role": "user", "parts": [ { "text": &request.prompt } ] }
            ],
        });
        let mut generation = serde_json::Map::new();
        if let Some(t) = request.temperature {
            generation.insert("temperature".into(), serde_json::json!(t));
        }
        if let Some(n) = request.max_output_tokens {
            generation.insert("maxOutputTokens".into(), serde_json::json!(n));
        }
        if !generation.is_empty() {
            body["generationConfig"] = serde_json::Value::Object(generation);
        }
        body
    }
}

#[async_trait]
impl LlmProvider for GeminiProvider {
    fn name(&self) -> &str {
        "gemini"
    }

    async fn generate(&self, request: &GenerateRequest) -> Result<GenerateResponse> {
        let url = format!(
            "{}/models/{}:generateContent",
            self.base_url, request.model
        );
        debug!(model = %request.model, prompt_len = request.prompt.len(), "gemini generateContent");

        let resp = self
            .client
            .post(url)
            .header("x-goog-api-key", &self.api_key)
            .json(&Self::build_body(request))
            .send()
            .await
            .map_err(|e| FitolaError::LlmProvider(e.to_string()))?;

        if !resp.status().is_success() {
            let status = resp.status();
            let text = resp.text().await.unwrap_or_default();
            return Err(FitolaError::LlmProvider(format!("HTTP {status}: {text}")));
        }

        let data: serde_json::Value = resp
            .json()
            .await
            .map_err(|e| FitolaError::LlmProvider(e.to_string()))?;

        let text: String = data["candidates"][0]["content"]["parts"]
            .as_array()
            .map(|parts| {
                parts
                    .iter()
                    .filter_map(|p| p["text"].as_str())
                    .collect::<Vec<_>>()
                    .join("")
            })
            .unwrap_or_default();

        if text.is_empty() {
            return Err(FitolaError::LlmProvider("empty response".into()));
        }

        let usage_data = &data["usageMetadata"];
        let usage = Usage {
            input_tokens: usage_data["promptTokenCount"].as_u64().unwrap_or(0) as u32,
            output_tokens: usage_data["candidatesTokenCount"].as_u64().unwrap_or(0) as u32,
        };

        Ok(GenerateResponse { text, usage })
    }

    async fn health_check(&self) -> Result<()> {
        info!("checking Gemini API configuration");
        if self.api_key.is_empty() {
            return Err(FitolaError::LlmNotConfigured);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_body_omits_generation_config_by_default() {
        let body = GeminiProvider::build_body(&GenerateRequest::new("m", "hi"));
        assert_eq!(body["contents"][0]["parts"][0]["text"], "hi");
        assert!(body.get("generationConfig").is_none());
    }

    #[test]
    fn test_body_includes_temperature() {
        let req = GenerateRequest::new("m", "hi").with_temperature(Some(0.5));
        let body = GeminiProvider::build_body(&req);
        assert_eq!(body["generationConfig"]["temperature"], 0.5);
    }
}
