use fitola_core::Result;
use fitola_llm::{GenerateRequest, LlmProvider};
use std::sync::Arc;
use tracing::debug;

/// The configured LLM (if any) plus the model and sampling settings to use.
#[derive(Clone)]
pub struct Generator {
    llm: Option<Arc<dyn LlmProvider>>,
    model: String,
    temperature: Option<f32>,
}

impl Generator {
    pub fn new(llm: Option<Arc<dyn LlmProvider>>, model: impl Into<String>) -> Self {
        Self {
            llm,
            model: model.into(),
            temperature: None,
        }
    }

    pub fn with_temperature(mut self, temperature: Option<f32>) -> Self {
        self.temperature = temperature;
        self
    }

    pub fn is_configured(&self) -> bool {
        self.llm.is_some()
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    /// `None` when no LLM is configured, otherwise the provider's outcome.
    pub async fn generate(&self, prompt: &str) -> Option<Result<String>> {
        let llm = self.llm.as_ref()?;
        debug!(provider = llm.name(), model = %self.model, "generating");
        let request =
            GenerateRequest::new(self.model.clone(), prompt).with_temperature(self.temperature);
        Some(llm.generate(&request).await.map(|r| r.text))
    }
}
