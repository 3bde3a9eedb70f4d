//! Scripted in-memory provider for tests. No network.

use async_trait::async_trait;
use parking_lot::Mutex;
use std::collections::VecDeque;

use crate::provider::*;
use fitola_core::{FitolaError, Result};

/// Text returned once the script runs dry.
pub const EXHAUSTED_TEXT: &str = "(mock: no more queued responses)";

enum Scripted {
    Text(String),
    Fail(String),
}

/// Replays queued outcomes in order and records every request it sees.
///
/// ```
/// use fitola_llm::mock::MockProvider;
/// let provider = MockProvider::new("mock")
///     .with_plan_json(&serde_json::json!({"workout_plan": []}))
///     .with_error("quota exceeded");
/// ```
pub struct MockProvider {
    name: String,
    script: Mutex<VecDeque<Scripted>>,
    seen: Mutex<Vec<GenerateRequest>>,
    usage: Usage,
}

impl MockProvider {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            script: Mutex::new(VecDeque::new()),
            seen: Mutex::new(Vec::new()),
            usage: Usage {
                input_tokens: 100,
                output_tokens: 50,
            },
        }
    }

    pub fn with_response(self, text: &str) -> Self {
        self.script.lock().push_back(Scripted::Text(text.to_string()));
        self
    }

    /// Queue a plan the way Gemini usually returns one: a fenced JSON block.
    pub fn with_plan_json(self, plan: &serde_json::Value) -> Self {
        let text = format!("```json\n{plan}\n```");
        self.with_response(&text)
    }

    /// The next call fails with a provider error carrying `error`.
    pub fn with_error(self, error: &str) -> Self {
        self.script.lock().push_back(Scripted::Fail(error.to_string()));
        self
    }

    /// Token usage reported on every successful call.
    pub fn with_usage(mut self, input_tokens: u32, output_tokens: u32) -> Self {
        self.usage = Usage {
            input_tokens,
            output_tokens,
        };
        self
    }

    pub fn recorded_requests(&self) -> Vec<GenerateRequest> {
        self.seen.lock().clone()
    }

    pub fn remaining(&self) -> usize {
        self.script.lock().len()
    }
}

#[async_trait]
impl LlmProvider for MockProvider {
    fn name(&self) -> &str {
        &self.name
    }

    async fn generate(&self, request: &GenerateRequest) -> Result<GenerateResponse> {
        self.seen.lock().push(request.clone());
        let next = self.script.lock().pop_front();
        match next {
            Some(Scripted::Fail(error)) => Err(FitolaError::LlmProvider(error)),
            Some(Scripted::Text(text)) => Ok(GenerateResponse {
                text,
                usage: self.usage.clone(),
            }),
            None => Ok(GenerateResponse {
                text: EXHAUSTED_TEXT.to_string(),
                usage: self.usage.clone(),
            }),
        }
    }

    async fn health_check(&self) -> Result<()> {
        Ok(())
    }
}
