use async_trait::async_trait;
use fitola_config::FitolaConfig;
use fitola_core::{FitolaError, Result};
use fitola_llm::{GeminiProvider, GenerateRequest, GenerateResponse, LlmProvider};
use fitola_memory::{MemoryBackend, MemoryManager, MemuClient};
use fitola_workflow::{
    AdaptiveWorkflowEngine, Generator, SelfImprovingOrchestrator, SimpleClawAgent,
    SimpleClawOrchestrator,
};
use std::sync::Arc;
use std::time::Duration;
use tracing::info;

use crate::messages::MessageStore;
use crate::metrics::Metrics;
use crate::rube::RubeClient;

/// Shared server state, built once at startup and handed to every handler.
pub struct AppState {
    pub config: FitolaConfig,
    /// `None` when no Gemini key is configured; LLM routes then answer 500.
    pub llm: Option<Arc<dyn LlmProvider>>,
    pub memory: Arc<MemoryManager>,
    pub simpleclaw: Arc<SimpleClawOrchestrator>,
    pub orchestrator: SelfImprovingOrchestrator,
    pub messages: MessageStore,
    pub rube: RubeClient,
    pub metrics: Metrics,
}

impl AppState {
    /// Wire real providers from config: Gemini when a key is set, MemU when a
    /// key is set, local memory otherwise.
    pub fn from_config(config: FitolaConfig) -> Result<Self> {
        let llm: Option<Arc<dyn LlmProvider>> = match &config.llm.api_key {
            Some(key) if !key.is_empty() => Some(Arc::new(
                GeminiProvider::new(
                    key.clone(),
                    Duration::from_secs(config.llm.request_timeout_secs),
                )?
                .with_base_url(&config.llm.base_url),
            )),
            _ => None,
        };
        let memory: Option<Arc<dyn MemoryBackend>> = match &config.memory.api_key {
            Some(key) if !key.is_empty() => Some(Arc::new(MemuClient::new(
                key.clone(),
                &config.memory.base_url,
                &config.memory.agent_id,
                Duration::from_secs(config.memory.request_timeout_secs),
            )?)),
            _ => None,
        };
        Self::new(config, llm, memory)
    }

    /// Wire explicit providers. Tests pass a mock LLM here.
    pub fn new(
        config: FitolaConfig,
        llm: Option<Arc<dyn LlmProvider>>,
        memory_backend: Option<Arc<dyn MemoryBackend>>,
    ) -> Result<Self> {
        let metrics = Metrics::new();
        let llm = llm.map(|inner| {
            info!(provider = inner.name(), model = %config.llm.model, "llm provider configured");
            Arc::new(MeteredProvider {
                inner,
                metrics: metrics.clone(),
            }) as Arc<dyn LlmProvider>
        });

        let memory = Arc::new(
            MemoryManager::new(memory_backend).with_write_counter(metrics.memory_writes_counter()),
        );
        let generator = Generator::new(llm.clone(), config.llm.model.clone())
            .with_temperature(config.llm.temperature);
        let simpleclaw = Arc::new(SimpleClawOrchestrator::new(SimpleClawAgent::new(
            generator.clone(),
            config.workflow.context_history_cap,
        )));
        let orchestrator = SelfImprovingOrchestrator::new(
            memory.clone(),
            AdaptiveWorkflowEngine::new(memory.clone(), generator),
            simpleclaw.clone(),
        );
        let rube = RubeClient::new(&config.gateway)?;

        Ok(Self {
            config,
            llm,
            memory,
            simpleclaw,
            orchestrator,
            messages: MessageStore::new(),
            rube,
            metrics,
        })
    }

    /// Swap the gateway client.
    pub fn with_gateway(mut self, rube: RubeClient) -> Self {
        self.rube = rube;
        self
    }

    /// Single-prompt generation with the configured model.
    pub async fn generate(&self, prompt: impl Into<String>) -> Result<String> {
        let llm = self.llm.as_ref().ok_or(FitolaError::LlmNotConfigured)?;
        let request = GenerateRequest::new(self.config.llm.model.clone(), prompt)
            .with_temperature(self.config.llm.temperature);
        Ok(llm.generate(&request).await?.text)
    }
}

/// Counts calls, failures and tokens for every generation, including the
/// ones workflows make.
struct MeteredProvider {
    inner: Arc<dyn LlmProvider>,
    metrics: Metrics,
}

#[async_trait]
impl LlmProvider for MeteredProvider {
    fn name(&self) -> &str {
        self.inner.name()
    }

    async fn generate(&self, request: &GenerateRequest) -> Result<GenerateResponse> {
        self.metrics.inc_llm_calls();
        match self.inner.generate(request).await {
            Ok(resp) => {
                self.metrics
                    .add_llm_tokens(resp.usage.input_tokens, resp.usage.output_tokens);
                Ok(resp)
            }
            Err(e) => {
                self.metrics.inc_llm_errors();
                Err(e)
            }
        }
    }

    async fn health_check(&self) -> Result<()> {
        self.inner.health_check().await
    }
}
