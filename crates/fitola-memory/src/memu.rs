use async_trait::async_trait;
use fitola_core::{FitolaError, Result};
use serde::Deserialize;
use std::time::Duration;
use tracing::{debug, info};

use crate::record::*;

/// Client for the hosted MemU memory API.
pub struct MemuClient {
    client: reqwest::Client,
    api_key: String,
    base_url: String,
    agent_id: String,
}

#[derive(Debug, Deserialize)]
struct MemorizeResponse {
    #[serde(default)]
    task_id: Option<String>,
}

#[derive(Debug, Deserialize)]
struct RetrieveResponse {
    #[serde(default)]
    items: Vec<RetrievedItem>,
}

#[derive(Debug, Deserialize)]
struct RetrievedItem {
    #[serde(default)]
    content: serde_json::Value,
    #[serde(default)]
    memory_type: Option<String>,
    #[serde(default)]
    created_at: Option<String>,
    #[serde(default)]
    score: Option<f64>,
}

impl MemuClient {
    pub fn new(
        api_key: String,
        base_url: impl Into<String>,
        agent_id: impl Into<String>,
        timeout: Duration,
    ) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| FitolaError::Memory(e.to_string()))?;
        Ok(Self {
            client,
            api_key,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            agent_id: agent_id.into(),
        })
    }

    /// Text submitted to MemU for a single interaction.
    pub fn conversation_text(interaction_type: &str, content: &serde_json::Value) -> String {
        format!("User Action: {interaction_type}\nDetails: {content}")
    }

    async fn post<T: for<'de> Deserialize<'de>>(
        &self,
        endpoint: &str,
        body: serde_json::Value,
    ) -> Result<T> {
        let resp = self
            .client
            .post(format!("{}{}", self.base_url, endpoint))
            .bearer_auth(&self.api_key)
            .json(&body)
            .send()
            .await
            .map_err(|e| FitolaError::Memory(e.to_string()))?;

        if !resp.status().is_success() {
            let status = resp.status();
            let text = resp.text().await.unwrap_or_default();
            return Err(FitolaError::Memory(format!("HTTP {status}: {text}")));
        }

        resp.json::<T>()
            .await
            .map_err(|e| FitolaError::Memory(e.to_string()))
    }
}

#[async_trait]
impl MemoryBackend for MemuClient {
    fn name(&self) -> &str {
        "memu"
    }

    async fn memorize(
        &self,
        user_id: &str,
        interaction_type: &str,
        content: &serde_json::Value,
        category: MemoryCategory,
    ) -> Result<MemorizeAck> {
        let body = serde_json::json!({
            "conversation": Self::conversation_text(interaction_type, content),
            "user_id": user_id,
            "agent_id": &self.agent_id,
        });
        let resp: MemorizeResponse = self.post("/api/v3/memory/memorize", body).await?;
        info!(user_id, interaction_type, "memorized interaction");
        Ok(MemorizeAck {
            task_id: resp.task_id.unwrap_or_default(),
            status: "memorized".into(),
            category,
        })
    }

    async fn retrieve(
        &self,
        user_id: &str,
        query: &str,
        category: Option<MemoryCategory>,
        limit: usize,
    ) -> Result<Vec<MemoryRecord>> {
        let body = serde_json::json!({
            "query": query,
            "user_id": user_id,
            "agent_id": &self.agent_id,
            "limit": limit,
        });
        let resp: RetrieveResponse = self.post("/api/v3/memory/retrieve", body).await?;
        let records: Vec<MemoryRecord> = resp
            .items
            .into_iter()
            .take(limit)
            .map(|item| MemoryRecord {
                user_id: user_id.to_string(),
                interaction_type: item.memory_type.unwrap_or_default(),
                content: item.content,
                category: category.unwrap_or_default(),
                timestamp: item.created_at,
                relevance: Some(item.score.unwrap_or(1.0)),
            })
            .collect();
        debug!(user_id, count = records.len(), "retrieved memories");
        Ok(records)
    }
}
