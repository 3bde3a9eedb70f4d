use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use tracing::{info, warn};

use crate::DEFAULT_RETRIEVE_LIMIT;
use crate::local::LocalMemory;
use crate::record::*;

/// A proactive suggestion derived from time of day or learned patterns.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Suggestion {
    #[serde(rename = "type")]
    pub kind: SuggestionKind,
    pub title: String,
    pub reason: String,
    pub confidence: f64,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum SuggestionKind {
    Workout,
    Insight,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum ProgressTrend {
    Improving,
    New,
}

impl ProgressTrend {
    fn recommendation(&self) -> &'static str {
        match self {
            Self::Improving => "Great progress! Consider increasing intensity by 10% next week.",
            Self::New => "Stay consistent! Building habits takes time.",
        }
    }
}

/// Result of recording goal progress.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GoalProgress {
    pub goal: String,
    pub current_progress: serde_json::Value,
    pub trend: ProgressTrend,
    pub adaptive_recommendation: String,
    pub history_count: usize,
}

/// Front door to user memory.
///
/// Writes and reads go to the remote backend when one is configured; any
/// remote failure is logged and served from the local store instead.
pub struct MemoryManager {
    remote: Option<Arc<dyn MemoryBackend>>,
    local: LocalMemory,
    /// One tick per `memorize`, whichever store took the write.
    writes: Arc<AtomicU64>,
}

impl MemoryManager {
    pub fn new(remote: Option<Arc<dyn MemoryBackend>>) -> Self {
        match &remote {
            Some(r) => info!(backend = r.name(), "memory manager using remote backend"),
            None => info!("memory manager running in local mock mode (no API key provided)"),
        }
        Self {
            remote,
            local: LocalMemory::new(),
            writes: Arc::new(AtomicU64::new(0)),
        }
    }

    /// Count writes into a caller-owned counter, e.g. a metrics registry.
    pub fn with_write_counter(mut self, counter: Arc<AtomicU64>) -> Self {
        self.writes = counter;
        self
    }

    /// Writes accepted since construction, including helper writes made by
    /// `learn_pattern` and `update_goal_progress`.
    pub fn write_count(&self) -> u64 {
        self.writes.load(Ordering::Relaxed)
    }

    pub fn local_only() -> Self {
        Self::new(None)
    }

    /// Whether a remote backend is configured.
    pub fn is_enabled(&self) -> bool {
        self.remote.is_some()
    }

    pub async fn memorize(
        &self,
        user_id: &str,
        interaction_type: &str,
        content: &serde_json::Value,
        category: MemoryCategory,
    ) -> MemorizeAck {
        self.writes.fetch_add(1, Ordering::Relaxed);
        if let Some(remote) = &self.remote {
            match remote
                .memorize(user_id, interaction_type, content, category)
                .await
            {
                Ok(ack) => return ack,
                Err(e) => warn!(error = %e, user_id, "failed to memorize interaction, using local store"),
            }
        }
        self.local
            .insert(user_id, interaction_type, content, category)
    }

    pub async fn retrieve(
        &self,
        user_id: &str,
        query: &str,
        category: Option<MemoryCategory>,
        limit: usize,
    ) -> Vec<MemoryRecord> {
        if let Some(remote) = &self.remote {
            match remote.retrieve(user_id, query, category, limit).await {
                Ok(records) => return records,
                Err(e) => warn!(error = %e, user_id, "failed to retrieve memories, using local store"),
            }
        }
        self.local.recent(user_id, category, limit)
    }

    /// Store a discovered behavioural pattern under `patterns`.
    pub async fn learn_pattern(
        &self,
        user_id: &str,
        pattern_type: PatternType,
        data: serde_json::Value,
    ) -> MemorizeAck {
        let mut content = serde_json::Map::new();
        content.insert("pattern_type".into(), pattern_type.as_str().into());
        content.insert("discovered_at".into(), fitola_core::now_iso().into());
        merge_into(&mut content, data, "data");
        self.memorize(
            user_id,
            "pattern_learned",
            &serde_json::Value::Object(content),
            MemoryCategory::Patterns,
        )
        .await
    }

    /// Up to three suggestions for the given local hour (0 to 23).
    pub async fn proactive_suggestions(&self, user_id: &str, hour: u32) -> Vec<Suggestion> {
        let patterns = self
            .retrieve(
                user_id,
                "behavioral patterns and preferences",
                Some(MemoryCategory::Patterns),
                DEFAULT_RETRIEVE_LIMIT,
            )
            .await;

        let mut suggestions = Vec::new();
        match hour {
            6..=9 => suggestions.push(Suggestion {
                kind: SuggestionKind::Workout,
                title: "Morning Workout".into(),
                reason: "Based on your usual morning routine".into(),
                confidence: 0.8,
            }),
            17..=20 => suggestions.push(Suggestion {
                kind: SuggestionKind::Workout,
                title: "Evening Exercise".into(),
                reason: "Your typical workout window".into(),
                confidence: 0.7,
            }),
            _ => {}
        }

        for pattern in &patterns {
            let text = pattern.content_text();
            if text.to_lowercase().contains("workout") {
                suggestions.push(Suggestion {
                    kind: SuggestionKind::Insight,
                    title: "Detected Pattern".into(),
                    reason: text,
                    confidence: pattern.relevance.unwrap_or(0.6),
                });
            }
        }

        suggestions.truncate(3);
        suggestions
    }

    pub async fn update_goal_progress(
        &self,
        user_id: &str,
        goal: &str,
        progress: &serde_json::Value,
    ) -> GoalProgress {
        let mut content = serde_json::Map::new();
        content.insert("goal".into(), goal.into());
        merge_into(&mut content, progress.clone(), "progress");
        self.memorize(
            user_id,
            "goal_progress_update",
            &serde_json::Value::Object(content),
            MemoryCategory::ProgressMetrics,
        )
        .await;

        let history = self
            .retrieve(
                user_id,
                &format!("progress on {goal}"),
                Some(MemoryCategory::ProgressMetrics),
                DEFAULT_RETRIEVE_LIMIT,
            )
            .await;

        let trend = if history.len() >= 2 {
            ProgressTrend::Improving
        } else {
            ProgressTrend::New
        };

        GoalProgress {
            goal: goal.to_string(),
            current_progress: progress.clone(),
            trend,
            adaptive_recommendation: trend.recommendation().into(),
            history_count: history.len(),
        }
    }
}

/// Flatten `value` into `map` when it is an object, otherwise nest it under `key`.
fn merge_into(
    map: &mut serde_json::Map<String, serde_json::Value>,
    value: serde_json::Value,
    key: &str,
) {
    match value {
        serde_json::Value::Object(obj) => map.extend(obj),
        serde_json::Value::Null => {}
        other => {
            map.insert(key.into(), other);
        }
    }
}
