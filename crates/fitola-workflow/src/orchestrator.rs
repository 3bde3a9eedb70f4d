//! Learning wrapper around the adaptive and SimpleClaw layers.

use fitola_core::{FitolaError, Result};
use fitola_memory::{MemoryCategory, MemoryManager, PatternType, Suggestion};
use fitola_prompt::{Fields, fields};
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};
use std::fmt;
use std::str::FromStr;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Instant;
use tracing::{info, warn};

use crate::adaptive::{AdaptiveResult, AdaptiveWorkflowEngine, AdaptiveWorkflowType, WorkoutPrediction};
use crate::simpleclaw::{SimpleClawOrchestrator, WorkflowSession, WorkflowType};

/// Any workflow the orchestrator can run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OrchestratedWorkflow {
    Adaptive(AdaptiveWorkflowType),
    Simple(WorkflowType),
}

impl OrchestratedWorkflow {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Adaptive(w) => w.as_str(),
            Self::Simple(w) => w.as_str(),
        }
    }

    /// Adaptive names first, then the SimpleClaw ones.
    pub fn names() -> Vec<String> {
        AdaptiveWorkflowType::ALL
            .iter()
            .map(|w| w.as_str().to_string())
            .chain(WorkflowType::names())
            .collect()
    }
}

impl fmt::Display for OrchestratedWorkflow {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for OrchestratedWorkflow {
    type Err = FitolaError;

    fn from_str(s: &str) -> Result<Self> {
        if let Ok(w) = s.parse::<AdaptiveWorkflowType>() {
            return Ok(Self::Adaptive(w));
        }
        if let Ok(w) = s.parse::<WorkflowType>() {
            return Ok(Self::Simple(w));
        }
        Err(FitolaError::UnknownWorkflow {
            given: s.to_string(),
            available: Self::names(),
        })
    }
}

/// Result of whichever layer ran the workflow.
#[derive(Debug, Clone, Serialize)]
#[serde(untagged)]
pub enum WorkflowOutcome {
    Adaptive(AdaptiveResult),
    Simple(WorkflowSession),
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct LearningMetadata {
    pub context_memories_used: usize,
    pub improvement_cycle: u64,
    pub execution_time_seconds: f64,
    pub memory_enabled: bool,
    pub patterns_learned: usize,
}

#[derive(Debug, Clone, Serialize)]
pub struct LearningExecution {
    #[serde(flatten)]
    pub result: WorkflowOutcome,
    pub self_improving: bool,
    pub learning_metadata: LearningMetadata,
}

#[derive(Debug, Clone, Serialize)]
pub struct ProactiveInsights {
    pub timestamp: String,
    pub proactive_suggestions: Vec<Suggestion>,
    pub motivation_needed: bool,
    pub motivation_message: Option<String>,
    pub workout_prediction: Option<WorkoutPrediction>,
    pub self_improved: bool,
    pub confidence_score: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct FeedbackAck {
    pub feedback_processed: bool,
    pub learning_updated: bool,
    pub message: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LearningStats {
    pub user_id: String,
    pub total_interactions: usize,
    pub patterns_learned: usize,
    pub improvement_cycles: u64,
    pub memory_enabled: bool,
    pub learning_categories: Vec<String>,
    pub ai_capabilities: Vec<String>,
    pub recent_learnings: Vec<String>,
}

const LEARNING_CATEGORIES: [&str; 5] = [
    "Workout Preferences",
    "Nutrition Compliance",
    "Motivation Triggers",
    "Performance Patterns",
    "Goal Progress",
];

const AI_CAPABILITIES: [&str; 5] = [
    "Learns from every interaction",
    "Adapts plans to your patterns",
    "Predicts optimal workout times",
    "Provides proactive motivation",
    "Improves recommendations over time",
];

/// Runs workflows and memorizes every execution so later runs can learn from it.
pub struct SelfImprovingOrchestrator {
    memory: Arc<MemoryManager>,
    adaptive: AdaptiveWorkflowEngine,
    simpleclaw: Arc<SimpleClawOrchestrator>,
    cycles: AtomicU64,
}

impl SelfImprovingOrchestrator {
    pub fn new(
        memory: Arc<MemoryManager>,
        adaptive: AdaptiveWorkflowEngine,
        simpleclaw: Arc<SimpleClawOrchestrator>,
    ) -> Self {
        Self {
            memory,
            adaptive,
            simpleclaw,
            cycles: AtomicU64::new(0),
        }
    }

    pub fn improvement_cycles(&self) -> u64 {
        self.cycles.load(Ordering::Relaxed)
    }

    pub async fn execute_with_learning(
        &self,
        user_id: &str,
        workflow: OrchestratedWorkflow,
        user_data: &Fields,
        parameters: &Fields,
    ) -> Result<LearningExecution> {
        let started = Instant::now();
        let memories = self
            .memory
            .retrieve(user_id, &format!("relevant context for {workflow}"), None, 10)
            .await;
        let patterns = self
            .memory
            .retrieve(user_id, "learned patterns and preferences", None, 5)
            .await;

        let outcome = match workflow {
            OrchestratedWorkflow::Adaptive(w) => Ok(WorkflowOutcome::Adaptive(
                self.adaptive
                    .execute(w, user_id, user_data, parameters)
                    .await,
            )),
            OrchestratedWorkflow::Simple(w) => self
                .simpleclaw
                .run(user_id, w, user_data, parameters)
                .await
                .map(WorkflowOutcome::Simple),
        };

        let elapsed = started.elapsed().as_secs_f64();
        self.memory
            .memorize(
                user_id,
                &format!("workflow_executed_{workflow}"),
                &json!({
                    "workflow_type": workflow.as_str(),
                    "success": outcome.is_ok(),
                    "execution_time": elapsed,
                    "timestamp": fitola_core::now_iso(),
                }),
                MemoryCategory::default(),
            )
            .await;

        let result = match outcome {
            Ok(result) => result,
            Err(e) => {
                warn!(user_id, workflow = %workflow, error = %e, "workflow execution failed");
                return Err(e);
            }
        };

        let cycle = self.cycles.fetch_add(1, Ordering::Relaxed) + 1;
        info!(user_id, workflow = %workflow, cycle, elapsed, "workflow executed with learning");

        Ok(LearningExecution {
            result,
            self_improving: true,
            learning_metadata: LearningMetadata {
                context_memories_used: memories.len(),
                improvement_cycle: cycle,
                execution_time_seconds: elapsed,
                memory_enabled: self.memory.is_enabled(),
                patterns_learned: patterns.len(),
            },
        })
    }

    /// Suggestions, a motivation check and a workout prediction for `context`.
    pub async fn proactive_insights(&self, user_id: &str, context: &Fields) -> ProactiveInsights {
        let hour = crate::hour_of_day(context);
        let suggestions = self.memory.proactive_suggestions(user_id, hour).await;
        let motivation = self.adaptive.proactive_motivation(user_id, context).await;
        let workout = self.adaptive.predictive_workout(user_id, context).await;

        let mut scores: Vec<f64> = suggestions.iter().map(|s| s.confidence).collect();
        if motivation.should_send {
            scores.push(motivation.confidence.unwrap_or(0.5));
        }
        scores.push(workout.confidence);

        ProactiveInsights {
            timestamp: fitola_core::now_iso(),
            proactive_suggestions: suggestions,
            motivation_needed: motivation.should_send,
            motivation_message: motivation.motivation.map(|m| m.message),
            workout_prediction: Some(workout.prediction),
            self_improved: true,
            confidence_score: mean_or(&scores, 0.5),
        }
    }

    /// Record feedback on an earlier workflow and learn from it.
    pub async fn provide_feedback(
        &self,
        user_id: &str,
        workflow_id: &str,
        feedback: &Value,
    ) -> FeedbackAck {
        self.memory
            .memorize(
                user_id,
                "feedback_received",
                &json!({
                    "workflow_id": workflow_id,
                    "feedback": feedback,
                    "timestamp": fitola_core::now_iso(),
                }),
                MemoryCategory::default(),
            )
            .await;

        let helpful = feedback.get("helpful").is_some_and(fields::truthy);
        let text = |key: &str| {
            feedback
                .get(key)
                .map(fields::render)
                .unwrap_or_default()
        };
        let (pattern, data) = if helpful {
            (
                PatternType::SuccessfulRecommendation,
                json!({"workflow_id": workflow_id, "what_worked": text("what_worked")}),
            )
        } else {
            (
                PatternType::UnsuccessfulRecommendation,
                json!({"workflow_id": workflow_id, "what_to_avoid": text("what_to_avoid")}),
            )
        };
        self.memory.learn_pattern(user_id, pattern, data).await;

        FeedbackAck {
            feedback_processed: true,
            learning_updated: true,
            message: "Thank you! I'll use this to improve future recommendations.".into(),
        }
    }

    pub async fn learning_stats(&self, user_id: &str) -> LearningStats {
        let memories = self
            .memory
            .retrieve(user_id, "all interactions and patterns", None, 50)
            .await;
        let patterns = self
            .memory
            .retrieve(user_id, "learned patterns and preferences", None, 20)
            .await;

        LearningStats {
            user_id: user_id.to_string(),
            total_interactions: memories.len(),
            patterns_learned: patterns.len(),
            improvement_cycles: self.improvement_cycles(),
            memory_enabled: self.memory.is_enabled(),
            learning_categories: LEARNING_CATEGORIES.iter().map(|s| s.to_string()).collect(),
            ai_capabilities: AI_CAPABILITIES.iter().map(|s| s.to_string()).collect(),
            recent_learnings: patterns
                .iter()
                .take(3)
                .map(|p| {
                    let text: String = p.content_text().chars().take(100).collect();
                    format!("{text}...")
                })
                .collect(),
        }
    }
}

fn mean_or(scores: &[f64], default: f64) -> f64 {
    if scores.is_empty() {
        default
    } else {
        scores.iter().sum::<f64>() / scores.len() as f64
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_orchestrated_workflow() {
        assert_eq!(
            "predictive_workout".parse::<OrchestratedWorkflow>().unwrap(),
            OrchestratedWorkflow::Adaptive(AdaptiveWorkflowType::PredictiveWorkout)
        );
        assert_eq!(
            "motivation".parse::<OrchestratedWorkflow>().unwrap(),
            OrchestratedWorkflow::Simple(WorkflowType::Motivation)
        );
        match "pilates".parse::<OrchestratedWorkflow>() {
            Err(FitolaError::UnknownWorkflow { available, .. }) => {
                assert_eq!(available.len(), 10);
                assert!(available.contains(&"smart_goal_tracking".to_string()));
                assert!(available.contains(&"chat_assistant".to_string()));
            }
            other => panic!("expected UnknownWorkflow, got {other:?}"),
        }
    }

    #[test]
    fn test_mean_or() {
        assert_eq!(mean_or(&[], 0.5), 0.5);
        assert!((mean_or(&[0.8, 0.75], 0.5) - 0.775).abs() < 1e-9);
    }
}
