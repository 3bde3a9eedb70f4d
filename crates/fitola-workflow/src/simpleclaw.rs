//! The SimpleClaw layer: five prompt-templated workflows over a short
//! per-user rolling context, plus a session registry.

use fitola_core::{FitolaError, Result, SessionId};
use fitola_memory::{ContextEntry, ContextStore};
use fitola_prompt::{Fields, FitnessPromptEngine};
use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;
use tracing::info;

use crate::generator::Generator;

const OFFLINE_TEXT: &str = "AI client not initialized";
const OFFLINE_MOTIVATION: &str = "Stay strong! Keep pushing towards your goals!";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WorkflowType {
    FitnessPlan,
    NutritionPlan,
    ChatAssistant,
    GoalTracking,
    Motivation,
}

impl WorkflowType {
    pub const ALL: [WorkflowType; 5] = [
        Self::FitnessPlan,
        Self::NutritionPlan,
        Self::ChatAssistant,
        Self::GoalTracking,
        Self::Motivation,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::FitnessPlan => "fitness_plan",
            Self::NutritionPlan => "nutrition_plan",
            Self::ChatAssistant => "chat_assistant",
            Self::GoalTracking => "goal_tracking",
            Self::Motivation => "motivation",
        }
    }

    pub fn names() -> Vec<String> {
        Self::ALL.iter().map(|w| w.as_str().to_string()).collect()
    }
}

impl fmt::Display for WorkflowType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for WorkflowType {
    type Err = FitolaError;

    fn from_str(s: &str) -> Result<Self> {
        Self::ALL
            .into_iter()
            .find(|w| w.as_str() == s)
            .ok_or_else(|| FitolaError::UnknownWorkflow {
                given: s.to_string(),
                available: Self::names(),
            })
    }
}

/// Generated text keyed by what the workflow produces.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WorkflowOutput {
    Plan(String),
    Response(String),
    Feedback(String),
    Message(String),
}

impl WorkflowOutput {
    pub fn text(&self) -> &str {
        match self {
            Self::Plan(t) | Self::Response(t) | Self::Feedback(t) | Self::Message(t) => t,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WorkflowResult {
    pub workflow: WorkflowType,
    pub status: String,
    #[serde(flatten)]
    pub output: WorkflowOutput,
    pub prompt_used: String,
    pub timestamp: String,
}

/// Runs a single workflow against the prompt engine and the LLM.
pub struct SimpleClawAgent {
    generator: Generator,
    prompts: FitnessPromptEngine,
    context: ContextStore,
}

impl SimpleClawAgent {
    pub fn new(generator: Generator, history_cap: usize) -> Self {
        Self {
            generator,
            prompts: FitnessPromptEngine::new(),
            context: ContextStore::new(history_cap),
        }
    }

    /// Remember the call, build the prompt over the user's history and generate.
    ///
    /// Provider failures propagate; a missing provider yields placeholder text.
    pub async fn execute(
        &self,
        workflow: WorkflowType,
        user_context: &Fields,
        parameters: &Fields,
    ) -> Result<WorkflowResult> {
        let user_id = user_context
            .get("user_id")
            .and_then(|v| v.as_str())
            .unwrap_or("unknown");
        let history = self.context.push(
            user_id,
            ContextEntry::new(
                workflow.as_str(),
                serde_json::Value::Object(user_context.clone()),
                serde_json::Value::Object(parameters.clone()),
            ),
        );

        let prompt = match workflow {
            WorkflowType::FitnessPlan => {
                self.prompts.fitness_plan(user_context, parameters, &history)
            }
            WorkflowType::NutritionPlan => {
                self.prompts
                    .nutrition_plan(user_context, parameters, &history)
            }
            WorkflowType::ChatAssistant => {
                let message = parameters
                    .get("message")
                    .and_then(|v| v.as_str())
                    .unwrap_or_default();
                self.prompts.chat(user_context, message, &history)
            }
            WorkflowType::GoalTracking => {
                self.prompts
                    .goal_tracking(user_context, parameters, &history)
            }
            WorkflowType::Motivation => self.prompts.motivation(user_context, parameters, &history),
        };

        let text = match self.generator.generate(&prompt).await {
            Some(outcome) => outcome?,
            None if workflow == WorkflowType::Motivation => OFFLINE_MOTIVATION.to_string(),
            None => OFFLINE_TEXT.to_string(),
        };

        let output = match workflow {
            WorkflowType::FitnessPlan | WorkflowType::NutritionPlan => WorkflowOutput::Plan(text),
            WorkflowType::ChatAssistant => WorkflowOutput::Response(text),
            WorkflowType::GoalTracking => WorkflowOutput::Feedback(text),
            WorkflowType::Motivation => WorkflowOutput::Message(text),
        };

        Ok(WorkflowResult {
            workflow,
            status: "completed".into(),
            output,
            prompt_used: prompt,
            timestamp: fitola_core::now_iso(),
        })
    }

    pub fn history(&self, user_id: &str) -> Vec<ContextEntry> {
        self.context.history(user_id)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionInfo {
    pub user_id: String,
    pub workflow: WorkflowType,
    pub started_at: String,
    pub result: WorkflowResult,
}

/// Every session ever started. Never evicted; an id collision overwrites.
#[derive(Default)]
pub struct SessionStore {
    sessions: Mutex<HashMap<SessionId, SessionInfo>>,
}

impl SessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&self, id: SessionId, info: SessionInfo) {
        self.sessions.lock().insert(id, info);
    }

    pub fn get(&self, id: &str) -> Option<SessionInfo> {
        self.sessions.lock().get(id).cloned()
    }

    pub fn len(&self) -> usize {
        self.sessions.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WorkflowSession {
    pub session_id: SessionId,
    pub workflow_result: WorkflowResult,
    pub status: String,
}

pub struct SimpleClawOrchestrator {
    agent: SimpleClawAgent,
    sessions: SessionStore,
}

impl SimpleClawOrchestrator {
    pub fn new(agent: SimpleClawAgent) -> Self {
        Self {
            agent,
            sessions: SessionStore::new(),
        }
    }

    /// Parse `workflow_type` and start it for `user_id`.
    pub async fn start_workflow(
        &self,
        user_id: &str,
        workflow_type: &str,
        user_data: &Fields,
        parameters: &Fields,
    ) -> Result<WorkflowSession> {
        let workflow: WorkflowType = workflow_type.parse()?;
        self.run(user_id, workflow, user_data, parameters).await
    }

    pub async fn run(
        &self,
        user_id: &str,
        workflow: WorkflowType,
        user_data: &Fields,
        parameters: &Fields,
    ) -> Result<WorkflowSession> {
        let mut user_context = Fields::new();
        user_context.insert("user_id".into(), user_id.into());
        user_context.extend(user_data.clone());

        let result = self
            .agent
            .execute(workflow, &user_context, parameters)
            .await?;

        let started = fitola_core::now();
        let session_id = format!(
            "{user_id}_{workflow}_{}",
            fitola_core::unix_timestamp(started)
        );
        info!(session_id = %session_id, workflow = %workflow, "simpleclaw workflow completed");
        self.sessions.insert(
            session_id.clone(),
            SessionInfo {
                user_id: user_id.to_string(),
                workflow,
                started_at: started.to_rfc3339(),
                result: result.clone(),
            },
        );

        Ok(WorkflowSession {
            session_id,
            workflow_result: result,
            status: "success".into(),
        })
    }

    pub fn session(&self, session_id: &str) -> Option<SessionInfo> {
        self.sessions.get(session_id)
    }

    pub fn user_memory(&self, user_id: &str) -> Vec<ContextEntry> {
        self.agent.history(user_id)
    }

    pub fn session_count(&self) -> usize {
        self.sessions.len()
    }
}
