//! # fitola-workflow
//!
//! Three layers of coaching workflows:
//!
//! - **SimpleClaw**: five prompt-templated workflows with a short rolling context.
//! - **Adaptive**: memory-aware workflows driven by fixed threshold rules.
//! - **Self-improving orchestrator**: wraps both, memorizing every execution
//!   and reporting what has been learned.

pub mod adaptive;
pub mod generator;
pub mod orchestrator;
pub mod simpleclaw;

pub use adaptive::{AdaptiveResult, AdaptiveWorkflowEngine, AdaptiveWorkflowType};
pub use generator::Generator;
pub use orchestrator::{
    FeedbackAck, LearningExecution, LearningStats, OrchestratedWorkflow, ProactiveInsights,
    SelfImprovingOrchestrator,
};
pub use simpleclaw::{
    SessionInfo, SessionStore, SimpleClawAgent, SimpleClawOrchestrator, WorkflowOutput,
    WorkflowResult, WorkflowSession, WorkflowType,
};

/// Hour of day (0 to 23) from a request context's `time` or `hour` field,
/// falling back to the server's local clock.
pub fn hour_of_day(context: &fitola_prompt::Fields) -> u32 {
    ["time", "hour"]
        .iter()
        .filter_map(|key| context.get(*key))
        .find_map(parse_hour)
        .unwrap_or_else(|| chrono::Timelike::hour(&chrono::Local::now()))
}

fn parse_hour(value: &serde_json::Value) -> Option<u32> {
    match value {
        serde_json::Value::Number(n) => n.as_u64().map(|h| h as u32).filter(|h| *h < 24),
        serde_json::Value::String(s) => s
            .split(':')
            .next()
            .and_then(|h| h.trim().parse::<u32>().ok())
            .filter(|h| *h < 24),
        _ => None,
    }
}
