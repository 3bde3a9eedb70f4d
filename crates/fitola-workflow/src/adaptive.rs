//! Memory-aware workflows driven by fixed threshold rules.
//!
//! Each workflow reads a handful of memories, derives insights from simple
//! rules, optionally asks the LLM for plan text, and memorizes what it did so
//! later runs see it.

use fitola_core::{FitolaError, Result};
use fitola_memory::{MemoryCategory, MemoryManager, MemoryRecord, PatternType};
use fitola_prompt::{Fields, FitnessPromptEngine, fields};
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};
use std::fmt;
use std::str::FromStr;
use std::sync::Arc;
use tracing::{error, info};

use crate::generator::Generator;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AdaptiveWorkflowType {
    LearningFitnessPlan,
    PredictiveWorkout,
    ProactiveMotivation,
    AdaptiveNutrition,
    SmartGoalTracking,
}

impl AdaptiveWorkflowType {
    pub const ALL: [AdaptiveWorkflowType; 5] = [
        Self::LearningFitnessPlan,
        Self::PredictiveWorkout,
        Self::ProactiveMotivation,
        Self::AdaptiveNutrition,
        Self::SmartGoalTracking,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::LearningFitnessPlan => "learning_fitness_plan",
            Self::PredictiveWorkout => "predictive_workout",
            Self::ProactiveMotivation => "proactive_motivation",
            Self::AdaptiveNutrition => "adaptive_nutrition",
            Self::SmartGoalTracking => "smart_goal_tracking",
        }
    }
}

impl fmt::Display for AdaptiveWorkflowType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AdaptiveWorkflowType {
    type Err = FitolaError;

    fn from_str(s: &str) -> Result<Self> {
        Self::ALL
            .into_iter()
            .find(|w| w.as_str() == s)
            .ok_or_else(|| FitolaError::UnknownWorkflow {
                given: s.to_string(),
                available: Self::ALL.iter().map(|w| w.as_str().to_string()).collect(),
            })
    }
}

// ── Result shapes ──────────────────────────────────────────────

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct FitnessInsights {
    pub patterns: Vec<String>,
    pub adaptations: Vec<String>,
    pub preferred_exercises: Vec<String>,
    pub optimal_times: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AdaptiveFitnessPlan {
    pub summary: String,
    pub content: String,
    pub adaptations_applied: usize,
    pub learning_incorporated: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LearningStatsSummary {
    pub memories_analyzed: usize,
    pub patterns_identified: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LearningFitnessPlanResult {
    pub workflow: AdaptiveWorkflowType,
    pub plan: AdaptiveFitnessPlan,
    pub insights_used: FitnessInsights,
    pub adaptive_features: Vec<String>,
    pub learning_stats: LearningStatsSummary,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct WorkoutPrediction {
    pub workout_type: String,
    pub duration: u32,
    pub confidence: f64,
    pub reasoning: Vec<String>,
    pub factors: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PredictiveWorkoutResult {
    pub workflow: AdaptiveWorkflowType,
    pub prediction: WorkoutPrediction,
    pub confidence: f64,
    pub reasoning: Vec<String>,
    pub context_factors: Vec<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MotivationTrigger {
    InactivityDetected,
    DeadlineApproaching,
}

impl MotivationTrigger {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::InactivityDetected => "inactivity_detected",
            Self::DeadlineApproaching => "deadline_approaching",
        }
    }

    fn message(&self) -> &'static str {
        match self {
            Self::InactivityDetected => {
                "I noticed it's been a few days since your last workout. Remember why you started - your goals are within reach! How about a quick 20-minute session today?"
            }
            Self::DeadlineApproaching => {
                "Your goal deadline is coming up! You've made great progress so far. Let's finish strong!"
            }
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Motivation {
    pub message: String,
    pub trigger: MotivationTrigger,
    pub personalized: bool,
    pub suggested_action: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProactiveMotivationResult {
    pub workflow: AdaptiveWorkflowType,
    pub should_send: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub motivation: Option<Motivation>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub trigger_detected: Option<MotivationTrigger>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub confidence: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ComplianceInsights {
    pub compliance_rate: f64,
    pub preferred_meals: Vec<String>,
    pub difficult_times: Vec<String>,
    pub adaptations: Vec<String>,
}

impl Default for ComplianceInsights {
    fn default() -> Self {
        Self {
            compliance_rate: 0.75,
            preferred_meals: vec!["breakfast_smoothie".into(), "grilled_protein_bowl".into()],
            difficult_times: vec!["late_evening".into()],
            adaptations: vec![
                "Focus on meals with high historical compliance".into(),
                "Avoid complex prep for evening meals".into(),
                "Include variety in successful meal types".into(),
            ],
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AdaptiveNutritionPlan {
    pub summary: String,
    pub content: String,
    pub compliance_rate: f64,
    pub adaptations_applied: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AdaptiveNutritionResult {
    pub workflow: AdaptiveWorkflowType,
    pub plan: AdaptiveNutritionPlan,
    pub compliance_insights: ComplianceInsights,
    pub adaptive_features: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GoalAnalysis {
    pub status: String,
    pub pattern_detected: bool,
    pub pattern_description: String,
    pub recommendations: Vec<String>,
    pub predicted_timeline: String,
    pub milestones_achieved: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SmartGoalResult {
    pub workflow: AdaptiveWorkflowType,
    pub goal: String,
    pub progress: Value,
    pub analysis: GoalAnalysis,
    pub adaptive_recommendations: Vec<String>,
    pub predicted_timeline: String,
    pub self_improving: bool,
}

/// Output of any adaptive workflow, serialized as the inner shape.
#[derive(Debug, Clone, Serialize)]
#[serde(untagged)]
pub enum AdaptiveResult {
    LearningFitnessPlan(LearningFitnessPlanResult),
    PredictiveWorkout(PredictiveWorkoutResult),
    ProactiveMotivation(ProactiveMotivationResult),
    AdaptiveNutrition(AdaptiveNutritionResult),
    SmartGoalTracking(SmartGoalResult),
}

// ── Engine ─────────────────────────────────────────────────────

pub struct AdaptiveWorkflowEngine {
    memory: Arc<MemoryManager>,
    generator: Generator,
    prompts: FitnessPromptEngine,
}

impl AdaptiveWorkflowEngine {
    pub fn new(memory: Arc<MemoryManager>, generator: Generator) -> Self {
        Self {
            memory,
            generator,
            prompts: FitnessPromptEngine::new(),
        }
    }

    /// Dispatch `workflow`. Rule-driven workflows read `user_data` merged
    /// with `parameters`; goal tracking takes `goal` and `progress` from
    /// the parameters.
    pub async fn execute(
        &self,
        workflow: AdaptiveWorkflowType,
        user_id: &str,
        user_data: &Fields,
        parameters: &Fields,
    ) -> AdaptiveResult {
        info!(user_id, workflow = %workflow, "executing adaptive workflow");
        match workflow {
            AdaptiveWorkflowType::LearningFitnessPlan => AdaptiveResult::LearningFitnessPlan(
                self.learning_fitness_plan(user_id, user_data, parameters)
                    .await,
            ),
            AdaptiveWorkflowType::PredictiveWorkout => AdaptiveResult::PredictiveWorkout(
                self.predictive_workout(user_id, &merged(user_data, parameters))
                    .await,
            ),
            AdaptiveWorkflowType::ProactiveMotivation => AdaptiveResult::ProactiveMotivation(
                self.proactive_motivation(user_id, &merged(user_data, parameters))
                    .await,
            ),
            AdaptiveWorkflowType::AdaptiveNutrition => AdaptiveResult::AdaptiveNutrition(
                self.adaptive_nutrition(user_id, user_data, parameters)
                    .await,
            ),
            AdaptiveWorkflowType::SmartGoalTracking => {
                let goal = fields::param_or(parameters, "goal", "fitness goal");
                let progress = parameters
                    .get("progress")
                    .cloned()
                    .unwrap_or_else(|| json!({}));
                AdaptiveResult::SmartGoalTracking(
                    self.smart_goal_tracking(user_id, &goal, progress).await,
                )
            }
        }
    }

    pub async fn learning_fitness_plan(
        &self,
        user_id: &str,
        user_data: &Fields,
        parameters: &Fields,
    ) -> LearningFitnessPlanResult {
        let history = self
            .retrieve(user_id, "workout history and performance", 10)
            .await;
        let preferences = self
            .retrieve(user_id, "exercise preferences and likes", 5)
            .await;
        let patterns = self
            .retrieve(user_id, "workout patterns and successful routines", 5)
            .await;

        let insights = fitness_insights(&history, &preferences);

        let mut enhanced = user_data.clone();
        enhanced.insert("learned_patterns".into(), json!(insights.patterns));
        enhanced.insert("preferred_exercises".into(), json!(insights.preferred_exercises));
        enhanced.insert("optimal_times".into(), json!(insights.optimal_times));
        let prompt = self.prompts.adaptive_fitness_plan(
            &enhanced,
            parameters,
            &insights.patterns,
            &insights.adaptations,
        );
        let content = self
            .generate_or(
                &prompt,
                "Adaptive plan generation in progress...",
                "Adaptive plan based on learned patterns (AI generation offline)",
            )
            .await;

        let plan = AdaptiveFitnessPlan {
            summary: "Personalized adaptive fitness plan".into(),
            content,
            adaptations_applied: insights.adaptations.len(),
            learning_incorporated: true,
        };

        self.memory
            .memorize(
                user_id,
                "fitness_plan_generated",
                &json!({
                    "plan_summary": plan.summary,
                    "adaptations": insights.adaptations,
                    "generated_at": fitola_core::now_iso(),
                }),
                MemoryCategory::default(),
            )
            .await;

        LearningFitnessPlanResult {
            workflow: AdaptiveWorkflowType::LearningFitnessPlan,
            learning_stats: LearningStatsSummary {
                memories_analyzed: history.len() + preferences.len() + patterns.len(),
                patterns_identified: insights.patterns.len(),
            },
            plan,
            insights_used: insights,
            adaptive_features: strings(&[
                "Personalized based on past performance",
                "Optimized for your preferred workout times",
                "Includes exercises you've shown progress in",
                "Adapts to your recovery patterns",
            ]),
        }
    }

    pub async fn predictive_workout(&self, user_id: &str, context: &Fields) -> PredictiveWorkoutResult {
        let recent = self.retrieve(user_id, "recent workouts and recovery", 5).await;

        let prediction = predict_workout(crate::hour_of_day(context), context, &recent);

        self.memory
            .memorize(
                user_id,
                "workout_predicted",
                &json!({
                    "prediction": prediction,
                    "context": context,
                    "timestamp": fitola_core::now_iso(),
                }),
                MemoryCategory::default(),
            )
            .await;

        PredictiveWorkoutResult {
            workflow: AdaptiveWorkflowType::PredictiveWorkout,
            confidence: prediction.confidence,
            reasoning: prediction.reasoning.clone(),
            context_factors: prediction.factors.clone(),
            prediction,
        }
    }

    pub async fn proactive_motivation(
        &self,
        user_id: &str,
        user_state: &Fields,
    ) -> ProactiveMotivationResult {
        let Some((trigger, confidence)) = motivation_trigger(user_state) else {
            return ProactiveMotivationResult {
                workflow: AdaptiveWorkflowType::ProactiveMotivation,
                should_send: false,
                motivation: None,
                trigger_detected: None,
                confidence: None,
                reason: Some("No motivation trigger detected".into()),
            };
        };

        let motivation = Motivation {
            message: trigger.message().into(),
            trigger,
            personalized: true,
            suggested_action: "Start today's workout".into(),
        };

        self.memory
            .memorize(
                user_id,
                "proactive_motivation_sent",
                &json!({
                    "trigger": trigger.as_str(),
                    "message": motivation.message,
                    "timestamp": fitola_core::now_iso(),
                }),
                MemoryCategory::default(),
            )
            .await;

        ProactiveMotivationResult {
            workflow: AdaptiveWorkflowType::ProactiveMotivation,
            should_send: true,
            motivation: Some(motivation),
            trigger_detected: Some(trigger),
            confidence: Some(confidence),
            reason: None,
        }
    }

    pub async fn adaptive_nutrition(
        &self,
        user_id: &str,
        user_data: &Fields,
        parameters: &Fields,
    ) -> AdaptiveNutritionResult {
        let insights = ComplianceInsights::default();

        let mut enhanced = user_data.clone();
        enhanced.insert("preferred_meals".into(), json!(insights.preferred_meals));
        enhanced.insert("compliance_rate".into(), json!(insights.compliance_rate));
        let prompt = self.prompts.adaptive_nutrition_plan(
            &enhanced,
            parameters,
            insights.compliance_rate,
            &insights.preferred_meals,
            &insights.difficult_times,
        );
        let content = self
            .generate_or(
                &prompt,
                "Adaptive nutrition plan in progress...",
                "Adaptive nutrition plan based on compliance patterns",
            )
            .await;

        let plan = AdaptiveNutritionPlan {
            summary: "Compliance-optimized nutrition plan".into(),
            content,
            compliance_rate: insights.compliance_rate,
            adaptations_applied: insights.adaptations.len(),
        };

        self.memory
            .memorize(
                user_id,
                "adaptive_nutrition_plan_generated",
                &json!({
                    "plan_summary": plan.summary,
                    "adaptations": insights.adaptations,
                    "generated_at": fitola_core::now_iso(),
                }),
                MemoryCategory::default(),
            )
            .await;

        AdaptiveNutritionResult {
            workflow: AdaptiveWorkflowType::AdaptiveNutrition,
            plan,
            compliance_insights: insights,
            adaptive_features: strings(&[
                "Based on meals you actually enjoy",
                "Optimized for your compliance patterns",
                "Adjusts portions to your preferences",
                "Includes variety you've responded well to",
            ]),
        }
    }

    pub async fn smart_goal_tracking(
        &self,
        user_id: &str,
        goal: &str,
        progress: Value,
    ) -> SmartGoalResult {
        self.memory
            .update_goal_progress(user_id, goal, &progress)
            .await;
        let history = self
            .retrieve(user_id, &format!("progress and milestones for {goal}"), 20)
            .await;

        let analysis = analyze_goal(&progress, history.len());

        if analysis.pattern_detected {
            self.memory
                .learn_pattern(
                    user_id,
                    PatternType::ExercisePerformance,
                    json!({
                        "goal": goal,
                        "pattern": analysis.pattern_description,
                        "detected_at": fitola_core::now_iso(),
                    }),
                )
                .await;
        }

        SmartGoalResult {
            workflow: AdaptiveWorkflowType::SmartGoalTracking,
            goal: goal.to_string(),
            progress,
            adaptive_recommendations: analysis.recommendations.clone(),
            predicted_timeline: analysis.predicted_timeline.clone(),
            analysis,
            self_improving: true,
        }
    }

    async fn retrieve(&self, user_id: &str, query: &str, limit: usize) -> Vec<MemoryRecord> {
        self.memory.retrieve(user_id, query, None, limit).await
    }

    /// Generated text, `on_error` when the provider fails, `offline` without one.
    async fn generate_or(&self, prompt: &str, on_error: &str, offline: &str) -> String {
        match self.generator.generate(prompt).await {
            Some(Ok(text)) => text,
            Some(Err(e)) => {
                error!(error = %e, "adaptive plan generation failed");
                on_error.to_string()
            }
            None => offline.to_string(),
        }
    }
}

// ── Rules ──────────────────────────────────────────────────────

fn fitness_insights(history: &[MemoryRecord], preferences: &[MemoryRecord]) -> FitnessInsights {
    let mut insights = FitnessInsights::default();
    if !history.is_empty() {
        insights
            .patterns
            .push("Consistent workout history detected".into());
        insights
            .adaptations
            .push("Plan complexity adjusted for experience level".into());
    }
    if !preferences.is_empty() {
        insights.patterns.push("Exercise preferences identified".into());
        insights.preferred_exercises = strings(&["bodyweight", "cardio"]);
        insights
            .adaptations
            .push("Prioritized preferred exercise types".into());
    }
    insights.optimal_times = strings(&["morning 7-9 AM", "evening 6-8 PM"]);
    insights
}

pub(crate) fn predict_workout(hour: u32, context: &Fields, recent: &[MemoryRecord]) -> WorkoutPrediction {
    let mut prediction = WorkoutPrediction {
        workout_type: "moderate_cardio".into(),
        duration: 30,
        confidence: 0.75,
        reasoning: Vec::new(),
        factors: Vec::new(),
    };

    if (6..=10).contains(&hour) {
        prediction
            .reasoning
            .push("Morning is your high-energy time based on patterns".into());
        prediction.workout_type = "high_intensity".into();
        prediction.confidence += 0.1;
        prediction.factors.push("optimal_time_window".into());
    }

    if !recent.is_empty() {
        prediction
            .reasoning
            .push("Adequate recovery time since last workout".into());
        prediction.factors.push("recovery_ready".into());
    }

    if context.get("energy_level").and_then(Value::as_str) == Some("high") {
        prediction.confidence += 0.1;
        prediction.factors.push("high_energy_state".into());
    }

    prediction
}

/// The trigger to act on and its confidence. A near deadline outranks inactivity.
pub(crate) fn motivation_trigger(state: &Fields) -> Option<(MotivationTrigger, f64)> {
    let deadline = state
        .get("goal_deadline_approaching")
        .is_some_and(fields::truthy);
    if deadline {
        return Some((MotivationTrigger::DeadlineApproaching, 0.9));
    }
    let days = state
        .get("days_since_workout")
        .and_then(fields::number)
        .unwrap_or(0.0);
    (days >= 3.0).then_some((MotivationTrigger::InactivityDetected, 0.8))
}

pub(crate) fn analyze_goal(progress: &Value, history_len: usize) -> GoalAnalysis {
    let mut analysis = GoalAnalysis {
        status: "on_track".into(),
        pattern_detected: false,
        pattern_description: String::new(),
        recommendations: Vec::new(),
        predicted_timeline: String::new(),
        milestones_achieved: Vec::new(),
    };

    if history_len >= 3 {
        analysis.pattern_detected = true;
        analysis.pattern_description = "Consistent progress pattern identified".into();
        analysis.status = "improving".into();
        analysis
            .recommendations
            .push("Maintain current approach - it's working!".into());
    }

    let rate = progress
        .get("completion_percentage")
        .and_then(fields::number)
        .unwrap_or(50.0);
    if rate > 0.0 {
        let weeks = ((100.0 - rate) / 10.0).trunc() as i64;
        analysis.predicted_timeline = format!("Estimated {weeks} weeks to goal completion");
    }
    if rate < 30.0 {
        analysis
            .recommendations
            .push("Consider breaking goal into smaller milestones".into());
    } else if rate > 70.0 {
        analysis
            .recommendations
            .push("You're close! Push for that final stretch".into());
    }

    analysis
}

fn merged(user_data: &Fields, parameters: &Fields) -> Fields {
    let mut out = user_data.clone();
    out.extend(parameters.clone());
    out
}

fn strings(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}
