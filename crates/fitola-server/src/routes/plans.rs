use axum::{
    Router,
    extract::State,
    response::Json,
    routing::{get, post},
};
use fitola_core::FitolaError;
use fitola_llm::{PlanFormat, parse_json_response};
use fitola_prompt::{FitnessPromptEngine, fields, language_instruction, sanitize_prompt_value};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::sync::Arc;

use super::ContextRequest;
use crate::{ApiResult, AppState};

#[derive(Debug, Deserialize)]
pub struct PlanRequest {
    pub age: i64,
    pub height_cm: f64,
    pub weight_kg: f64,
    pub body_type: String,
    pub goal: String,
    #[serde(default = "default_duration_weeks")]
    pub duration_weeks: i64,
    pub preferences: Option<String>,
    pub language: Option<String>,
}

fn default_duration_weeks() -> i64 {
    4
}

impl PlanRequest {
    fn validate(&self) -> Result<(), FitolaError> {
        check_range("age", self.age as f64, 1.0, 120.0)?;
        check_range("height_cm", self.height_cm, 1.0, 300.0)?;
        check_range("weight_kg", self.weight_kg, 1.0, 500.0)
    }

    fn prompt(&self) -> String {
        format!(
            "Create a weekly workout plan and diet plan as JSON with keys `workout_plan`, `diet_plan`, and `rationale`.\n\
             Age: {}\n\
             Height (cm): {:?}\n\
             Weight (kg): {:?}\n\
             Body Type: {}\n\
             Goal: {}\n\
             Duration (weeks): {}\n\
             Preferences: {}\n\
             {}",
            self.age,
            self.height_cm,
            self.weight_kg,
            sanitize_prompt_value(Some(&self.body_type), 200),
            sanitize_prompt_value(Some(&self.goal), 200),
            self.duration_weeks,
            sanitize_prompt_value(self.preferences.as_deref(), 200),
            language_instruction(self.language.as_deref()),
        )
    }
}

/// Inclusive range check shared by the body-metric endpoints.
pub(crate) fn check_range(field: &str, value: f64, min: f64, max: f64) -> Result<(), FitolaError> {
    if (min..=max).contains(&value) {
        Ok(())
    } else {
        Err(FitolaError::validation(
            field,
            format!("must be between {min} and {max}"),
        ))
    }
}

#[derive(Serialize)]
struct PlanResponse {
    plan_json: Option<Value>,
    plan_text: String,
    plan_format: PlanFormat,
}

#[derive(Serialize)]
struct TemplatedPlanResponse {
    plan: String,
    plan_json: Option<Value>,
    plan_format: PlanFormat,
    prompt_used: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    calories: Option<Calories>,
}

#[derive(Serialize)]
struct Calories {
    bmr: i64,
    tdee: i64,
}

pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/api/v1/plans/ai", get(describe_handler).post(generate_handler))
        .route("/api/v1/plans/ai/fitness", post(fitness_handler))
        .route("/api/v1/plans/ai/nutrition", post(nutrition_handler))
}

async fn describe_handler() -> Json<Value> {
    Json(serde_json::json!({"message": "AI-generated personalized fitness plans"}))
}

async fn generate_handler(
    State(state): State<Arc<AppState>>,
    Json(req): Json<PlanRequest>,
) -> ApiResult<Json<PlanResponse>> {
    req.validate()?;
    let plan_text = state.generate(req.prompt()).await?;
    let plan_json = parse_json_response(&plan_text);
    Ok(Json(PlanResponse {
        plan_format: PlanFormat::of(&plan_json),
        plan_json,
        plan_text,
    }))
}

async fn fitness_handler(
    State(state): State<Arc<AppState>>,
    Json(req): Json<ContextRequest>,
) -> ApiResult<Json<TemplatedPlanResponse>> {
    let prompt = FitnessPromptEngine::new().fitness_plan(&req.user_context, &req.parameters, &[]);
    templated(&state, prompt, None).await
}

async fn nutrition_handler(
    State(state): State<Arc<AppState>>,
    Json(req): Json<ContextRequest>,
) -> ApiResult<Json<TemplatedPlanResponse>> {
    let prompt =
        FitnessPromptEngine::new().nutrition_plan(&req.user_context, &req.parameters, &[]);
    let field = |key: &str| {
        fields::lookup(&req.user_context, &req.parameters, key)
            .cloned()
            .unwrap_or(Value::Null)
    };
    let (bmr, tdee) = fitola_prompt::engine::calorie_needs(
        &field("weight"),
        &field("height"),
        &field("age"),
    );
    templated(&state, prompt, Some(Calories { bmr, tdee })).await
}

async fn templated(
    state: &AppState,
    prompt: String,
    calories: Option<Calories>,
) -> ApiResult<Json<TemplatedPlanResponse>> {
    let plan = state.generate(prompt.clone()).await?;
    let plan_json = parse_json_response(&plan);
    Ok(Json(TemplatedPlanResponse {
        plan_format: PlanFormat::of(&plan_json),
        plan_json,
        plan,
        prompt_used: prompt,
        calories,
    }))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request() -> PlanRequest {
        PlanRequest {
            age: 29,
            height_cm: 175.0,
            weight_kg: 72.5,
            body_type: "  ecto   morph ".into(),
            goal: "build muscle".into(),
            duration_weeks: 4,
            preferences: None,
            language: Some("French".into()),
        }
    }

    #[test]
    fn test_plan_prompt_text() {
        let prompt = request().prompt();
        assert!(prompt.starts_with("Create a weekly workout plan and diet plan as JSON"));
        assert!(prompt.contains("Height (cm): 175.0\n"));
        assert!(prompt.contains("Weight (kg): 72.5\n"));
        assert!(prompt.contains("Body Type: ecto morph\n"));
        assert!(prompt.contains("Preferences: None\n"));
        assert!(prompt.ends_with("Respond in French."));
    }

    #[test]
    fn test_plan_validation_bounds() {
        assert!(request().validate().is_ok());
        let mut r = request();
        r.age = 0;
        assert!(r.validate().is_err());
        let mut r = request();
        r.height_cm = 300.5;
        assert!(r.validate().is_err());
        let mut r = request();
        r.weight_kg = 500.0;
        assert!(r.validate().is_ok());
    }
}
