use async_trait::async_trait;
use fitola_core::Result;
use serde::{Deserialize, Serialize};

/// Category used to organise stored memories.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MemoryCategory {
    #[default]
    UserProfile,
    FitnessGoals,
    WorkoutHistory,
    NutritionPrefs,
    ProgressMetrics,
    Preferences,
    Patterns,
    Motivations,
    Challenges,
}

impl MemoryCategory {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::UserProfile => "user_profile",
            Self::FitnessGoals => "fitness_goals",
            Self::WorkoutHistory => "workout_history",
            Self::NutritionPrefs => "nutrition_prefs",
            Self::ProgressMetrics => "progress_metrics",
            Self::Preferences => "preferences",
            Self::Patterns => "patterns",
            Self::Motivations => "motivations",
            Self::Challenges => "challenges",
        }
    }
}

impl std::fmt::Display for MemoryCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Kind of behavioural pattern recorded via `learn_pattern`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PatternType {
    WorkoutPreference,
    TimePreference,
    ExercisePerformance,
    MotivationTrigger,
    NutritionCompliance,
    RecoveryPattern,
    SuccessfulRecommendation,
    UnsuccessfulRecommendation,
}

impl PatternType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::WorkoutPreference => "workout_preference",
            Self::TimePreference => "time_preference",
            Self::ExercisePerformance => "exercise_performance",
            Self::MotivationTrigger => "motivation_trigger",
            Self::NutritionCompliance => "nutrition_compliance",
            Self::RecoveryPattern => "recovery_pattern",
            Self::SuccessfulRecommendation => "successful_recommendation",
            Self::UnsuccessfulRecommendation => "unsuccessful_recommendation",
        }
    }
}

/// One remembered interaction.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MemoryRecord {
    pub user_id: String,
    pub interaction_type: String,
    /// Free-form payload. Local records keep the original JSON map; remote
    /// records carry the text MemU extracted.
    pub content: serde_json::Value,
    pub category: MemoryCategory,
    pub timestamp: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub relevance: Option<f64>,
}

impl MemoryRecord {
    /// The content rendered as plain text.
    pub fn content_text(&self) -> String {
        match &self.content {
            serde_json::Value::String(s) => s.clone(),
            other => other.to_string(),
        }
    }
}

/// Acknowledgement of a memorize call.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct MemorizeAck {
    pub task_id: String,
    pub status: String,
    pub category: MemoryCategory,
}

/// Storage backend for memories.
#[async_trait]
pub trait MemoryBackend: Send + Sync {
    fn name(&self) -> &str;

    async fn memorize(
        &self,
        user_id: &str,
        interaction_type: &str,
        content: &serde_json::Value,
        category: MemoryCategory,
    ) -> Result<MemorizeAck>;

    /// Up to `limit` records. `query` may be ignored by backends without search.
    async fn retrieve(
        &self,
        user_id: &str,
        query: &str,
        category: Option<MemoryCategory>,
        limit: usize,
    ) -> Result<Vec<MemoryRecord>>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_category_serde_names() {
        assert_eq!(
            serde_json::to_string(&MemoryCategory::NutritionPrefs).unwrap(),
            "\"nutrition_prefs\""
        );
        let c: MemoryCategory = serde_json::from_str("\"progress_metrics\"").unwrap();
        assert_eq!(c, MemoryCategory::ProgressMetrics);
        assert_eq!(MemoryCategory::default(), MemoryCategory::UserProfile);
    }

    #[test]
    fn test_pattern_type_as_str_matches_serde() {
        for p in [
            PatternType::WorkoutPreference,
            PatternType::RecoveryPattern,
            PatternType::UnsuccessfulRecommendation,
        ] {
            assert_eq!(
                serde_json::to_value(p).unwrap(),
                serde_json::Value::String(p.as_str().into())
            );
        }
    }

    #[test]
    fn test_content_text() {
        let mut rec = MemoryRecord {
            user_id: "u".into(),
            interaction_type: "t".into(),
            content: serde_json::json!("likes morning workouts"),
            category: MemoryCategory::Patterns,
            timestamp: None,
            relevance: None,
        };
        assert_eq!(rec.content_text(), "likes morning workouts");
        rec.content = serde_json::json!({"a": 1});
        assert_eq!(rec.content_text(), r#"{"a":1}"#);
    }
}
