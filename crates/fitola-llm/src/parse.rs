//! Extraction of JSON objects from generated text.

use regex::Regex;
use serde::{Deserialize, Serialize};
use std::sync::LazyLock;
use tracing::warn;

static LEADING_FENCE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^```(?:json)?\n").expect("static regex"));
static TRAILING_FENCE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\n```$").expect("static regex"));

/// Whether a generated plan was returned as structured JSON or raw text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PlanFormat {
    Json,
    Text,
}

impl PlanFormat {
    pub fn of(parsed: &Option<serde_json::Value>) -> Self {
        if parsed.is_some() {
            Self::Json
        } else {
            Self::Text
        }
    }
}

/// Parse generated text as a JSON object.
///
/// A surrounding ```` ``` ```` / ```` ```json ```` fence is stripped first.
/// Returns `None` for anything that is not a JSON object; never fails.
pub fn parse_json_response(text: &str) -> Option<serde_json::Value> {
    let mut cleaned = text.trim().to_string();
    if cleaned.starts_with("```") {
        cleaned = LEADING_FENCE.replace(&cleaned, "").into_owned();
        cleaned = TRAILING_FENCE.replace(&cleaned, "").into_owned();
    }
    match serde_json::from_str::<serde_json::Value>(&cleaned) {
        Ok(v @ serde_json::Value::Object(_)) => Some(v),
        Ok(_) => {
            warn!(length = cleaned.len(), "generated JSON is not an object");
            None
        }
        Err(_) => {
            warn!(length = cleaned.len(), "failed to parse generated JSON response");
            None
        }
    }
}
