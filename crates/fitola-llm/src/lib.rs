//! # fitola-llm
//!
//! Abstraction layer over the text-generation API. Ships a Gemini REST
//! provider, a deterministic mock for tests, and helpers for pulling JSON
//! objects out of generated text.

pub mod gemini;
pub mod mock;
pub mod parse;
pub mod provider;

pub use gemini::GeminiProvider;
pub use mock::MockProvider;
pub use parse::{PlanFormat, parse_json_response};
pub use provider::{GenerateRequest, GenerateResponse, LlmProvider, Usage};
