//! # fitola-prompt
//!
//! Pure string templating: every builder takes the caller's profile and
//! parameters as JSON maps and returns the full instructional prompt.

pub mod engine;
pub mod fields;
pub mod sanitize;

pub use engine::{FitnessPromptEngine, SYSTEM_ROLE};
pub use fields::Fields;
pub use sanitize::{language_instruction, sanitize_language_identifier, sanitize_prompt_value};
