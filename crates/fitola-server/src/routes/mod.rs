//! Route groups. Each module exposes `routes()` for merging into the main router.

pub mod ai;
pub mod chat;
pub mod community;
pub mod memory;
pub mod messages;
pub mod plans;
pub mod rube;
pub mod simpleclaw;

use fitola_prompt::Fields;
use serde::Deserialize;

/// Shared body shape for endpoints that take a profile plus parameters.
#[derive(Debug, Default, Deserialize)]
pub struct ContextRequest {
    #[serde(default)]
    pub user_context: Fields,
    #[serde(default)]
    pub parameters: Fields,
}
