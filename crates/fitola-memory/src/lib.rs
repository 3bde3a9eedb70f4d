//! # fitola-memory
//!
//! Long-term memory of user interactions:
//!
//! - **Remote**: the hosted MemU API, when an API key is configured.
//! - **Local**: an in-process, per-user list used when MemU is absent or failing.
//!
//! [`ContextStore`] keeps the short rolling workflow history used in prompts.
//! [`MemoryManager`] picks the backend and layers pattern learning, proactive
//! suggestions and goal-progress tracking on top.

pub mod context;
pub mod local;
pub mod manager;
pub mod memu;
pub mod record;

pub use context::{ContextEntry, ContextStore};
pub use local::LocalMemory;
pub use manager::{GoalProgress, MemoryManager, ProgressTrend, Suggestion, SuggestionKind};
pub use memu::MemuClient;
pub use record::{MemorizeAck, MemoryBackend, MemoryCategory, MemoryRecord, PatternType};

/// Default number of records returned by a retrieval.
pub const DEFAULT_RETRIEVE_LIMIT: usize = 5;
