//! # fitola-config
//!
//! Configuration system for the Fitola backend. Reads from `fitola.toml` and
//! environment variables, in that precedence order (API keys excepted: a key in
//! the file always wins over the environment).

pub mod loader;
pub mod schema;

pub use loader::ConfigLoader;
pub use schema::FitolaConfig;
pub use schema::{ConfigWarning, GatewayConfig, LlmConfig, MemoryConfig, WarningSeverity};
