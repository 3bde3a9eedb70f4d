use thiserror::Error;

/// Unified error type for the Fitola backend.
#[derive(Error, Debug)]
pub enum FitolaError {
    // ── LLM errors ─────────────────────────────────────────────
    #[error("llm provider error: {0}")]
    LlmProvider(String),

    #[error("GEMINI_API_KEY is not configured. Please set GEMINI_API_KEY.")]
    LlmNotConfigured,

    // ── Memory errors ──────────────────────────────────────────
    #[error("memory error: {0}")]
    Memory(String),

    // ── Workflow errors ────────────────────────────────────────
    #[error("Invalid workflow type: {given}")]
    UnknownWorkflow {
        given: String,
        available: Vec<String>,
    },

    // ── Gateway errors ─────────────────────────────────────────
    #[error("RUBE_MCP_JWT is not configured. Please set RUBE_MCP_JWT.")]
    GatewayNotConfigured,

    #[error("Rube MCP request failed with status {status}.")]
    GatewayStatus { status: u16 },

    #[error("Rube MCP request failed: {0}")]
    GatewayTransport(String),

    #[error("Invalid JSON returned from Rube MCP.")]
    GatewayInvalidJson,

    // ── Request errors ─────────────────────────────────────────
    #[error("{field}: {reason}")]
    Validation { field: String, reason: String },

    #[error("not found: {0}")]
    NotFound(String),

    // ── Config errors ──────────────────────────────────────────
    #[error("config error: {0}")]
    Config(String),

    #[error("config validation failed: {field}: {reason}")]
    ConfigValidation { field: String, reason: String },

    // ── Generic wrappers ───────────────────────────────────────
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("{0}")]
    Other(#[from] anyhow::Error),
}

impl FitolaError {
    /// Shorthand for a request-field validation failure.
    pub fn validation(field: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::Validation {
            field: field.into(),
            reason: reason.into(),
        }
    }
}

pub type Result<T> = std::result::Result<T, FitolaError>;
