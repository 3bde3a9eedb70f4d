use serde::{Deserialize, Serialize};

/// Root configuration, maps to `fitola.toml`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct FitolaConfig {
    pub llm: LlmConfig,
    pub memory: MemoryConfig,
    pub workflow: WorkflowConfig,
    pub gateway: GatewayConfig,
    pub server: ServerConfig,
    pub logging: LoggingConfig,
}

// ── LLM ────────────────────────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LlmConfig {
    /// Gemini API key. Can also be set via GEMINI_API_KEY.
    /// Config file takes priority over environment variable.
    pub api_key: Option<String>,
    /// Model identifier passed to `models/{model}:generateContent`.
    pub model: String,
    /// REST base URL of the generative-language API.
    pub base_url: String,
    /// Per-request timeout for generation calls.
    pub request_timeout_secs: u64,
    /// Sampling temperature. None = provider default.
    pub temperature: Option<f32>,
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            model: "gemini-2.5-flash".into(),
            base_url: "https://generativelanguage.googleapis.com/v1beta".into(),
            request_timeout_secs: 60,
            temperature: None,
        }
    }
}

// ── Memory ─────────────────────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct MemoryConfig {
    /// MemU API key. Without one the in-process store is used.
    pub api_key: Option<String>,
    /// MemU base URL (override for self-hosted deployments).
    pub base_url: String,
    /// Agent identity the memories are filed under.
    pub agent_id: String,
    pub request_timeout_secs: u64,
}

impl Default for MemoryConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            base_url: "https://api.memu.so".into(),
            agent_id: fitola_core::MEMORY_AGENT_ID.into(),
            request_timeout_secs: 30,
        }
    }
}

// ── Workflow ───────────────────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct WorkflowConfig {
    /// Interactions kept per user in the SimpleClaw context store.
    pub context_history_cap: usize,
}

impl Default for WorkflowConfig {
    fn default() -> Self {
        Self {
            context_history_cap: 10,
        }
    }
}

// ── Gateway ────────────────────────────────────────────────────

/// Recipe-discovery gateway (Rube MCP).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GatewayConfig {
    /// Must be https. Trailing slashes are trimmed on load.
    pub base_url: String,
    /// Bearer token. Can also be set via RUBE_MCP_JWT.
    pub token: Option<String>,
    pub request_timeout_secs: u64,
}

impl Default for GatewayConfig {
    fn default() -> Self {
        Self {
            base_url: "https://rube.app".into(),
            token: None,
            request_timeout_secs: 10,
        }
    }
}

// ── Server ─────────────────────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// HTTP listen address.
    pub listen: String,
    /// Enable permissive CORS (for the mobile/web client during development).
    pub cors: bool,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            listen: "127.0.0.1:8000".into(),
            cors: false,
        }
    }
}

// ── Logging ────────────────────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Log level: "trace", "debug", "info", "warn", "error".
    pub level: String,
    /// Output format: "pretty", "json".
    pub format: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".into(),
            format: "pretty".into(),
        }
    }
}

// ── Validation ─────────────────────────────────────────────────

/// A single config validation issue.
#[derive(Debug)]
pub struct ConfigWarning {
    pub field: String,
    pub message: String,
    pub severity: WarningSeverity,
    pub hint: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WarningSeverity {
    Error,
    Warning,
    Info,
}

impl std::fmt::Display for ConfigWarning {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let icon = match self.severity {
            WarningSeverity::Error => "❌",
            WarningSeverity::Warning => "⚠️ ",
            WarningSeverity::Info => "💡",
        };
        write!(f, "{} {}: {}", icon, self.field, self.message)?;
        if let Some(ref h) = self.hint {
            write!(f, "\n   ↳ {}", h)?;
        }
        Ok(())
    }
}

impl FitolaConfig {
    /// Validate the config and return a list of warnings/errors.
    /// Returns `Err` with all messages joined if any severity is Error.
    pub fn validate(&self) -> Result<Vec<ConfigWarning>, String> {
        let mut warnings = Vec::new();

        // ── LLM ───
        if self.llm.model.trim().is_empty() {
            warnings.push(ConfigWarning {
                field: "llm.model".into(),
                message: "model is empty".into(),
                severity: WarningSeverity::Error,
                hint: Some("Set to e.g. 'gemini-2.5-flash'".into()),
            });
        }
        if self.llm.api_key.as_deref().is_none_or(str::is_empty) {
            warnings.push(ConfigWarning {
                field: "llm.api_key".into(),
                message: "no Gemini API key: chat, plan and translate endpoints will return 500".into(),
                severity: WarningSeverity::Warning,
                hint: Some("Set GEMINI_API_KEY or [llm] api_key in fitola.toml".into()),
            });
        }
        if let Some(t) = self.llm.temperature
            && !(0.0..=2.0).contains(&t)
        {
            warnings.push(ConfigWarning {
                field: "llm.temperature".into(),
                message: format!("temperature {} is out of range", t),
                severity: WarningSeverity::Error,
                hint: Some("Temperature must be between 0.0 and 2.0".into()),
            });
        }

        // ── Memory ───
        if self.memory.api_key.is_none() {
            warnings.push(ConfigWarning {
                field: "memory.api_key".into(),
                message: "no MemU API key: memory runs in local mock mode".into(),
                severity: WarningSeverity::Info,
                hint: None,
            });
        }

        // ── Workflow ───
        if self.workflow.context_history_cap == 0 {
            warnings.push(ConfigWarning {
                field: "workflow.context_history_cap".into(),
                message: "history cap is 0: workflows would run without any context".into(),
                severity: WarningSeverity::Error,
                hint: Some("Set to e.g. 10".into()),
            });
        }

        // ── Gateway ───
        match url::Url::parse(&self.gateway.base_url) {
            Ok(u) if u.scheme() == "https" => {}
            _ => {
                warnings.push(ConfigWarning {
                    field: "gateway.base_url".into(),
                    message: "RUBE_MCP_BASE_URL must use https.".into(),
                    severity: WarningSeverity::Error,
                    hint: Some(format!("got '{}'", self.gateway.base_url)),
                });
            }
        }
        if self.gateway.token.as_deref().is_none_or(str::is_empty) {
            warnings.push(ConfigWarning {
                field: "gateway.token".into(),
                message: "no gateway token: recipe discovery will return 500".into(),
                severity: WarningSeverity::Warning,
                hint: Some("Set RUBE_MCP_JWT".into()),
            });
        }

        // ── Server listen address ───
        if self.server.listen.is_empty() {
            warnings.push(ConfigWarning {
                field: "server.listen".into(),
                message: "listen address is empty".into(),
                severity: WarningSeverity::Error,
                hint: Some("Set to e.g. '127.0.0.1:8000'".into()),
            });
        } else if self.server.listen.starts_with("0.0.0.0") {
            warnings.push(ConfigWarning {
                field: "server.listen".into(),
                message: "binding to 0.0.0.0: server is accessible from all interfaces".into(),
                severity: WarningSeverity::Warning,
                hint: Some("There is no authentication layer; keep it behind a proxy".into()),
            });
        }

        // ── Logging ───
        let valid_formats = ["pretty", "json"];
        if !valid_formats.contains(&self.logging.format.as_str()) {
            warnings.push(ConfigWarning {
                field: "logging.format".into(),
                message: format!("unknown log format '{}'", self.logging.format),
                severity: WarningSeverity::Warning,
                hint: Some(format!("Valid values: {}", valid_formats.join(", "))),
            });
        }
        let valid_levels = ["trace", "debug", "info", "warn", "error"];
        if !valid_levels.contains(&self.logging.level.as_str()) {
            warnings.push(ConfigWarning {
                field: "logging.level".into(),
                message: format!("unknown log level '{}'", self.logging.level),
                severity: WarningSeverity::Warning,
                hint: Some(format!("Valid values: {}", valid_levels.join(", "))),
            });
        }

        let errors: Vec<String> = warnings
            .iter()
            .filter(|w| w.severity == WarningSeverity::Error)
            .map(|w| format!("{}: {}", w.field, w.message))
            .collect();

        if !errors.is_empty() {
            return Err(format!("Configuration errors:\n  • {}", errors.join("\n  • ")));
        }

        Ok(warnings)
    }
}
