use std::path::{Path, PathBuf};

use crate::schema::FitolaConfig;

/// Loads the Fitola configuration from disk and the environment.
///
/// Loading usually happens before a tracing subscriber exists, so the
/// loader keeps its warnings in [`ConfigLoader::notes`] for the caller to
/// emit once logging is up.
pub struct ConfigLoader {
    config: FitolaConfig,
    config_path: PathBuf,
    notes: Vec<String>,
}

impl ConfigLoader {
    /// Resolve the config path: explicit path > FITOLA_CONFIG env > ~/.fitola/fitola.toml
    pub fn resolve_path(explicit: Option<&Path>) -> PathBuf {
        Self::resolve_path_with(explicit, |key| std::env::var(key).ok())
    }

    /// Same as [`ConfigLoader::resolve_path`] but with an explicit environment lookup.
    pub fn resolve_path_with(
        explicit: Option<&Path>,
        lookup: impl Fn(&str) -> Option<String>,
    ) -> PathBuf {
        if let Some(p) = explicit {
            return p.to_path_buf();
        }
        if let Some(p) = lookup("FITOLA_CONFIG") {
            return PathBuf::from(p);
        }
        dirs::home_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(".fitola")
            .join("fitola.toml")
    }

    /// Load the config from disk, falling back to defaults.
    pub fn load(path: Option<&Path>) -> fitola_core::Result<Self> {
        Self::load_with(path, |key| std::env::var(key).ok())
    }

    /// Same as [`ConfigLoader::load`] but with an explicit environment lookup.
    pub fn load_with(
        path: Option<&Path>,
        lookup: impl Fn(&str) -> Option<String>,
    ) -> fitola_core::Result<Self> {
        let config_path = Self::resolve_path_with(path, &lookup);
        let mut notes = Vec::new();
        let config = if config_path.exists() {
            let raw = std::fs::read_to_string(&config_path)?;
            Self::parse(&raw).map_err(|e| {
                fitola_core::FitolaError::Config(format!(
                    "failed to parse {}: {}",
                    config_path.display(),
                    e
                ))
            })?
        } else {
            notes.push(format!(
                "config file not found at {}, using defaults",
                config_path.display()
            ));
            FitolaConfig::default()
        };

        let config = Self::apply_env_overrides_from(config, lookup);

        // Keep warnings, fail on errors
        let warnings = config.validate().map_err(fitola_core::FitolaError::Config)?;
        notes.extend(warnings.iter().map(ToString::to_string));

        Ok(Self {
            config,
            config_path,
            notes,
        })
    }

    /// Parse a TOML document into a config (no env overrides, no validation).
    pub fn parse(raw: &str) -> Result<FitolaConfig, toml::de::Error> {
        toml::from_str::<FitolaConfig>(raw)
    }

    /// Get a snapshot of the loaded config.
    pub fn get(&self) -> FitolaConfig {
        self.config.clone()
    }

    /// Path the config was resolved from (may not exist).
    pub fn path(&self) -> &Path {
        &self.config_path
    }

    /// Warnings gathered while loading, in the order they were found.
    pub fn notes(&self) -> &[String] {
        &self.notes
    }

    /// Apply overrides from the process environment.
    pub fn apply_env_overrides(config: FitolaConfig) -> FitolaConfig {
        Self::apply_env_overrides_from(config, |key| std::env::var(key).ok())
    }

    /// Apply env var overrides (GEMINI_MODEL, FITOLA_SERVER_LISTEN, etc.)
    pub fn apply_env_overrides_from(
        mut config: FitolaConfig,
        lookup: impl Fn(&str) -> Option<String>,
    ) -> FitolaConfig {
        if let Some(v) = lookup("GEMINI_MODEL") {
            config.llm.model = v;
        }
        if let Some(v) = lookup("FITOLA_SERVER_LISTEN") {
            config.server.listen = v;
        }
        if let Some(v) = lookup("FITOLA_LOG_LEVEL") {
            config.logging.level = v;
        }
        if let Some(v) = lookup("MEMU_API_BASE_URL") {
            config.memory.base_url = v;
        }
        if let Some(v) = lookup("RUBE_MCP_BASE_URL") {
            config.gateway.base_url = v;
        }
        // API keys: env var fills in when config file doesn't have the key set.
        if config.llm.api_key.is_none() {
            config.llm.api_key = lookup("GEMINI_API_KEY");
        }
        if config.memory.api_key.is_none() {
            config.memory.api_key = lookup("MEMU_API_KEY");
        }
        if config.gateway.token.is_none() {
            config.gateway.token = lookup("RUBE_MCP_JWT");
        }

        config.gateway.base_url = config.gateway.base_url.trim_end_matches('/').to_string();
        config
    }
}
