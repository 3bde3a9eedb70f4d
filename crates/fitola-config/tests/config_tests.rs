#[cfg(test)]
mod tests {
    use fitola_config::ConfigLoader;
    use fitola_config::schema::*;
    use std::collections::HashMap;
    use std::io::Write;

    fn env(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    fn no_env() -> impl Fn(&str) -> Option<String> {
        |_| None
    }

    // ── Default tests ──────────────────────────────────────────

    #[test]
    fn test_llm_config_defaults() {
        let config = LlmConfig::default();
        assert_eq!(config.model, "gemini-2.5-flash");
        assert_eq!(
            config.base_url,
            "https://generativelanguage.googleapis.com/v1beta"
        );
        assert_eq!(config.request_timeout_secs, 60);
        assert!(config.api_key.is_none());
        assert!(config.temperature.is_none());
    }

    #[test]
    fn test_memory_config_defaults() {
        let config = MemoryConfig::default();
        assert_eq!(config.base_url, "https://api.memu.so");
        assert_eq!(config.agent_id, "fitola_fitness_coach");
        assert!(config.api_key.is_none());
    }

    #[test]
    fn test_gateway_and_server_defaults() {
        let gateway = GatewayConfig::default();
        assert_eq!(gateway.base_url, "https://rube.app");
        assert_eq!(gateway.request_timeout_secs, 10);

        let server = ServerConfig::default();
        assert_eq!(server.listen, "127.0.0.1:8000");
        assert!(!server.cors);

        assert_eq!(WorkflowConfig::default().context_history_cap, 10);
    }

    // ── Parsing tests ──────────────────────────────────────────

    #[test]
    fn test_partial_toml_fills_defaults() {
        let config = ConfigLoader::parse(
            r#"
[llm]
model = "gemini-2.0-pro"

[server]
cors = true
"#,
        )
        .unwrap();
        assert_eq!(config.llm.model, "gemini-2.0-pro");
        assert_eq!(config.llm.request_timeout_secs, 60);
        assert!(config.server.cors);
        assert_eq!(config.server.listen, "127.0.0.1:8000");
        assert_eq!(config.logging.format, "pretty");
    }

    #[test]
    fn test_config_toml_roundtrip() {
        let config = FitolaConfig::default();
        let toml_str = toml::to_string_pretty(&config).unwrap();
        let restored = ConfigLoader::parse(&toml_str).unwrap();
        assert_eq!(restored.llm.model, config.llm.model);
        assert_eq!(restored.gateway.base_url, config.gateway.base_url);
    }

    #[test]
    fn test_load_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let config_path = dir.path().join("fitola.toml");
        let mut f = std::fs::File::create(&config_path).unwrap();
        writeln!(
            f,
            r#"
[llm]
api_key = "file-key"

[gateway]
base_url = "https://gateway.example.com/"
token = "jwt"

[logging]
level = "debug"
format = "json"
"#
        )
        .unwrap();

        let loader = ConfigLoader::load_with(Some(&config_path), no_env()).unwrap();
        let config = loader.get();
        assert_eq!(loader.path(), config_path.as_path());
        assert_eq!(config.llm.api_key.as_deref(), Some("file-key"));
        assert_eq!(config.gateway.base_url, "https://gateway.example.com");
        assert_eq!(config.logging.level, "debug");
        assert_eq!(config.logging.format, "json");
    }

    #[test]
    fn test_missing_file_uses_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config_path = dir.path().join("absent.toml");
        let loader = ConfigLoader::load_with(Some(&config_path), no_env()).unwrap();
        assert_eq!(loader.get().llm.model, "gemini-2.5-flash");
        assert!(loader.notes()[0].starts_with("config file not found at"));
        assert!(loader.notes()[0].contains("absent.toml"));
    }

    #[test]
    fn test_notes_carry_validation_warnings() {
        let dir = tempfile::tempdir().unwrap();
        let config_path = dir.path().join("fitola.toml");
        std::fs::write(&config_path, "[server]\nlisten = \"0.0.0.0:8000\"\n").unwrap();
        let loader = ConfigLoader::load_with(Some(&config_path), no_env()).unwrap();
        let warnings = loader.get().validate().unwrap();
        assert!(!warnings.is_empty());
        assert_eq!(loader.notes().len(), warnings.len());
        assert!(loader.notes().iter().all(|n| !n.starts_with("config file not found")));
    }

    #[test]
    fn test_fitola_config_env_selects_file() {
        let dir = tempfile::tempdir().unwrap();
        let config_path = dir.path().join("custom.toml");
        std::fs::write(&config_path, "[llm]\nmodel = \"gemini-2.0-pro\"\n").unwrap();
        let path = config_path.to_str().unwrap();

        assert_eq!(
            ConfigLoader::resolve_path_with(None, env(&[("FITOLA_CONFIG", path)])),
            config_path
        );
        let loader = ConfigLoader::load_with(None, env(&[("FITOLA_CONFIG", path)])).unwrap();
        assert_eq!(loader.path(), config_path.as_path());
        assert_eq!(loader.get().llm.model, "gemini-2.0-pro");

        let explicit = dir.path().join("explicit.toml");
        assert_eq!(
            ConfigLoader::resolve_path_with(Some(&explicit), env(&[("FITOLA_CONFIG", path)])),
            explicit
        );
    }

    #[test]
    fn test_invalid_toml_is_config_error() {
        let dir = tempfile::tempdir().unwrap();
        let config_path = dir.path().join("fitola.toml");
        std::fs::write(&config_path, "[llm\nmodel = ").unwrap();
        let err = ConfigLoader::load_with(Some(&config_path), no_env())
            .err()
            .unwrap();
        assert!(err.to_string().contains("failed to parse"));
    }

    #[test]
    fn test_non_https_gateway_fails_load() {
        let dir = tempfile::tempdir().unwrap();
        let config_path = dir.path().join("fitola.toml");
        std::fs::write(&config_path, "[gateway]\nbase_url = \"http://rube.app\"\n").unwrap();
        let err = ConfigLoader::load_with(Some(&config_path), no_env())
            .err()
            .unwrap();
        assert!(err.to_string().contains("RUBE_MCP_BASE_URL must use https."));
    }

    // ── Env override tests ─────────────────────────────────────

    #[test]
    fn test_env_overrides_always_win() {
        let mut config = FitolaConfig::default();
        config.llm.model = "from-file".into();
        let config = ConfigLoader::apply_env_overrides_from(
            config,
            env(&[
                ("GEMINI_MODEL", "gemini-env"),
                ("FITOLA_SERVER_LISTEN", "0.0.0.0:9000"),
                ("FITOLA_LOG_LEVEL", "warn"),
                ("MEMU_API_BASE_URL", "https://memu.local"),
                ("RUBE_MCP_BASE_URL", "https://rube.local///"),
            ]),
        );
        assert_eq!(config.llm.model, "gemini-env");
        assert_eq!(config.server.listen, "0.0.0.0:9000");
        assert_eq!(config.logging.level, "warn");
        assert_eq!(config.memory.base_url, "https://memu.local");
        assert_eq!(config.gateway.base_url, "https://rube.local");
    }

    #[test]
    fn test_env_keys_fill_only_when_unset() {
        let mut config = FitolaConfig::default();
        config.llm.api_key = Some("file-gemini".into());
        let config = ConfigLoader::apply_env_overrides_from(
            config,
            env(&[
                ("GEMINI_API_KEY", "env-gemini"),
                ("MEMU_API_KEY", "env-memu"),
                ("RUBE_MCP_JWT", "env-jwt"),
            ]),
        );
        assert_eq!(config.llm.api_key.as_deref(), Some("file-gemini"));
        assert_eq!(config.memory.api_key.as_deref(), Some("env-memu"));
        assert_eq!(config.gateway.token.as_deref(), Some("env-jwt"));
    }

    // ── Validation tests ───────────────────────────────────────

    #[test]
    fn test_default_config_validates_with_warnings() {
        let warnings = FitolaConfig::default().validate().unwrap();
        assert!(warnings.iter().any(|w| w.field == "llm.api_key"));
        assert!(warnings.iter().any(|w| w.field == "gateway.token"));
        assert!(
            warnings
                .iter()
                .all(|w| w.severity != WarningSeverity::Error)
        );
    }

    #[test]
    fn test_validation_aggregates_errors() {
        let mut config = FitolaConfig::default();
        config.llm.model = "  ".into();
        config.server.listen = String::new();
        config.workflow.context_history_cap = 0;
        let err = config.validate().unwrap_err();
        assert!(err.contains("llm.model"));
        assert!(err.contains("server.listen"));
        assert!(err.contains("workflow.context_history_cap"));
    }

    #[test]
    fn test_unknown_logging_values_warn() {
        let mut config = FitolaConfig::default();
        config.logging.level = "loud".into();
        config.logging.format = "xml".into();
        let warnings = config.validate().unwrap();
        assert!(warnings.iter().any(|w| w.field == "logging.level"));
        assert!(warnings.iter().any(|w| w.field == "logging.format"));
    }

    #[test]
    fn test_wildcard_listen_warns() {
        let mut config = FitolaConfig::default();
        config.server.listen = "0.0.0.0:8000".into();
        let warnings = config.validate().unwrap();
        let w = warnings.iter().find(|w| w.field == "server.listen").unwrap();
        assert_eq!(w.severity, WarningSeverity::Warning);
        assert!(w.to_string().contains("0.0.0.0"));
    }
}
