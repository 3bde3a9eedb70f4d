use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing::{info, warn};

use fitola_config::{ConfigLoader, FitolaConfig, WarningSeverity};
use fitola_core::FitolaError;

mod serve;

/// Fitola fitness-coaching backend
#[derive(Parser, Debug)]
#[command(name = "fitola", version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Path to fitola.toml config file
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Log level override (e.g. debug, info, warn, error)
    #[arg(short, long, global = true)]
    log_level: Option<String>,

    /// Enable verbose output (debug logging)
    #[arg(short, long, global = true, conflicts_with = "quiet")]
    verbose: bool,

    /// Suppress all log output (errors only)
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    quiet: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug, PartialEq)]
enum Commands {
    /// Run the HTTP API server
    Serve {
        /// Listen address, overrides server.listen
        #[arg(short = 'L', long)]
        listen: Option<String>,
    },
    /// Show the resolved configuration
    Config {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Audit configuration for missing keys and invalid values
    Doctor,
    /// Show version and build info
    Version,
}

impl Cli {
    pub async fn run(self) -> fitola_core::Result<()> {
        // Doctor reports validation errors instead of failing on them.
        let loader = if self.command == Commands::Doctor {
            None
        } else {
            Some(ConfigLoader::load(self.config.as_deref())?)
        };
        let config = match &loader {
            Some(loader) => loader.get(),
            None => load_unvalidated(self.config.as_deref())?,
        };
        init_tracing(&config, self.resolve_log_level(&config));
        if let Some(loader) = &loader {
            info!(path = %loader.path().display(), "configuration resolved");
            for note in loader.notes() {
                warn!("{note}");
            }
        }

        match self.command {
            Commands::Serve { listen } => serve::cmd_serve(config, listen).await,
            Commands::Config { json } => Self::cmd_config(&config, json),
            Commands::Doctor => Self::cmd_doctor(&config),
            Commands::Version => Self::cmd_version(),
        }
    }

    /// --verbose > --quiet > --log-level > config `logging.level`
    fn resolve_log_level<'a>(&'a self, config: &'a FitolaConfig) -> &'a str {
        if self.verbose {
            "debug"
        } else if self.quiet {
            "error"
        } else {
            self.log_level.as_deref().unwrap_or(&config.logging.level)
        }
    }

    fn cmd_config(config: &FitolaConfig, json: bool) -> fitola_core::Result<()> {
        let rendered = if json {
            serde_json::to_string_pretty(config)?
        } else {
            toml::to_string_pretty(config).map_err(|e| FitolaError::Config(e.to_string()))?
        };
        println!("{rendered}");
        Ok(())
    }

    fn cmd_doctor(config: &FitolaConfig) -> fitola_core::Result<()> {
        println!("Fitola Doctor: configuration audit");
        println!();

        let warnings = match config.validate() {
            Ok(w) => w,
            Err(e) => {
                println!("{e}");
                return Ok(());
            }
        };

        let mut warn_count = 0;
        let mut info_count = 0;
        for w in &warnings {
            println!("  {w}");
            match w.severity {
                WarningSeverity::Warning => warn_count += 1,
                WarningSeverity::Info => info_count += 1,
                WarningSeverity::Error => {}
            }
        }

        println!();
        println!(
            "  {} warnings, {} suggestions (LLM: {}, memory: {}, gateway: {})",
            warn_count,
            info_count,
            configured(config.llm.api_key.as_deref()),
            configured(config.memory.api_key.as_deref()),
            configured(config.gateway.token.as_deref()),
        );
        Ok(())
    }

    fn cmd_version() -> fitola_core::Result<()> {
        println!("Fitola v{}", env!("CARGO_PKG_VERSION"));
        println!("   Rust edition: 2024");
        println!("   Target: {}", std::env::consts::ARCH);
        println!("   OS: {}", std::env::consts::OS);
        #[cfg(debug_assertions)]
        println!("   Profile: debug");
        #[cfg(not(debug_assertions))]
        println!("   Profile: release");
        Ok(())
    }
}

/// Read the config file and apply env overrides without rejecting invalid values.
fn load_unvalidated(explicit: Option<&std::path::Path>) -> fitola_core::Result<FitolaConfig> {
    let path = ConfigLoader::resolve_path(explicit);
    let config = if path.exists() {
        let raw = std::fs::read_to_string(&path)?;
        ConfigLoader::parse(&raw)
            .map_err(|e| FitolaError::Config(format!("failed to parse {}: {e}", path.display())))?
    } else {
        FitolaConfig::default()
    };
    Ok(ConfigLoader::apply_env_overrides(config))
}

fn configured(key: Option<&str>) -> &'static str {
    if key.is_some_and(|k| !k.is_empty()) {
        "configured"
    } else {
        "missing"
    }
}

/// `RUST_LOG` wins over `level`. Format follows `logging.format`.
fn init_tracing(config: &FitolaConfig, level: &str) {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(level));
    if config.logging.format == "json" {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .json()
            .with_target(true)
            .init();
    } else {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_target(false)
            .init();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_serve_with_listen() {
        let cli = Cli::try_parse_from(["fitola", "serve", "-L", "0.0.0.0:9000"]).unwrap();
        assert_eq!(
            cli.command,
            Commands::Serve {
                listen: Some("0.0.0.0:9000".into())
            }
        );
    }

    #[test]
    fn test_verbose_and_quiet_conflict() {
        assert!(Cli::try_parse_from(["fitola", "-v", "-q", "version"]).is_err());
    }

    #[test]
    fn test_log_level_precedence() {
        let config = FitolaConfig::default();

        let cli = Cli::try_parse_from(["fitola", "--log-level", "warn", "version"]).unwrap();
        assert_eq!(cli.resolve_log_level(&config), "warn");

        let cli = Cli::try_parse_from(["fitola", "-v", "--log-level", "warn", "version"]).unwrap();
        assert_eq!(cli.resolve_log_level(&config), "debug");

        let cli = Cli::try_parse_from(["fitola", "version"]).unwrap();
        assert_eq!(cli.resolve_log_level(&config), "info");
    }

    #[test]
    fn test_configured_label() {
        assert_eq!(configured(Some("k")), "configured");
        assert_eq!(configured(Some("")), "missing");
        assert_eq!(configured(None), "missing");
    }
}
