use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};

use crate::load::DocumentSource;

/// Main configuration structure
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub relvis: RelvisConfig,
    pub inputs: InputsConfig,
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub watch: WatchConfig,
}

/// Relvis-specific configuration
#[derive(Debug, Clone, Deserialize)]
pub struct RelvisConfig {
    /// Directory relative input paths are resolved against. Watch mode
    /// observes this directory for changes.
    pub data_dir: PathBuf,
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

/// The three input documents, each a path (relative to data_dir) or URL.
#[derive(Debug, Clone, Deserialize)]
pub struct InputsConfig {
    /// Relation-graph document: entries with nested triple lists.
    pub graph: String,
    /// Entity document: flat relation records.
    pub entities: String,
    /// Routes document: persons with ordered travel stops.
    pub routes: String,
}

/// HTTP server configuration
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_port")]
    pub port: u16,
    #[serde(default)]
    pub allowed_origins: Vec<String>,
    /// Optional directory of static front-end assets to serve at `/`.
    #[serde(default)]
    pub static_dir: Option<PathBuf>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            port: default_port(),
            allowed_origins: Vec::new(),
            static_dir: None,
        }
    }
}

/// Watch-mode configuration
#[derive(Debug, Clone, Deserialize)]
pub struct WatchConfig {
    #[serde(default = "default_debounce_ms")]
    pub debounce_ms: u64,
}

impl Default for WatchConfig {
    fn default() -> Self {
        Self {
            debounce_ms: default_debounce_ms(),
        }
    }
}

fn default_port() -> u16 {
    8080
}

fn default_debounce_ms() -> u64 {
    500
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Config {
    /// Load configuration from file
    ///
    /// Loads environment variables from .env file (if present) before loading config.
    /// Looks for config file in this order:
    /// 1. Path specified in RELVIS_CONFIG environment variable
    /// 2. ./config.toml in current directory
    pub fn load() -> Result<Self> {
        // Load .env file if it exists (ignore errors - file is optional)
        let _ = dotenv::dotenv();

        let config_path = std::env::var("RELVIS_CONFIG")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from("config.toml"));

        let config_str = std::fs::read_to_string(&config_path)
            .with_context(|| format!("Failed to read config file: {}", config_path.display()))?;

        let config: Config = toml::from_str(&config_str)
            .context("Failed to parse config.toml")?;

        config.validate()?;

        Ok(config)
    }

    /// Validate configuration values
    fn validate(&self) -> Result<()> {
        // data_dir is only required when at least one input is a local path
        let any_local = [&self.inputs.graph, &self.inputs.entities, &self.inputs.routes]
            .iter()
            .any(|spec| {
                matches!(
                    DocumentSource::parse(spec, &self.relvis.data_dir),
                    DocumentSource::File(_)
                )
            });

        if any_local {
            if !self.relvis.data_dir.exists() {
                anyhow::bail!(
                    "data_dir path does not exist: {}. Set data_dir in config.toml to your data directory.",
                    self.relvis.data_dir.display()
                );
            }
            if !self.relvis.data_dir.is_dir() {
                anyhow::bail!(
                    "data_dir must be a directory, not a file: {}",
                    self.relvis.data_dir.display()
                );
            }
        }

        if self.server.port == 0 {
            anyhow::bail!("server.port must be greater than 0");
        }

        if self.watch.debounce_ms == 0 {
            anyhow::bail!("watch.debounce_ms must be greater than 0");
        }

        Ok(())
    }

    /// Get the data directory
    pub fn data_dir(&self) -> &Path {
        &self.relvis.data_dir
    }

    /// Source of the relation-graph document
    pub fn graph_source(&self) -> DocumentSource {
        DocumentSource::parse(&self.inputs.graph, &self.relvis.data_dir)
    }

    /// Source of the entity document
    pub fn entities_source(&self) -> DocumentSource {
        DocumentSource::parse(&self.inputs.entities, &self.relvis.data_dir)
    }

    /// Source of the routes document
    pub fn routes_source(&self) -> DocumentSource {
        DocumentSource::parse(&self.inputs.routes, &self.relvis.data_dir)
    }
}
