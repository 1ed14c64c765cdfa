//! Runtime settings.
//!
//! Every field has a built-in default, so a missing or partial TOML file is
//! fine. Lookup order: explicit path, `NORTHSCRAPE_CONFIG`, then
//! `./config/northscrape.toml` if it exists.

use serde::Deserialize;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::time::Duration;
use thiserror::Error;

use crate::delay_manager::DelayRange;

pub const CONFIG_PATH: &str = "./config/northscrape.toml";
pub const CONFIG_ENV_VAR: &str = "NORTHSCRAPE_CONFIG";

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read configuration file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("Failed to parse configuration file: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Invalid configuration value for '{field}': {reason}")]
    Invalid { field: &'static str, reason: String },
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub sources: SourcesConfig,
    pub enrichment: EnrichmentConfig,
    pub delays: DelaysConfig,
    pub server: ServerConfig,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct SourcesConfig {
    pub directory_base_url: String,
    pub search_url: String,
    pub generate_timeout_secs: u64,
    pub lookup_timeout_secs: u64,
    /// Result links containing any of these fragments are skipped by the
    /// fallback search.
    pub denied_link_fragments: Vec<String>,
}

impl Default for SourcesConfig {
    fn default() -> Self {
        SourcesConfig {
            directory_base_url: "https://www.yellowpages.ca".to_string(),
            search_url: "https://html.duckduckgo.com/html/".to_string(),
            generate_timeout_secs: 10,
            lookup_timeout_secs: 8,
            denied_link_fragments: vec![
                "yelp".to_string(),
                "yellowpages".to_string(),
                "411.ca".to_string(),
            ],
        }
    }
}

impl SourcesConfig {
    pub fn generate_timeout(&self) -> Duration {
        Duration::from_secs(self.generate_timeout_secs)
    }

    pub fn lookup_timeout(&self) -> Duration {
        Duration::from_secs(self.lookup_timeout_secs)
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct EnrichmentConfig {
    /// Hard cap on simultaneous lookups.
    pub workers: usize,
    /// How many characters of the normalized address go into the dedup
    /// key. `0` keys on the whole address.
    pub dedup_prefix_len: usize,
}

impl Default for EnrichmentConfig {
    fn default() -> Self {
        EnrichmentConfig {
            workers: 20,
            dedup_prefix_len: 32,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct DelaysConfig {
    pub generate: DelayRange,
    pub between_queries: DelayRange,
    pub lookup: DelayRange,
}

impl Default for DelaysConfig {
    fn default() -> Self {
        DelaysConfig {
            generate: DelayRange::new(200, 800),
            between_queries: DelayRange::new(200, 600),
            lookup: DelayRange::new(100, 500),
        }
    }
}

impl DelaysConfig {
    pub fn disabled() -> Self {
        DelaysConfig {
            generate: DelayRange::none(),
            between_queries: DelayRange::none(),
            lookup: DelayRange::none(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub bind: String,
    pub port: u16,
    /// Empty means any origin is allowed.
    pub allowed_origins: Vec<String>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        ServerConfig {
            bind: "0.0.0.0".to_string(),
            port: 8080,
            allowed_origins: Vec::new(),
        }
    }
}

impl Settings {
    /// Resolves the configuration file and loads it, falling back to
    /// defaults when no file is found.
    pub fn load(explicit: Option<&Path>) -> Result<Self, ConfigError> {
        let path = explicit
            .map(Path::to_path_buf)
            .or_else(|| std::env::var_os(CONFIG_ENV_VAR).map(PathBuf::from))
            .or_else(|| {
                let default = PathBuf::from(CONFIG_PATH);
                default.exists().then_some(default)
            });

        match path {
            Some(path) => Self::load_from_path(&path),
            None => {
                log::info!("No configuration file found, using built-in defaults.");
                Ok(Settings::default())
            }
        }
    }

    pub fn load_from_path(path: &Path) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let settings = Self::from_toml(&content)?;
        log::info!("Loaded configuration from {}", path.display());
        Ok(settings)
    }

    pub fn from_toml(content: &str) -> Result<Self, ConfigError> {
        let settings: Settings = toml::from_str(content)?;
        settings.validate()?;
        Ok(settings)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.enrichment.workers == 0 {
            return Err(ConfigError::Invalid {
                field: "enrichment.workers",
                reason: "must be at least 1".to_string(),
            });
        }
        for (field, secs) in [
            ("sources.generate_timeout_secs", self.sources.generate_timeout_secs),
            ("sources.lookup_timeout_secs", self.sources.lookup_timeout_secs),
        ] {
            if secs == 0 {
                return Err(ConfigError::Invalid {
                    field,
                    reason: "must be at least 1 second".to_string(),
                });
            }
        }
        if self.sources.directory_base_url.trim().is_empty() {
            return Err(ConfigError::Invalid {
                field: "sources.directory_base_url",
                reason: "cannot be empty".to_string(),
            });
        }
        if self.sources.search_url.trim().is_empty() {
            return Err(ConfigError::Invalid {
                field: "sources.search_url",
                reason: "cannot be empty".to_string(),
            });
        }
        for (field, range) in [
            ("delays.generate", self.delays.generate),
            ("delays.between_queries", self.delays.between_queries),
            ("delays.lookup", self.delays.lookup),
        ] {
            if !range.is_disabled() && range.min_ms > range.max_ms {
                return Err(ConfigError::Invalid {
                    field,
                    reason: format!("min_ms {} exceeds max_ms {}", range.min_ms, range.max_ms),
                });
            }
        }
        Ok(())
    }
}
