//! Server configuration
//!
//! Settings resolve in priority order:
//! 1. Command-line argument (highest; `--port`, `--bind` carry their own
//!    environment fallbacks via clap)
//! 2. Environment variable (`REELTALLY_*`)
//! 3. TOML config file
//! 4. Compiled default
//!
//! The config file is named by `--config` / `REELTALLY_CONFIG`; when
//! neither is set, the OS config dir is tried
//! (`~/.config/reeltally/config.toml` on Linux) and silently skipped if
//! absent.

use std::path::{Path, PathBuf};

use serde::Deserialize;
use thiserror::Error;

use crate::provider::tmdb::TMDB_BASE_URL;
use crate::service::QueryLimits;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config {path:?}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to parse config {path:?}: {source}")]
    Parse {
        path: PathBuf,
        source: toml::de::Error,
    },

    #[error("tmdb api key not configured (set [tmdb] api_key or REELTALLY_TMDB_API_KEY)")]
    MissingApiKey,
}

/// Complete server configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Bind address for the HTTP listener
    pub bind: String,
    /// TCP port
    pub port: u16,
    pub tmdb: TmdbConfig,
    pub cache: CacheConfig,
    pub query: QueryConfig,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind: "127.0.0.1".to_string(),
            port: 3340,
            tmdb: TmdbConfig::default(),
            cache: CacheConfig::default(),
            query: QueryConfig::default(),
        }
    }
}

/// `[tmdb]` section
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct TmdbConfig {
    /// v3 API key; the only setting without a usable default
    pub api_key: String,
    pub base_url: String,
    /// Per-request timeout
    pub timeout_seconds: u64,
}

impl Default for TmdbConfig {
    fn default() -> Self {
        Self {
            api_key: String::new(),
            base_url: TMDB_BASE_URL.to_string(),
            timeout_seconds: 10,
        }
    }
}

/// `[cache]` section
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct CacheConfig {
    /// redis connection URL
    pub url: String,
    /// Expiry for cached movie details; absent keeps entries indefinitely
    pub ttl_seconds: Option<u64>,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            url: "redis://127.0.0.1:6379".to_string(),
            ttl_seconds: None,
        }
    }
}

/// `[query]` section
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct QueryConfig {
    pub max_page_fetches: usize,
    pub max_detail_fetches: usize,
}

impl Default for QueryConfig {
    fn default() -> Self {
        let limits = QueryLimits::default();
        Self {
            max_page_fetches: limits.max_page_fetches,
            max_detail_fetches: limits.max_detail_fetches,
        }
    }
}

impl QueryConfig {
    /// Caps for the aggregation fan-out; zero would stall the pipeline, so
    /// both are clamped to at least one
    pub fn limits(&self) -> QueryLimits {
        QueryLimits {
            max_page_fetches: self.max_page_fetches.max(1),
            max_detail_fetches: self.max_detail_fetches.max(1),
        }
    }
}

impl ServerConfig {
    /// Load configuration, then apply environment overrides.
    ///
    /// A file named explicitly via `cli_config` must exist; the
    /// OS-default location is optional.
    pub fn load(cli_config: Option<&Path>) -> Result<Self, ConfigError> {
        let mut config = if let Some(path) = cli_config {
            Self::from_file(path)?
        } else if let Some(path) = Self::default_config_path().filter(|p| p.exists()) {
            Self::from_file(&path)?
        } else {
            Self::default()
        };

        config.apply_env();

        if config.tmdb.api_key.is_empty() {
            return Err(ConfigError::MissingApiKey);
        }
        Ok(config)
    }

    /// OS-conventional location, e.g. `~/.config/reeltally/config.toml`
    fn default_config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("reeltally").join("config.toml"))
    }

    fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let raw = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        toml::from_str(&raw).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Environment overrides for settings without a CLI flag
    fn apply_env(&mut self) {
        if let Ok(key) = std::env::var("REELTALLY_TMDB_API_KEY") {
            self.tmdb.api_key = key;
        }
        if let Ok(url) = std::env::var("REELTALLY_TMDB_BASE_URL") {
            self.tmdb.base_url = url;
        }
        if let Ok(url) = std::env::var("REELTALLY_CACHE_URL") {
            self.cache.url = url;
        }
    }
}
