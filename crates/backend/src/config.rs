// =============================================================================
// Atlas Backend - Configuration
// =============================================================================

use std::env;
use std::path::PathBuf;

use atlas_geo::{AtlasConfig, ConfigError as EngineConfigError};

/// Application configuration loaded from environment variables.
#[derive(Debug, Clone)]
pub struct Config {
    /// Server bind address (e.g., "127.0.0.1:8000")
    pub bind_address: String,

    /// Frontend URL, allowed as CORS origin
    pub frontend_url: String,

    /// Optional path to `atlas.toml`
    pub engine_config_path: Option<PathBuf>,

    /// Engine defaults and limits (from `atlas.toml`, or built-in defaults)
    pub engine: AtlasConfig,

    /// `tracing` filter directives (RUST_LOG)
    pub log_filter: String,
}

impl Config {
    /// Load configuration from environment variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        let engine_config_path = env::var("ATLAS_CONFIG").ok().map(PathBuf::from);
        let engine = match &engine_config_path {
            Some(path) => AtlasConfig::load(path)?,
            None => AtlasConfig::default(),
        };

        Ok(Self {
            bind_address: env::var("BIND_ADDRESS").unwrap_or_else(|_| "127.0.0.1:8000".into()),
            frontend_url: env::var("FRONTEND_URL").unwrap_or_else(|_| "http://localhost:3000".into()),
            engine_config_path,
            engine,
            log_filter: env::var("RUST_LOG").unwrap_or_else(|_| "info".into()),
        })
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            bind_address: "127.0.0.1:8000".into(),
            frontend_url: "http://localhost:3000".into(),
            engine_config_path: None,
            engine: AtlasConfig::default(),
            log_filter: "info".into(),
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Engine config error: {0}")]
    Engine(#[from] EngineConfigError),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_env_reads_log_filter() {
        env::set_var("RUST_LOG", "warn,atlas_geo=debug");
        let config = Config::from_env().unwrap();
        env::remove_var("RUST_LOG");
        assert_eq!(config.log_filter, "warn,atlas_geo=debug");

        let config = Config::from_env().unwrap();
        assert_eq!(config.log_filter, "info");
        assert_eq!(Config::default().log_filter, "info");
    }
}
