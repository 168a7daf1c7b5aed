//! Configuration module for the Dot the World core.
//!
//! All configuration is loaded from environment variables with sensible defaults.

use std::env;
use std::path::PathBuf;

/// Application configuration loaded from environment variables.
#[derive(Debug, Clone)]
pub struct Config {
    /// Directory holding the persisted key-value collections
    pub data_dir: PathBuf,
    /// Log level (trace, debug, info, warn, error)
    pub log_level: String,
}

impl Config {
    /// Load configuration from environment variables.
    pub fn from_env() -> Self {
        dotenvy::dotenv().ok();

        let data_dir = env::var("DOTS_DATA_DIR")
            .unwrap_or_else(|_| "./data".to_string())
            .into();

        let log_level = env::var("DOTS_LOG_LEVEL").unwrap_or_else(|_| "info".to_string());

        Self {
            data_dir,
            log_level,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        env::remove_var("DOTS_DATA_DIR");
        env::remove_var("DOTS_LOG_LEVEL");

        let config = Config::from_env();

        assert_eq!(config.data_dir, PathBuf::from("./data"));
        assert_eq!(config.log_level, "info");
    }
}
