//! Logging configuration

use anyhow::{bail, Result};
use serde::{Deserialize, Serialize};
use std::env;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level filter: error, warn, info, debug or trace
    /// Env: SC_LOG_LEVEL
    /// Default: "info"
    pub level: String,

    /// Output format: "human" or "json"
    /// Env: SC_LOG_FORMAT
    /// Default: "human"
    pub format: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self { level: "info".to_string(), format: "human".to_string() }
    }
}

impl LoggingConfig {
    pub fn merge(&mut self, other: Self) {
        *self = other;
    }

    pub fn apply_env_vars(&mut self) {
        if let Ok(level) = env::var("SC_LOG_LEVEL") {
            self.level = level;
        }
        if let Ok(format) = env::var("SC_LOG_FORMAT") {
            self.format = format;
        }
    }

    pub fn validate(&self) -> Result<()> {
        match self.level.as_str() {
            "error" | "warn" | "info" | "debug" | "trace" => {}
            other => bail!("Invalid log level: {}", other),
        }
        match self.format.as_str() {
            "human" | "json" => {}
            other => bail!("Invalid log format: {} (expected \"human\" or \"json\")", other),
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_valid() {
        assert!(LoggingConfig::default().validate().is_ok());
    }

    #[test]
    fn test_bogus_level_fails() {
        let cfg = LoggingConfig { level: "loud".to_string(), ..Default::default() };
        assert!(cfg.validate().is_err());
    }

    #[test]
    fn test_bogus_format_fails() {
        let cfg = LoggingConfig { format: "xml".to_string(), ..Default::default() };
        assert!(cfg.validate().is_err());
    }
}
