//! Configuration system
//!
//! Values are resolved with a clear supersedence hierarchy, highest
//! priority first:
//!
//! 1. **Command-line flags** (applied by the binary)
//! 2. **Environment variables** (`SC_*`)
//! 3. **Config file** (config.toml)
//! 4. **Defaults**
//!
//! # Example
//!
//! ```no_run
//! use sectional_core::config::SectionalConfig;
//!
//! let config = SectionalConfig::load()?;
//! config.validate()?;
//! # Ok::<(), anyhow::Error>(())
//! ```

pub mod auth;
pub mod engine;
pub mod logging;
pub mod server;

pub use auth::AuthConfig;
pub use engine::EngineConfig;
pub use logging::LoggingConfig;
pub use server::ServerConfig;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Complete engine configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct SectionalConfig {
    pub server: ServerConfig,
    pub auth: AuthConfig,
    pub engine: EngineConfig,
    pub logging: LoggingConfig,
}

impl SectionalConfig {
    /// Load configuration with the full supersedence chain, reading
    /// `config.toml` from the working directory if present
    pub fn load() -> Result<Self> {
        Self::load_from("config.toml")
    }

    /// Load configuration, reading the given file if it exists
    pub fn load_from(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();

        let mut config = Self::default();

        if path.exists() {
            let file_config = Self::from_file(path)
                .with_context(|| format!("Failed to load config from {}", path.display()))?;
            config.merge(file_config);
        }

        config.apply_env_vars();

        Ok(config)
    }

    /// Load configuration from a TOML file
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let content = std::fs::read_to_string(path.as_ref())
            .with_context(|| format!("Failed to read config file: {}", path.as_ref().display()))?;

        toml::from_str(&content)
            .with_context(|| format!("Failed to parse TOML config: {}", path.as_ref().display()))
    }

    /// Merge another config into this one (other takes priority)
    pub fn merge(&mut self, other: Self) {
        self.server.merge(other.server);
        self.auth.merge(other.auth);
        self.engine.merge(other.engine);
        self.logging.merge(other.logging);
    }

    /// Apply environment variables to configuration
    pub fn apply_env_vars(&mut self) {
        self.server.apply_env_vars();
        self.auth.apply_env_vars();
        self.engine.apply_env_vars();
        self.logging.apply_env_vars();
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<()> {
        self.server.validate()?;
        self.auth.validate()?;
        self.engine.validate()?;
        self.logging.validate()?;
        Ok(())
    }
}
