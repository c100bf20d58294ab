//! Engine configuration: which namespaces get a route set

use anyhow::{bail, Result};
use serde::{Deserialize, Serialize};
use std::env;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EngineConfig {
    /// Namespace prefixes, each mounted with its own independent store
    /// Env: SC_NAMESPACES (comma-separated)
    /// Default: ["sections", "kids-sections"]
    pub namespaces: Vec<String>,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self { namespaces: vec!["sections".to_string(), "kids-sections".to_string()] }
    }
}

impl EngineConfig {
    /// Merge another config into this one (other takes priority)
    pub fn merge(&mut self, other: Self) {
        self.namespaces = other.namespaces;
    }

    /// Apply environment variables
    pub fn apply_env_vars(&mut self) {
        if let Ok(raw) = env::var("SC_NAMESPACES") {
            self.namespaces = raw
                .split(',')
                .map(|s| s.trim().to_string())
                .filter(|s| !s.is_empty())
                .collect();
        }
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<()> {
        if self.namespaces.is_empty() {
            bail!("Invalid namespaces: at least one namespace is required");
        }

        for ns in &self.namespaces {
            let trimmed = ns.trim_matches('/');
            if trimmed.is_empty() {
                bail!("Invalid namespace: empty prefix");
            }
            if trimmed.contains('/') {
                bail!("Invalid namespace {}: prefix must be a single path segment", ns);
            }
            if trimmed == "health" {
                bail!("Invalid namespace: \"health\" is reserved");
            }
        }

        let mut seen = std::collections::HashSet::new();
        for ns in &self.namespaces {
            if !seen.insert(ns.trim_matches('/')) {
                bail!("Invalid namespaces: duplicate prefix {}", ns);
            }
        }

        Ok(())
    }
}
