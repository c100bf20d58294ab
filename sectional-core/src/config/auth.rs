//! Admin authentication configuration

use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::env;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AuthConfig {
    /// Bearer token required on mutating routes. Unset means open mode:
    /// no authentication is enforced at all.
    /// Env: SC_ADMIN_TOKEN
    /// Default: None
    pub admin_token: Option<String>,
}

impl AuthConfig {
    /// Merge another config into this one (other takes priority)
    pub fn merge(&mut self, other: Self) {
        if other.admin_token.is_some() {
            self.admin_token = other.admin_token;
        }
    }

    /// Apply environment variables
    pub fn apply_env_vars(&mut self) {
        if let Ok(token) = env::var("SC_ADMIN_TOKEN") {
            self.admin_token = Some(token);
        }
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<()> {
        if let Some(token) = &self.admin_token {
            if token.is_empty() {
                anyhow::bail!("Invalid admin_token: set a non-empty token or remove it entirely");
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_open_mode() {
        let cfg = AuthConfig::default();
        assert!(cfg.admin_token.is_none());
        assert!(cfg.validate().is_ok());
    }

    #[test]
    fn test_empty_token_fails_validation() {
        let cfg = AuthConfig { admin_token: Some(String::new()) };
        assert!(cfg.validate().is_err());
    }

    #[test]
    fn test_merge_keeps_base_token_when_other_is_unset() {
        let mut base = AuthConfig { admin_token: Some("keep".to_string()) };
        base.merge(AuthConfig::default());
        assert_eq!(base.admin_token.as_deref(), Some("keep"));
    }
}
