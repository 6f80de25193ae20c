//! Collector configuration.

use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Invalid configuration JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Invalid configuration value for `{field}`: {reason}")]
    Invalid { field: &'static str, reason: String },
}

/// Settings for [`ProjectStatsCollector`](crate::executor::ProjectStatsCollector).
///
/// Missing fields take their defaults, so `{}` is a valid configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CollectorConfig {
    /// Site root the project pages live under, without a trailing slash
    pub base_url: String,

    /// Major version releases are classified and usage is reported for
    pub target_major: u32,

    /// Maximum number of projects collected at the same time
    pub concurrency_limit: usize,
}

impl Default for CollectorConfig {
    fn default() -> Self {
        Self {
            base_url: "https://www.drupal.org".to_string(),
            target_major: 8,
            concurrency_limit: 4,
        }
    }
}

impl CollectorConfig {
    /// Parses and validates a JSON configuration document.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }

    pub fn with_target_major(mut self, major: u32) -> Self {
        self.target_major = major;
        self
    }

    pub fn with_concurrency_limit(mut self, limit: usize) -> Self {
        self.concurrency_limit = limit;
        self
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.base_url.trim().is_empty() {
            return Err(ConfigError::Invalid {
                field: "base_url",
                reason: "must not be empty".to_string(),
            });
        }
        if self.concurrency_limit == 0 {
            return Err(ConfigError::Invalid {
                field: "concurrency_limit",
                reason: "must be at least 1".to_string(),
            });
        }
        Ok(())
    }

    pub fn project_url(&self, project: &str) -> String {
        format!("{}/project/{}", self.root(), project)
    }

    pub fn usage_url(&self, project: &str) -> String {
        format!("{}/project/usage/{}", self.root(), project)
    }

    fn root(&self) -> &str {
        self.base_url.trim_end_matches('/')
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_from_empty_json() {
        let config = CollectorConfig::from_json("{}").unwrap();
        assert_eq!(config, CollectorConfig::default());
        assert_eq!(config.target_major, 8);
    }

    #[test]
    fn test_partial_json() {
        let config =
            CollectorConfig::from_json(r#"{"target_major": 7, "concurrency_limit": 2}"#).unwrap();
        assert_eq!(config.target_major, 7);
        assert_eq!(config.concurrency_limit, 2);
        assert_eq!(config.base_url, "https://www.drupal.org");
    }

    #[test]
    fn test_rejects_zero_concurrency() {
        let err = CollectorConfig::from_json(r#"{"concurrency_limit": 0}"#).unwrap_err();
        assert!(matches!(
            err,
            ConfigError::Invalid {
                field: "concurrency_limit",
                ..
            }
        ));
        assert!(matches!(
            CollectorConfig::from_json("not json"),
            Err(ConfigError::Json(_))
        ));
    }

    #[test]
    fn test_urls() {
        let config = CollectorConfig::default().with_base_url("http://localhost:8080/");
        assert_eq!(config.project_url("ctools"), "http://localhost:8080/project/ctools");
        assert_eq!(
            config.usage_url("ctools"),
            "http://localhost:8080/project/usage/ctools"
        );
    }
}
