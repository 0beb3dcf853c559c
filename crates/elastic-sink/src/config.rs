// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! YAML configuration for the sink engine.

use crate::document::FloatPolicy;
use serde::Deserialize;
use std::path::Path;
use thiserror::Error;

/// Configuration errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("YAML parse error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("index_name is not defined")]
    MissingIndexName,

    #[error("unsupported store major version: {0}")]
    UnsupportedVersion(u32),
}

/// Sink configuration.
///
/// Only the knobs owned by the routing/encoding engine live here.
/// Connection endpoints, TLS, and index-template management belong to the
/// transport layer.
#[derive(Debug, Clone, Deserialize)]
pub struct SinkConfig {
    /// Target index template. Supports date tokens (`%Y %y %m %d %H %V`)
    /// and `{{tag}}` placeholders. Required.
    pub index_name: String,

    /// Value substituted when a tag referenced by `index_name` is missing
    /// from a metric.
    #[serde(default = "default_tag_value")]
    pub default_tag_value: String,

    /// Ingest pipeline template. Same placeholder syntax as `index_name`.
    /// Empty disables pipelines.
    #[serde(default)]
    pub use_pipeline: String,

    /// Pipeline used when a tag referenced by `use_pipeline` is missing.
    /// Empty means the metric is indexed without a pipeline.
    #[serde(default)]
    pub default_pipeline: String,

    /// Handling of NaN and infinite float field values.
    #[serde(default)]
    pub float_handling: FloatPolicy,

    /// Replacement magnitude for `float_handling = "replace"`. NaN and
    /// +inf become this value, -inf its negation.
    #[serde(default)]
    pub float_replacement_value: f64,

    /// Send a deterministic id with every document, so a re-sent point
    /// overwrites instead of duplicating.
    #[serde(default)]
    pub force_document_id: bool,

    /// Budget for one bulk submission, in milliseconds.
    #[serde(default = "default_timeout_ms")]
    pub timeout_ms: u64,
}

fn default_tag_value() -> String {
    "none".to_string()
}

fn default_timeout_ms() -> u64 {
    5000
}

impl SinkConfig {
    /// Create a configuration with the given index template and defaults
    /// for everything else.
    pub fn with_index(index_name: impl Into<String>) -> Self {
        Self {
            index_name: index_name.into(),
            default_tag_value: default_tag_value(),
            use_pipeline: String::new(),
            default_pipeline: String::new(),
            float_handling: FloatPolicy::default(),
            float_replacement_value: 0.0,
            force_document_id: false,
            timeout_ms: default_timeout_ms(),
        }
    }

    /// Parse configuration from a YAML string.
    pub fn from_yaml(yaml: &str) -> Result<Self, ConfigError> {
        let config: SinkConfig = serde_yaml::from_str(yaml)?;
        config.validate()?;
        Ok(config)
    }

    /// Parse configuration from a YAML file.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_yaml(&content)
    }

    /// Validate the configuration.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.index_name.is_empty() {
            return Err(ConfigError::MissingIndexName);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const MINIMAL_YAML: &str = r#"
index_name: "metrics-%Y.%m.%d"
"#;

    const FULL_YAML: &str = r#"
index_name: "metrics-{{host}}-%Y.%m.%d"
default_tag_value: "unknown"
use_pipeline: "{{es_pipeline}}"
default_pipeline: "my_pipeline"
float_handling: "replace"
float_replacement_value: 1.5
force_document_id: true
timeout_ms: 2000
"#;

    #[test]
    fn test_config_parse_minimal_applies_defaults() {
        let config = SinkConfig::from_yaml(MINIMAL_YAML).expect("parse minimal yaml");

        assert_eq!(config.index_name, "metrics-%Y.%m.%d");
        assert_eq!(config.default_tag_value, "none");
        assert_eq!(config.use_pipeline, "");
        assert_eq!(config.default_pipeline, "");
        assert_eq!(config.float_handling, FloatPolicy::None);
        assert_eq!(config.float_replacement_value, 0.0);
        assert!(!config.force_document_id);
        assert_eq!(config.timeout_ms, 5000);
    }

    #[test]
    fn test_config_parse_all_fields() {
        let config = SinkConfig::from_yaml(FULL_YAML).expect("parse full yaml");

        assert_eq!(config.index_name, "metrics-{{host}}-%Y.%m.%d");
        assert_eq!(config.default_tag_value, "unknown");
        assert_eq!(config.use_pipeline, "{{es_pipeline}}");
        assert_eq!(config.default_pipeline, "my_pipeline");
        assert_eq!(config.float_handling, FloatPolicy::Replace);
        assert_eq!(config.float_replacement_value, 1.5);
        assert!(config.force_document_id);
        assert_eq!(config.timeout_ms, 2000);
    }

    #[test]
    fn test_config_missing_index_name_fails_fast() {
        let result = SinkConfig::from_yaml("index_name: \"\"\n");
        assert!(matches!(result, Err(ConfigError::MissingIndexName)));
    }

    #[test]
    fn test_config_invalid_float_handling_rejected() {
        let yaml = "index_name: \"metrics\"\nfloat_handling: \"bogus\"\n";
        assert!(matches!(
            SinkConfig::from_yaml(yaml),
            Err(ConfigError::Yaml(_))
        ));
    }
}
