//! Structured error types for the diff risk engine.
//!
//! The pipeline itself is total; these only surface while building components
//! from configuration, at the CLI boundary, and (isolated, logged) per-file risk.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum EngineError {
  #[error("invalid pattern for {rule}: {pattern:?}: {source}")]
  InvalidPattern {
    rule: String,
    pattern: String,
    #[source]
    source: regex::Error,
  },

  #[error("config: {field}: {reason}")]
  InvalidConfig { field: String, reason: String },

  #[error("risk: {path}: {reason}")]
  Risk { path: String, reason: String },

  #[error("io: {0}")]
  Io(#[from] std::io::Error),

  #[error("json: {0}")]
  Json(#[from] serde_json::Error),
}

impl EngineError {
  pub fn invalid_config(field: &str, reason: impl Into<String>) -> Self {
    Self::InvalidConfig {
      field: field.to_string(),
      reason: reason.into(),
    }
  }

  pub fn invalid_pattern(rule: &str, pattern: &str, source: regex::Error) -> Self {
    Self::InvalidPattern {
      rule: rule.to_string(),
      pattern: pattern.to_string(),
      source,
    }
  }

  pub fn risk(path: &str, reason: impl Into<String>) -> Self {
    Self::Risk {
      path: path.to_string(),
      reason: reason.into(),
    }
  }
}
