//! Orchestrator: parse -> classify -> assess -> summarize/recommend.

use tracing::debug;

use crate::classifier::ChangeClassifier;
use crate::config::Config;
use crate::error::EngineError;
use crate::parser;
use crate::recommend;
use crate::risk::RiskAssessor;
use crate::summary;
use crate::types::AnalysisReport;

/// The diff analysis engine. Immutable after construction; `analyze` may be
/// called concurrently from any number of threads.
pub struct Engine {
  config: Config,
  classifier: ChangeClassifier,
  assessor: RiskAssessor,
}

impl Engine {
  pub fn new(config: Config) -> Result<Self, EngineError> {
    config.validate()?;
    let classifier = ChangeClassifier::new(&config.classifier)?;
    let assessor = RiskAssessor::new(config.risk.clone())?;
    Ok(Self {
      config,
      classifier,
      assessor,
    })
  }

  pub fn with_defaults() -> Self {
    Self::new(Config::default()).expect("default config is valid")
  }

  pub fn config(&self) -> &Config {
    &self.config
  }

  pub fn classifier(&self) -> &ChangeClassifier {
    &self.classifier
  }

  pub fn assessor(&self) -> &RiskAssessor {
    &self.assessor
  }

  /// Run the full pipeline on diff text. Never fails; empty or malformed
  /// input yields an empty, low-risk report.
  pub fn analyze(&self, diff_text: &str) -> AnalysisReport {
    let parsed = parser::parse(diff_text);
    let files = self.classifier.classify(&parsed);
    let risk = self.assessor.assess(&files);
    let recommendations = recommend::generate(&files, &risk, &self.config.recommendations);
    let summary = summary::summarize(&files, &risk, &self.config.summary);

    let diff_id = diff_id(diff_text);
    debug!(
      %diff_id,
      files = files.len(),
      risk_score = risk.risk_score,
      level = risk.risk_level.as_str(),
      "analysis complete"
    );

    AnalysisReport {
      diff_id,
      change_types: summary.change_types.clone(),
      summary,
      files,
      risk,
      recommendations,
    }
  }
}

/// Stable identifier for a diff: blake3 of the raw text.
pub fn diff_id(diff_text: &str) -> String {
  let hex = blake3::hash(diff_text.as_bytes()).to_hex();
  format!("diff-{}", &hex[..16])
}
