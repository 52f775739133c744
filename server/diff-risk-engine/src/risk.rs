//! Risk assessment: per-file factors averaged into a diff-level score and level.

use tracing::{debug, warn};

use crate::config::{RiskConfig, RiskThresholds};
use crate::error::EngineError;
use crate::language::extension_key;
use crate::types::{
  Classification, ClassifiedFile, FileRisk, RiskAssessment, RiskDetails, RiskFactors, RiskLevel,
};

/// Path reported when a file has neither an old nor a new path.
const UNKNOWN_PATH: &str = "unknown";

pub struct RiskAssessor {
  config: RiskConfig,
}

impl RiskAssessor {
  pub fn new(config: RiskConfig) -> Result<Self, EngineError> {
    config.validate()?;
    Ok(Self { config })
  }

  pub fn with_defaults() -> Self {
    Self {
      config: RiskConfig::default(),
    }
  }

  /// Assess classified files. Never fails: a file whose risk cannot be
  /// computed is logged and contributes a zeroed entry.
  pub fn assess(&self, files: &[ClassifiedFile]) -> RiskAssessment {
    if files.is_empty() {
      return RiskAssessment::empty();
    }

    let file_risks: Vec<FileRisk> = files
      .iter()
      .map(|f| {
        self.file_risk(f).unwrap_or_else(|e| {
          warn!(error = %e, "file risk defaulted");
          FileRisk {
            file_path: f.file.path().unwrap_or(UNKNOWN_PATH).to_string(),
            risk_score: 0.0,
            risk_factors: RiskFactors::default(),
          }
        })
      })
      .collect();

    let risk_score = file_risks.iter().map(|r| r.risk_score).sum::<f64>() / file_risks.len() as f64;
    let risk_level = risk_level(risk_score, &self.config.thresholds);
    debug!(files = file_risks.len(), risk_score, level = risk_level.as_str(), "assessed diff");

    RiskAssessment {
      risk_score,
      risk_level,
      details: RiskDetails {
        total_files: file_risks.len(),
        file_risks,
      },
    }
  }

  /// Mean of the file-type, change-type and size factors for one file.
  pub fn file_risk(&self, file: &ClassifiedFile) -> Result<FileRisk, EngineError> {
    let path = file.file.path();
    let factors = RiskFactors {
      file_type: self.file_type_risk(path),
      change_type: self.change_type_risk(&file.classification),
      size: self.size_risk(file.file.total_changes()),
    };
    let file_path = path.unwrap_or(UNKNOWN_PATH);

    for (name, value) in [
      ("fileType", factors.file_type),
      ("changeType", factors.change_type),
      ("size", factors.size),
    ] {
      if !value.is_finite() {
        return Err(EngineError::risk(
          file_path,
          format!("{} factor is not a finite number", name),
        ));
      }
    }

    Ok(FileRisk {
      file_path: file_path.to_string(),
      risk_score: (factors.file_type + factors.change_type + factors.size) / 3.0,
      risk_factors: factors,
    })
  }

  pub fn file_type_risk(&self, path: Option<&str>) -> f64 {
    let Some(path) = path else {
      return self.config.missing_path_risk;
    };
    let ext = extension_key(path);
    self
      .config
      .file_types
      .iter()
      .find(|group| group.extensions.iter().any(|e| e.eq_ignore_ascii_case(&ext)))
      .map_or(self.config.unknown_file_type_risk, |group| group.risk)
      .clamp(0.0, 1.0)
  }

  /// Base risk for the label, pulled toward the midpoint when confidence is low.
  pub fn change_type_risk(&self, classification: &Classification) -> f64 {
    let base = self
      .config
      .change_types
      .get(classification.change_type.risk_key())
      .copied()
      .unwrap_or(self.config.default_change_type_risk);
    let confidence = classification.confidence.clamp(0.0, 1.0);
    (base * (0.5 + confidence * 0.5)).clamp(0.0, 1.0)
  }

  pub fn size_risk(&self, total_changes: u32) -> f64 {
    self
      .config
      .size_steps
      .iter()
      .find(|step| total_changes <= step.max_changes)
      .map_or(self.config.oversize_risk, |step| step.risk)
      .clamp(0.0, 1.0)
  }
}

/// Threshold bands; a score on a boundary lands in the higher band.
pub fn risk_level(score: f64, thresholds: &RiskThresholds) -> RiskLevel {
  if score >= thresholds.high {
    RiskLevel::High
  } else if score >= thresholds.medium {
    RiskLevel::Medium
  } else {
    RiskLevel::Low
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::types::{ChangeType, ClassificationDetails, FileChange, FileStatus, DEV_NULL};

  fn classified(path: &str, change_type: ChangeType, confidence: f64, churn: u32) -> ClassifiedFile {
    let mut file = FileChange::new(path, path, FileStatus::Modified);
    file.additions = churn;
    ClassifiedFile {
      file,
      classification: Classification::new(change_type, confidence, ClassificationDetails::default()),
    }
  }

  fn approx(a: f64, b: f64) -> bool {
    (a - b).abs() < 1e-9
  }

  #[test]
  fn empty_input_is_low_zero() {
    let a = RiskAssessor::with_defaults().assess(&[]);
    assert_eq!(a.risk_score, 0.0);
    assert_eq!(a.risk_level, RiskLevel::Low);
    assert!(a.details.file_risks.is_empty());
  }

  #[test]
  fn file_type_table() {
    let r = RiskAssessor::with_defaults();
    assert!(approx(r.file_type_risk(Some("src/main.rs")), 0.8));
    assert!(approx(r.file_type_risk(Some("App.TSX")), 0.8));
    assert!(approx(r.file_type_risk(Some("config/app.yaml")), 0.5));
    assert!(approx(r.file_type_risk(Some("README.md")), 0.2));
    assert!(approx(r.file_type_risk(Some("docker/Dockerfile")), 0.2));
    assert!(approx(r.file_type_risk(Some(".gitignore")), 0.2));
    assert!(approx(r.file_type_risk(Some("logo.svg")), 0.3));
    assert!(approx(r.file_type_risk(None), 0.1));
  }

  #[test]
  fn change_type_risk_scales_with_confidence() {
    let r = RiskAssessor::with_defaults();
    let c = |t, conf| Classification::new(t, conf, ClassificationDetails::default());
    assert!(approx(r.change_type_risk(&c(ChangeType::Feature, 1.0)), 0.7));
    assert!(approx(r.change_type_risk(&c(ChangeType::Feature, 0.0)), 0.35));
    assert!(approx(r.change_type_risk(&c(ChangeType::SecurityFix, 1.0)), 0.9));
    assert!(approx(r.change_type_risk(&c(ChangeType::PerformanceOptimization, 0.5)), 0.6));
    assert!(approx(r.change_type_risk(&c(ChangeType::NoChange, 1.0)), 0.5));
    assert!(approx(r.change_type_risk(&c(ChangeType::Documentation, 0.8)), 0.09));
  }

  #[test]
  fn size_steps() {
    let r = RiskAssessor::with_defaults();
    let cases = [(0, 0.1), (1, 0.3), (10, 0.3), (11, 0.6), (50, 0.6), (100, 0.8), (101, 0.9)];
    for (changes, expected) in cases {
      assert!(approx(r.size_risk(changes), expected), "{} changes", changes);
    }
  }

  #[test]
  fn file_score_is_mean_of_factors_and_diff_score_is_mean_of_files() {
    let r = RiskAssessor::with_defaults();
    let files = vec![
      // 0.8 + 0.7 + 0.3 -> 0.6
      classified("a.ts", ChangeType::Feature, 1.0, 5),
      // 0.2 + 0.05 + 0.1 -> 0.1166..
      classified("b.md", ChangeType::Documentation, 0.0, 0),
    ];
    let a = r.assess(&files);
    assert!(approx(a.details.file_risks[0].risk_score, 0.6));
    assert!(approx(a.details.file_risks[1].risk_score, 0.35 / 3.0));
    assert!(approx(a.risk_score, (0.6 + 0.35 / 3.0) / 2.0));
    assert_eq!(a.risk_level, RiskLevel::Low);
    assert_eq!(a.details.total_files, 2);
  }

  #[test]
  fn thresholds_round_up_on_boundaries() {
    let t = RiskThresholds::default();
    assert_eq!(risk_level(0.75, &t), RiskLevel::High);
    assert_eq!(risk_level(0.7, &t), RiskLevel::High);
    assert_eq!(risk_level(0.4, &t), RiskLevel::Medium);
    assert_eq!(risk_level(0.39, &t), RiskLevel::Low);
  }

  #[test]
  fn deleted_file_is_assessed_by_old_path() {
    let mut cf = classified("old.go", ChangeType::Other, 0.3, 3);
    cf.file.new_path = DEV_NULL.into();
    let risk = RiskAssessor::with_defaults().file_risk(&cf).unwrap();
    assert_eq!(risk.file_path, "old.go");
    assert!(approx(risk.risk_factors.file_type, 0.8));
  }

  #[test]
  fn non_finite_confidence_is_isolated() {
    let files = vec![
      classified("a.rs", ChangeType::Feature, f64::NAN, 5),
      classified("b.rs", ChangeType::Feature, 1.0, 5),
    ];
    let r = RiskAssessor::with_defaults();
    assert!(r.file_risk(&files[0]).is_err());

    let a = r.assess(&files);
    assert_eq!(a.details.file_risks.len(), 2);
    assert_eq!(a.details.file_risks[0].file_path, "a.rs");
    assert_eq!(a.details.file_risks[0].risk_score, 0.0);
    assert!(approx(a.risk_score, 0.6 / 2.0));
  }

  #[test]
  fn saturated_counters_score_as_oversize() {
    let mut cf = classified("huge.rs", ChangeType::Feature, 1.0, u32::MAX);
    cf.file.deletions = 1;
    let a = RiskAssessor::with_defaults().assess(&[cf]);
    assert!(approx(a.details.file_risks[0].risk_factors.size, 0.9));
    assert!((0.0..=1.0).contains(&a.risk_score));
  }

  #[test]
  fn custom_config_is_validated() {
    let mut config = RiskConfig::default();
    config.oversize_risk = -0.5;
    assert!(RiskAssessor::new(config).is_err());
  }
}
