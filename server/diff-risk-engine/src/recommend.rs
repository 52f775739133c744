//! Prioritized, human-readable review recommendations.

use std::collections::BTreeSet;

use crate::config::RecommendationConfig;
use crate::types::{
  ChangeType, ClassifiedFile, Priority, Recommendation, RecommendationKind, RiskAssessment,
  Severity,
};

fn rec(kind: RecommendationKind, priority: Priority, message: String, category: &str) -> Recommendation {
  Recommendation {
    kind,
    priority,
    message,
    category: category.to_string(),
    file_path: None,
  }
}

fn issue_priority(severity: Severity) -> Priority {
  match severity {
    Severity::Critical | Severity::High => Priority::High,
    Severity::Medium => Priority::Medium,
    Severity::Low => Priority::Low,
  }
}

/// Recommendations from change types, risk and diff size, highest priority first.
pub fn generate(
  files: &[ClassifiedFile],
  risk: &RiskAssessment,
  config: &RecommendationConfig,
) -> Vec<Recommendation> {
  use Priority::*;
  use RecommendationKind::*;

  let present: BTreeSet<ChangeType> = files
    .iter()
    .map(|f| f.classification.change_type)
    .collect();
  let mut out = Vec::new();

  for change_type in &present {
    let (priority, message, category) = match change_type {
      ChangeType::BugFix => (
        High,
        "Bug fix detected. Ensure proper test coverage for the fixed issue.",
        "testing",
      ),
      ChangeType::Feature => (
        Medium,
        "New feature added. Verify documentation and error handling.",
        "documentation",
      ),
      ChangeType::Refactor => (
        Medium,
        "Code refactoring detected. Ensure no functional changes were introduced.",
        "testing",
      ),
      ChangeType::SecurityFix => (
        High,
        "Security-sensitive change detected. Request a security-focused review.",
        "security",
      ),
      ChangeType::PerformanceOptimization => (
        Medium,
        "Performance-related change detected. Benchmark before and after merging.",
        "performance",
      ),
      ChangeType::Dependency => (
        Medium,
        "Dependency manifest changed. Review version bumps and audit new packages.",
        "dependencies",
      ),
      _ => continue,
    };
    out.push(rec(Review, priority, message.to_string(), category));
  }

  for f in files {
    let path = f.file.path().unwrap_or("unknown");
    for issue in &f.classification.issues {
      if issue.severity < config.issue_severity {
        continue;
      }
      out.push(Recommendation {
        kind: Warning,
        priority: issue_priority(issue.severity),
        message: format!("{}: {}. {}.", path, issue.message, issue.suggestion),
        category: issue.category.as_str().to_string(),
        file_path: Some(path.to_string()),
      });
    }
  }

  let percent = (risk.risk_score * 100.0).round();
  if risk.risk_score > config.warn_above {
    out.push(rec(
      Warning,
      High,
      format!("High risk score ({}%). Requires thorough review.", percent),
      "risk",
    ));
  } else if risk.risk_score > config.note_above {
    out.push(rec(
      Info,
      Medium,
      format!("Medium risk score ({}%). Standard review recommended.", percent),
      "risk",
    ));
  }

  if files.len() > config.large_diff_files {
    out.push(rec(
      Info,
      Low,
      format!(
        "Large diff detected (>{} files). Consider breaking into smaller PRs.",
        config.large_diff_files
      ),
      "process",
    ));
  }

  // Stable: equal priorities keep generation order.
  out.sort_by_key(|r| r.priority);
  out
}
