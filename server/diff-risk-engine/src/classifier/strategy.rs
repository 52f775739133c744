//! Language strategies: extra rule sets layered on the generic result.

use regex::Regex;

use crate::config::{IssueRule, LanguageRules};
use crate::error::EngineError;
use crate::types::{ChangeType, Classification, FileIssue};

struct Rule {
  name: String,
  pattern: Regex,
  change_type: ChangeType,
  confidence: f64,
}

struct IssueCheck {
  pattern: Regex,
  rule: IssueRule,
}

impl IssueCheck {
  fn detect(&self, content: &str) -> Option<FileIssue> {
    let hits = self.pattern.find_iter(content).take(self.rule.min_matches).count();
    (hits >= self.rule.min_matches).then(|| FileIssue {
      kind: self.rule.name.clone(),
      category: self.rule.category,
      severity: self.rule.severity,
      message: self.rule.message.clone(),
      suggestion: self.rule.suggestion.clone(),
    })
  }
}

pub(crate) struct LanguageStrategy {
  rules: Vec<Rule>,
  issues: Vec<IssueCheck>,
  boost: f64,
  cap: f64,
}

impl LanguageStrategy {
  pub(crate) fn compile(language: &str, config: &LanguageRules) -> Result<Self, EngineError> {
    let rules = config
      .rules
      .iter()
      .map(|r| {
        let pattern = Regex::new(&r.pattern).map_err(|e| {
          EngineError::invalid_pattern(&format!("{}:{}", language, r.name), &r.pattern, e)
        })?;
        Ok(Rule {
          name: r.name.clone(),
          pattern,
          change_type: r.change_type,
          confidence: r.confidence,
        })
      })
      .collect::<Result<Vec<_>, EngineError>>()?;

    let issues = config
      .issues
      .iter()
      .map(|r| {
        let pattern = Regex::new(&r.pattern).map_err(|e| {
          EngineError::invalid_pattern(&format!("{}:issue:{}", language, r.name), &r.pattern, e)
        })?;
        Ok(IssueCheck {
          pattern,
          rule: r.clone(),
        })
      })
      .collect::<Result<Vec<_>, EngineError>>()?;

    Ok(Self {
      rules,
      issues,
      boost: config.boost,
      cap: config.cap,
    })
  }

  /// Combine language evidence with the generic classification.
  ///
  /// Issue checks are reported whatever the label. Every matching rule
  /// becomes a signal. When the first match names a different label with
  /// more confidence than the generic result, it takes over; otherwise the
  /// generic confidence is boosted (capped).
  pub(crate) fn refine(&self, generic: Classification) -> Classification {
    if generic.change_type.is_terminal() {
      return generic;
    }

    let mut out = generic;
    let issues = self.detect_issues(&out.details.content);
    out.issues.extend(issues);

    let matched: Vec<&Rule> = self
      .rules
      .iter()
      .filter(|r| r.pattern.is_match(&out.details.content))
      .collect();
    let Some(first) = matched.first() else {
      return out;
    };

    if first.change_type != out.change_type && first.confidence > out.confidence {
      out.change_type = first.change_type;
      out.confidence = first.confidence.min(self.cap);
    } else {
      out.confidence = (out.confidence + self.boost).min(self.cap).max(out.confidence);
    }
    out
      .signals
      .extend(matched.iter().map(|r| r.name.clone()));
    out
  }

  fn detect_issues(&self, content: &str) -> Vec<FileIssue> {
    self.issues.iter().filter_map(|c| c.detect(content)).collect()
  }
}
