//! Generic keyword-rule evaluator shared by every language strategy.

use regex::{Regex, RegexBuilder};

use crate::config::{ClassifierConfig, FallbackConfig};
use crate::error::EngineError;
use crate::types::{ChangeType, Classification, ClassificationDetails, FileChange};

struct Category {
  change_type: ChangeType,
  patterns: Vec<Regex>,
}

/// Compiled category table plus the no-match fallback heuristics.
pub(crate) struct GenericRules {
  categories: Vec<Category>,
  max_confidence: f64,
  fallback: FallbackConfig,
}

impl GenericRules {
  pub(crate) fn compile(config: &ClassifierConfig) -> Result<Self, EngineError> {
    let categories = config
      .categories
      .iter()
      .map(|rule| {
        let patterns = rule
          .patterns
          .iter()
          .map(|p| {
            RegexBuilder::new(p)
              .case_insensitive(true)
              .build()
              .map_err(|e| EngineError::invalid_pattern(rule.change_type.as_str(), p, e))
          })
          .collect::<Result<Vec<_>, _>>()?;
        Ok(Category {
          change_type: rule.change_type,
          patterns,
        })
      })
      .collect::<Result<Vec<_>, EngineError>>()?;

    Ok(Self {
      categories,
      max_confidence: config.max_pattern_confidence,
      fallback: config.fallback.clone(),
    })
  }

  pub(crate) fn evaluate(&self, file: &FileChange) -> Classification {
    // Counters that claim changes with nothing to back them cannot be judged.
    if file.hunks.is_empty() && file.total_changes() > 0 {
      return Classification::unknown();
    }

    let details = extract_details(file);
    if details.total_changes == 0 {
      return Classification::new(ChangeType::NoChange, 1.0, details);
    }

    // Strictly greater keeps the earlier category on ties.
    let mut best: Option<(ChangeType, usize)> = None;
    for category in &self.categories {
      let score = category
        .patterns
        .iter()
        .filter(|p| p.is_match(&details.content))
        .count();
      if score > best.map_or(0, |(_, s)| s) {
        best = Some((category.change_type, score));
      }
    }

    let (change_type, confidence) = match best {
      Some((change_type, score)) => (change_type, (score as f64 / 2.0).min(self.max_confidence)),
      None => self.fallback_label(&details),
    };
    Classification::new(change_type, confidence, details)
  }

  fn fallback_label(&self, details: &ClassificationDetails) -> (ChangeType, f64) {
    let content = &details.content;
    let mentions = |idioms: &[String]| idioms.iter().any(|i| content.contains(i.as_str()));

    if mentions(&self.fallback.validation_idioms) || details.added_lines > details.removed_lines {
      (ChangeType::BugFix, self.fallback.heuristic_confidence)
    } else if mentions(&self.fallback.declaration_idioms) {
      (ChangeType::Feature, self.fallback.heuristic_confidence)
    } else {
      (ChangeType::Other, self.fallback.other_confidence)
    }
  }
}

/// Count changed lines and join their bodies (marker stripped) with newlines.
pub(crate) fn extract_details(file: &FileChange) -> ClassificationDetails {
  let mut added_lines = 0;
  let mut removed_lines = 0;
  let mut bodies = Vec::new();
  for line in file.changed_lines() {
    if line.starts_with('+') {
      added_lines += 1;
    } else {
      removed_lines += 1;
    }
    bodies.push(&line[1..]);
  }
  ClassificationDetails {
    added_lines,
    removed_lines,
    total_changes: added_lines + removed_lines,
    content: bodies.join("\n"),
  }
}
