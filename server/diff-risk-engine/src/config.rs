//! Engine configuration with sane defaults.
//!
//! One struct per component, injected at construction time. Structs
//! deserialize with `#[serde(default)]` (language rule blocks merge over their
//! own built-ins), so a partial JSON document only overrides the fields it names.

use serde::{Deserialize, Deserializer, Serialize};
use std::collections::BTreeMap;
use std::path::Path;

use crate::error::EngineError;
use crate::types::{ChangeType, IssueCategory, Severity};

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Config {
  pub classifier: ClassifierConfig,
  pub risk: RiskConfig,
  pub recommendations: RecommendationConfig,
  pub summary: SummaryConfig,
}

impl Config {
  pub fn from_json_str(raw: &str) -> Result<Self, EngineError> {
    let config: Config = serde_json::from_str(raw)?;
    config.validate()?;
    Ok(config)
  }

  pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self, EngineError> {
    let raw = std::fs::read_to_string(path)?;
    Self::from_json_str(&raw)
  }

  pub fn validate(&self) -> Result<(), EngineError> {
    self.classifier.validate()?;
    self.risk.validate()?;
    self.recommendations.validate()?;
    Ok(())
  }
}

fn check_unit(field: &str, value: f64) -> Result<(), EngineError> {
  if value.is_finite() && (0.0..=1.0).contains(&value) {
    Ok(())
  } else {
    Err(EngineError::invalid_config(field, format!("{} is outside 0..=1", value)))
  }
}

// ---------------------------------------------------------------------------
// Classifier
// ---------------------------------------------------------------------------

/// Keyword patterns for one change category. Category order is the tie-break.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CategoryRule {
  pub change_type: ChangeType,
  pub patterns: Vec<String>,
}

impl CategoryRule {
  fn new(change_type: ChangeType, patterns: &[&str]) -> Self {
    Self {
      change_type,
      patterns: patterns.iter().map(|p| p.to_string()).collect(),
    }
  }
}

/// Heuristics applied when no category pattern matched.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct FallbackConfig {
  /// Substrings suggesting null checks or validation (-> bug_fix).
  pub validation_idioms: Vec<String>,
  /// Substrings suggesting new declarations (-> feature).
  pub declaration_idioms: Vec<String>,
  /// Confidence of a heuristic bug_fix or feature label.
  pub heuristic_confidence: f64,
  /// Confidence of the `other` label.
  pub other_confidence: f64,
}

impl Default for FallbackConfig {
  fn default() -> Self {
    Self {
      validation_idioms: ["|| 0", "||", "validate", "check"]
        .iter()
        .map(|s| s.to_string())
        .collect(),
      declaration_idioms: ["function ", "const ", "let ", "var "]
        .iter()
        .map(|s| s.to_string())
        .collect(),
      heuristic_confidence: 0.4,
      other_confidence: 0.3,
    }
  }
}

/// One language-specific rule (case-sensitive regex over changed content).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LanguageRule {
  pub name: String,
  pub pattern: String,
  pub change_type: ChangeType,
  pub confidence: f64,
}

impl LanguageRule {
  fn new(name: &str, pattern: &str, change_type: ChangeType, confidence: f64) -> Self {
    Self {
      name: name.to_string(),
      pattern: pattern.to_string(),
      change_type,
      confidence,
    }
  }
}

/// Pattern-triggered finding reported with the classification.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IssueRule {
  pub name: String,
  pub pattern: String,
  pub category: IssueCategory,
  pub severity: Severity,
  pub message: String,
  pub suggestion: String,
  /// Matches needed before the issue is reported.
  #[serde(default = "one")]
  pub min_matches: usize,
}

fn one() -> usize {
  1
}

impl IssueRule {
  fn new(
    name: &str,
    pattern: &str,
    category: IssueCategory,
    severity: Severity,
    message: &str,
    suggestion: &str,
  ) -> Self {
    Self {
      name: name.to_string(),
      pattern: pattern.to_string(),
      category,
      severity,
      message: message.to_string(),
      suggestion: suggestion.to_string(),
      min_matches: 1,
    }
  }

  fn at_least(mut self, min_matches: usize) -> Self {
    self.min_matches = min_matches;
    self
  }
}

/// Extra rules layered on the generic result for one language.
///
/// Has no `Default`: a partial JSON block is merged over the built-in set
/// of the language it configures (see `LanguageRulesOverride`).
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LanguageRules {
  /// Confidence delta when the language evidence supports the generic label.
  pub boost: f64,
  /// Upper bound for any refined confidence.
  pub cap: f64,
  /// Ordered; the first matching rule decides.
  pub rules: Vec<LanguageRule>,
  /// Checked independently of the label; every match is reported.
  pub issues: Vec<IssueRule>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct LanguageRulesOverride {
  boost: Option<f64>,
  cap: Option<f64>,
  rules: Option<Vec<LanguageRule>>,
  issues: Option<Vec<IssueRule>>,
}

impl LanguageRulesOverride {
  fn apply(self, base: LanguageRules) -> LanguageRules {
    LanguageRules {
      boost: self.boost.unwrap_or(base.boost),
      cap: self.cap.unwrap_or(base.cap),
      rules: self.rules.unwrap_or(base.rules),
      issues: self.issues.unwrap_or(base.issues),
    }
  }
}

fn typescript_overrides<'de, D: Deserializer<'de>>(d: D) -> Result<LanguageRules, D::Error> {
  LanguageRulesOverride::deserialize(d).map(|o| o.apply(LanguageRules::typescript()))
}

fn go_overrides<'de, D: Deserializer<'de>>(d: D) -> Result<LanguageRules, D::Error> {
  LanguageRulesOverride::deserialize(d).map(|o| o.apply(LanguageRules::go()))
}

impl LanguageRules {
  pub fn typescript() -> Self {
    use ChangeType::*;
    use IssueCategory::*;
    Self {
      boost: 0.2,
      cap: 0.95,
      rules: vec![
        LanguageRule::new("unsafe-type-assertion", r"\bas\s+any\b|<any>", SecurityFix, 0.6),
        LanguageRule::new("react-props", r"React\.FC<|interface\s+\w+Props\b", Feature, 0.75),
        LanguageRule::new("interface", r"\binterface\s+\w+", Feature, 0.6),
        LanguageRule::new("type-alias", r"\btype\s+\w+\s*=", Feature, 0.6),
        LanguageRule::new("optional-chaining", r"\?\.|\?\?", BugFix, 0.5),
        LanguageRule::new(
          "type-annotation",
          r":\s*(string|number|boolean|unknown|void|never)\b",
          Refactor,
          0.5,
        ),
      ],
      issues: vec![
        IssueRule::new(
          "unsafe-type-assertion",
          r"\bas\s+any\b|<any>",
          Security,
          Severity::Medium,
          "Unsafe type assertion detected (as any or <any>)",
          "Use proper type guards or specific types instead of any",
        ),
        IssueRule::new(
          "missing-type-annotation",
          r":\s*(any|Object)\b",
          Security,
          Severity::Low,
          "Missing or unsafe type annotations detected",
          "Add proper type annotations to improve type safety",
        ),
        IssueRule::new(
          "complex-generics",
          r"<\w+>",
          Performance,
          Severity::Low,
          "Complex generic usage detected",
          "Consider simplifying generic types for better compilation performance",
        )
        .at_least(6),
      ],
    }
  }

  pub fn go() -> Self {
    use ChangeType::*;
    use IssueCategory::Security;
    Self {
      boost: 0.1,
      cap: 0.95,
      rules: vec![
        LanguageRule::new("goroutine", r"\bgo\s+\w+(\.\w+)*\s*\(", PerformanceOptimization, 0.7),
        LanguageRule::new("interface", r"type\s+\w+\s+interface\s*\{", Feature, 0.8),
        LanguageRule::new(
          "http-handler",
          r"func\s+\w+\s*\(\s*\w+\s+http\.ResponseWriter,\s*\w+\s+\*http\.Request\s*\)",
          Feature,
          0.8,
        ),
        LanguageRule::new("method", r"func\s+\(\w+\s+\*?\w+\)\s+\w+\s*\(", Feature, 0.7),
        LanguageRule::new("struct", r"type\s+\w+\s+struct\s*\{", Feature, 0.7),
        LanguageRule::new("tls", r"https://|tls\.Config|crypto/tls", SecurityFix, 0.9),
        LanguageRule::new("buffer-pooling", r"sync\.Pool|bytes\.NewBuffer\(", PerformanceOptimization, 0.8),
        LanguageRule::new("context", r"context\.Context", Feature, 0.6),
      ],
      issues: vec![
        IssueRule::new(
          "command-injection",
          r"exec\.Command\(|os\.Exec\(|syscall\.Exec\(|sh -c|bash -c",
          Security,
          Severity::Critical,
          "Potential command injection vulnerability detected",
          "Validate or sanitize all user input before passing it to exec.Command()",
        ),
        IssueRule::new(
          "path-traversal",
          r"(?:filepath|path)\.Join\([^)]*\.\.\.[^)]*\)|/\.\./",
          Security,
          Severity::High,
          "Potential path traversal vulnerability detected",
          "Use filepath.Clean() and validate paths against allowed directories",
        ),
        IssueRule::new(
          "insecure-random",
          r"math\.Rand\(|rand\.New\(rand\.NewSource\(",
          Security,
          Severity::Medium,
          "Insecure random number generation detected",
          "Use crypto/rand instead of math/rand for security-sensitive values",
        ),
        IssueRule::new(
          "hardcoded-secret",
          r#"(?:password|secret)\s*(?::=|=|:)\s*["'`][^"'`]{8,}["'`]|(?:apiKey|token)\s*(?::=|=|:)\s*["'`][A-Za-z0-9]{20,}["'`]"#,
          Security,
          Severity::High,
          "Hardcoded credentials or secrets detected",
          "Move secrets to environment variables or a secrets manager",
        ),
        IssueRule::new(
          "insecure-http-client",
          r"http\.Get\(|http\.Post\(|&http\.Client\{\}|http\.DefaultClient",
          Security,
          Severity::Medium,
          "HTTP client without timeouts or TLS settings detected",
          "Use an http.Client with explicit timeouts and a configured Transport",
        ),
      ],
    }
  }

  fn validate(&self, field: &str) -> Result<(), EngineError> {
    check_unit(&format!("{}.boost", field), self.boost)?;
    check_unit(&format!("{}.cap", field), self.cap)?;
    for rule in &self.rules {
      check_unit(&format!("{}.rules[{}].confidence", field, rule.name), rule.confidence)?;
    }
    for issue in &self.issues {
      if issue.min_matches == 0 {
        return Err(EngineError::invalid_config(
          &format!("{}.issues[{}].minMatches", field, issue.name),
          "must be at least 1",
        ));
      }
    }
    Ok(())
  }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ClassifierConfig {
  /// Ordered category rules (case-insensitive regexes).
  pub categories: Vec<CategoryRule>,
  /// Ceiling for pattern-derived confidence (`min(max, score / 2)`).
  pub max_pattern_confidence: f64,
  pub fallback: FallbackConfig,
  /// Apply language strategies and manifest detection when classifying a diff.
  pub language_aware: bool,
  /// Fields named in JSON replace the built-in TypeScript values; the rest are kept.
  #[serde(default = "LanguageRules::typescript", deserialize_with = "typescript_overrides")]
  pub typescript: LanguageRules,
  #[serde(default = "LanguageRules::go", deserialize_with = "go_overrides")]
  pub go: LanguageRules,
  /// File names (case-insensitive) treated as dependency manifests.
  pub dependency_manifests: Vec<String>,
  pub dependency_confidence: f64,
}

impl Default for ClassifierConfig {
  fn default() -> Self {
    use ChangeType::*;
    Self {
      categories: vec![
        CategoryRule::new(
          BugFix,
          &["fix", "bug", "error", r"handle.*null", "boundary", r"edge.*case", "defensive", "validate"],
        ),
        CategoryRule::new(
          Feature,
          &["add", "new", "implement", "create", "feature", "support", "introduce"],
        ),
        CategoryRule::new(
          Refactor,
          &["refactor", "rename", "restructure", "cleanup", "improve", "optimize", "performance"],
        ),
        CategoryRule::new(Documentation, &["doc", "comment", "readme", "documentation", "typo"]),
        CategoryRule::new(Test, &["test", "spec", "assert", "jest", "mocha", "chai"]),
      ],
      max_pattern_confidence: 0.9,
      fallback: FallbackConfig::default(),
      language_aware: true,
      typescript: LanguageRules::typescript(),
      go: LanguageRules::go(),
      dependency_manifests: [
        "package.json",
        "package-lock.json",
        "yarn.lock",
        "pnpm-lock.yaml",
        "cargo.toml",
        "cargo.lock",
        "go.mod",
        "go.sum",
        "requirements.txt",
        "pipfile.lock",
        "poetry.lock",
        "gemfile.lock",
        "pom.xml",
        "build.gradle",
      ]
      .iter()
      .map(|s| s.to_string())
      .collect(),
      dependency_confidence: 0.8,
    }
  }
}

impl ClassifierConfig {
  pub fn validate(&self) -> Result<(), EngineError> {
    check_unit("classifier.maxPatternConfidence", self.max_pattern_confidence)?;
    check_unit("classifier.fallback.heuristicConfidence", self.fallback.heuristic_confidence)?;
    check_unit("classifier.fallback.otherConfidence", self.fallback.other_confidence)?;
    check_unit("classifier.dependencyConfidence", self.dependency_confidence)?;
    self.typescript.validate("classifier.typescript")?;
    self.go.validate("classifier.go")?;
    Ok(())
  }
}

// ---------------------------------------------------------------------------
// Risk
// ---------------------------------------------------------------------------

/// Risk for a group of file extensions.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExtensionRisk {
  pub extensions: Vec<String>,
  pub risk: f64,
}

/// Size risk applies to change counts up to and including `max_changes`.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SizeStep {
  pub max_changes: u32,
  pub risk: f64,
}

/// Score cut-offs; a score equal to a boundary lands in the higher band.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct RiskThresholds {
  pub high: f64,
  pub medium: f64,
}

impl Default for RiskThresholds {
  fn default() -> Self {
    Self {
      high: 0.7,
      medium: 0.4,
    }
  }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct RiskConfig {
  /// Checked in order; first group containing the extension wins.
  pub file_types: Vec<ExtensionRisk>,
  pub unknown_file_type_risk: f64,
  pub missing_path_risk: f64,
  /// Base risk keyed by change-type risk key (`bug_fix`, `security`, ...).
  pub change_types: BTreeMap<String, f64>,
  pub default_change_type_risk: f64,
  /// Ascending by `max_changes`.
  pub size_steps: Vec<SizeStep>,
  pub oversize_risk: f64,
  pub thresholds: RiskThresholds,
}

impl Default for RiskConfig {
  fn default() -> Self {
    let group = |exts: &[&str], risk: f64| ExtensionRisk {
      extensions: exts.iter().map(|e| e.to_string()).collect(),
      risk,
    };
    Self {
      file_types: vec![
        group(&["js", "ts", "jsx", "tsx", "py", "java", "go", "rs"], 0.8),
        group(&["json", "yml", "yaml", "xml", "html", "css"], 0.5),
        group(&["md", "txt", "gitignore", "dockerfile"], 0.2),
      ],
      unknown_file_type_risk: 0.3,
      missing_path_risk: 0.1,
      change_types: [
        ("bug_fix", 0.3),
        ("feature", 0.7),
        ("refactor", 0.6),
        ("security", 0.9),
        ("performance", 0.8),
        ("dependency", 0.7),
        ("documentation", 0.1),
        ("test", 0.2),
        ("other", 0.4),
        ("unknown", 0.5),
      ]
      .iter()
      .map(|(k, v)| (k.to_string(), *v))
      .collect(),
      default_change_type_risk: 0.5,
      size_steps: vec![
        SizeStep { max_changes: 0, risk: 0.1 },
        SizeStep { max_changes: 10, risk: 0.3 },
        SizeStep { max_changes: 50, risk: 0.6 },
        SizeStep { max_changes: 100, risk: 0.8 },
      ],
      oversize_risk: 0.9,
      thresholds: RiskThresholds::default(),
    }
  }
}

impl RiskConfig {
  pub fn validate(&self) -> Result<(), EngineError> {
    for group in &self.file_types {
      check_unit("risk.fileTypes[].risk", group.risk)?;
    }
    check_unit("risk.unknownFileTypeRisk", self.unknown_file_type_risk)?;
    check_unit("risk.missingPathRisk", self.missing_path_risk)?;
    for (key, value) in &self.change_types {
      check_unit(&format!("risk.changeTypes.{}", key), *value)?;
    }
    check_unit("risk.defaultChangeTypeRisk", self.default_change_type_risk)?;
    for step in &self.size_steps {
      check_unit("risk.sizeSteps[].risk", step.risk)?;
    }
    if self
      .size_steps
      .windows(2)
      .any(|w| w[0].max_changes >= w[1].max_changes)
    {
      return Err(EngineError::invalid_config(
        "risk.sizeSteps",
        "maxChanges must be strictly ascending",
      ));
    }
    check_unit("risk.oversizeRisk", self.oversize_risk)?;
    check_unit("risk.thresholds.high", self.thresholds.high)?;
    check_unit("risk.thresholds.medium", self.thresholds.medium)?;
    if self.thresholds.medium > self.thresholds.high {
      return Err(EngineError::invalid_config(
        "risk.thresholds",
        "medium must not exceed high",
      ));
    }
    Ok(())
  }
}

// ---------------------------------------------------------------------------
// Recommendations and summary
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct RecommendationConfig {
  /// Diff-level score above which a high-priority warning is emitted.
  pub warn_above: f64,
  /// Diff-level score above which a standard-review note is emitted.
  pub note_above: f64,
  /// More files than this suggests splitting the change.
  pub large_diff_files: usize,
  /// Language issues at or above this severity become file-scoped warnings.
  pub issue_severity: Severity,
}

impl Default for RecommendationConfig {
  fn default() -> Self {
    Self {
      warn_above: 0.7,
      note_above: 0.4,
      large_diff_files: 5,
      issue_severity: Severity::High,
    }
  }
}

impl RecommendationConfig {
  pub fn validate(&self) -> Result<(), EngineError> {
    check_unit("recommendations.warnAbove", self.warn_above)?;
    check_unit("recommendations.noteAbove", self.note_above)?;
    Ok(())
  }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct SummaryConfig {
  /// How many of the riskiest files to list.
  pub hotspot_count: usize,
}

impl Default for SummaryConfig {
  fn default() -> Self {
    Self { hotspot_count: 5 }
  }
}
