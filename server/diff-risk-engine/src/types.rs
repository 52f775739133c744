//! Core types for the diff risk engine (JSON contracts between pipeline stages).
//!
//! Every structure here is a plain value: produced by one stage, handed by
//! reference to the next, never mutated afterwards.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

use crate::language::Language;

/// Path sentinel for the missing side of an added or deleted file.
pub const DEV_NULL: &str = "/dev/null";

// ---------------------------------------------------------------------------
// Parser output
// ---------------------------------------------------------------------------

/// One `@@ -a,b +c,d @@` block: header integers plus raw marker-prefixed lines.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DiffHunk {
  pub old_start: u32,
  pub old_count: u32,
  pub new_start: u32,
  pub new_count: u32,
  #[serde(default)]
  pub lines: Vec<String>,
}

impl DiffHunk {
  pub fn new(old_start: u32, old_count: u32, new_start: u32, new_count: u32) -> Self {
    Self {
      old_start,
      old_count,
      new_start,
      new_count,
      lines: Vec::new(),
    }
  }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FileStatus {
  Added,
  Deleted,
  Modified,
  Renamed,
}

/// One file's change within a diff.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FileChange {
  pub old_path: String,
  pub new_path: String,
  pub status: FileStatus,
  #[serde(default)]
  pub hunks: Vec<DiffHunk>,
  #[serde(default)]
  pub additions: u32,
  #[serde(default)]
  pub deletions: u32,
}

impl FileChange {
  /// Open a file record. Added files always carry `/dev/null` as the old
  /// path and deleted files as the new path, however they were discovered.
  pub fn new(old_path: &str, new_path: &str, status: FileStatus) -> Self {
    let (old_path, new_path) = match status {
      FileStatus::Added => (DEV_NULL, new_path),
      FileStatus::Deleted => (old_path, DEV_NULL),
      FileStatus::Modified | FileStatus::Renamed => (old_path, new_path),
    };
    Self {
      old_path: old_path.to_string(),
      new_path: new_path.to_string(),
      status,
      hunks: Vec::new(),
      additions: 0,
      deletions: 0,
    }
  }

  /// The path that best names this file: the new path unless it is the
  /// `/dev/null` sentinel, then the old one.
  pub fn path(&self) -> Option<&str> {
    [self.new_path.as_str(), self.old_path.as_str()]
      .into_iter()
      .find(|p| !p.is_empty() && *p != DEV_NULL)
  }

  /// Saturates: counters may come from collaborators, not just the parser.
  pub fn total_changes(&self) -> u32 {
    self.additions.saturating_add(self.deletions)
  }

  /// Added and removed lines across all hunks, structural `+++`/`---` excluded.
  pub fn changed_lines(&self) -> impl Iterator<Item = &str> {
    self
      .hunks
      .iter()
      .flat_map(|h| h.lines.iter())
      .map(String::as_str)
      .filter(|l| is_change_line(l))
  }
}

/// `+`/`-` content line (never a `+++`/`---` file header).
pub fn is_change_line(line: &str) -> bool {
  (line.starts_with('+') && !line.starts_with("+++"))
    || (line.starts_with('-') && !line.starts_with("---"))
}

/// Parser result: files in order of appearance.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParsedDiff {
  pub files: Vec<FileChange>,
}

impl ParsedDiff {
  pub fn is_empty(&self) -> bool {
    self.files.is_empty()
  }

  pub fn stats(&self) -> DiffStats {
    DiffStats {
      total_files: self.files.len(),
      total_additions: self.files.iter().map(|f| f.additions as u64).sum(),
      total_deletions: self.files.iter().map(|f| f.deletions as u64).sum(),
    }
  }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DiffStats {
  pub total_files: usize,
  pub total_additions: u64,
  pub total_deletions: u64,
}

// ---------------------------------------------------------------------------
// Classification
// ---------------------------------------------------------------------------

/// Semantic category of one file's edit. Declaration order is the
/// deterministic ordering used for report maps.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ChangeType {
  BugFix,
  Feature,
  Refactor,
  Documentation,
  Test,
  SecurityFix,
  PerformanceOptimization,
  Dependency,
  Other,
  #[serde(rename = "no-change")]
  NoChange,
  Unknown,
}

impl ChangeType {
  pub fn as_str(self) -> &'static str {
    match self {
      Self::BugFix => "bug_fix",
      Self::Feature => "feature",
      Self::Refactor => "refactor",
      Self::Documentation => "documentation",
      Self::Test => "test",
      Self::SecurityFix => "security_fix",
      Self::PerformanceOptimization => "performance_optimization",
      Self::Dependency => "dependency",
      Self::Other => "other",
      Self::NoChange => "no-change",
      Self::Unknown => "unknown",
    }
  }

  /// Key into the change-type risk table. Security and performance labels
  /// share the table's broader `security`/`performance` rows.
  pub fn risk_key(self) -> &'static str {
    match self {
      Self::SecurityFix => "security",
      Self::PerformanceOptimization => "performance",
      other => other.as_str(),
    }
  }

  /// Labels that carry no edit evidence; language and path rules leave them alone.
  pub fn is_terminal(self) -> bool {
    matches!(self, Self::NoChange | Self::Unknown)
  }
}

impl fmt::Display for ChangeType {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(self.as_str())
  }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClassificationDetails {
  pub added_lines: u32,
  pub removed_lines: u32,
  pub total_changes: u32,
  /// Changed-line bodies (markers stripped), newline-joined.
  #[serde(default, skip_serializing_if = "String::is_empty")]
  pub content: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
  Low,
  Medium,
  High,
  Critical,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum IssueCategory {
  Security,
  Performance,
  Quality,
}

impl IssueCategory {
  pub fn as_str(self) -> &'static str {
    match self {
      Self::Security => "security",
      Self::Performance => "performance",
      Self::Quality => "quality",
    }
  }
}

/// A language-specific finding in one file's changed lines.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FileIssue {
  #[serde(rename = "type")]
  pub kind: String,
  pub category: IssueCategory,
  pub severity: Severity,
  pub message: String,
  pub suggestion: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Classification {
  pub change_type: ChangeType,
  pub confidence: f64,
  #[serde(default)]
  pub details: ClassificationDetails,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub language: Option<Language>,
  /// Names of language or path rules that matched.
  #[serde(default, skip_serializing_if = "Vec::is_empty")]
  pub signals: Vec<String>,
  #[serde(default, skip_serializing_if = "Vec::is_empty")]
  pub issues: Vec<FileIssue>,
}

impl Classification {
  pub fn new(change_type: ChangeType, confidence: f64, details: ClassificationDetails) -> Self {
    Self {
      change_type,
      confidence,
      details,
      language: None,
      signals: Vec::new(),
      issues: Vec::new(),
    }
  }

  pub fn unknown() -> Self {
    Self::new(ChangeType::Unknown, 0.0, ClassificationDetails::default())
  }
}

/// A parsed file with its classification attached (the risk assessor's input).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClassifiedFile {
  #[serde(flatten)]
  pub file: FileChange,
  pub classification: Classification,
}

// ---------------------------------------------------------------------------
// Risk
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RiskLevel {
  Low,
  Medium,
  High,
}

impl RiskLevel {
  pub fn as_str(self) -> &'static str {
    match self {
      Self::Low => "low",
      Self::Medium => "medium",
      Self::High => "high",
    }
  }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RiskFactors {
  pub file_type: f64,
  pub change_type: f64,
  pub size: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FileRisk {
  pub file_path: String,
  pub risk_score: f64,
  pub risk_factors: RiskFactors,
}

/// Empty for an empty diff, so it serializes as `{}`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RiskDetails {
  #[serde(default, skip_serializing_if = "Vec::is_empty")]
  pub file_risks: Vec<FileRisk>,
  #[serde(default, skip_serializing_if = "is_zero")]
  pub total_files: usize,
}

fn is_zero(n: &usize) -> bool {
  *n == 0
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RiskAssessment {
  pub risk_score: f64,
  pub risk_level: RiskLevel,
  #[serde(default)]
  pub details: RiskDetails,
}

impl RiskAssessment {
  pub fn empty() -> Self {
    Self {
      risk_score: 0.0,
      risk_level: RiskLevel::Low,
      details: RiskDetails::default(),
    }
  }
}

// ---------------------------------------------------------------------------
// Report (what the binary emits)
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum RecommendationKind {
  Review,
  Warning,
  Info,
}

/// Declaration order is sort order: high first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
  High,
  Medium,
  Low,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Recommendation {
  #[serde(rename = "type")]
  pub kind: RecommendationKind,
  pub priority: Priority,
  pub message: String,
  pub category: String,
  /// Set when the recommendation concerns a single file.
  #[serde(rename = "filePath", skip_serializing_if = "Option::is_none")]
  pub file_path: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Hotspot {
  pub file_path: String,
  pub risk_score: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisSummary {
  pub total_files: usize,
  pub total_additions: u64,
  pub total_deletions: u64,
  pub primary_change_type: ChangeType,
  pub change_types: BTreeMap<ChangeType, usize>,
  pub risk_level: RiskLevel,
  pub hotspots: Vec<Hotspot>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisReport {
  pub diff_id: String,
  pub summary: AnalysisSummary,
  pub files: Vec<ClassifiedFile>,
  pub risk: RiskAssessment,
  pub change_types: BTreeMap<ChangeType, usize>,
  pub recommendations: Vec<Recommendation>,
}
