//! Diff Risk Engine: unified-diff triage, rule-based; no AI, no DB, no network.
//!
//! Parses patch text into file/hunk records, classifies each file's edit,
//! scores per-file and diff-level risk, and assembles a JSON-ready report with
//! a summary and prioritized recommendations. Every stage is a total function
//! over its input: malformed diffs degrade to partial results, never errors.
//! Used by the binary for stdin/stdout; can also be called as a library.

pub mod classifier;
pub mod config;
pub mod engine;
pub mod error;
pub mod language;
pub mod parser;
pub mod recommend;
pub mod risk;
pub mod summary;
pub mod types;

pub use classifier::ChangeClassifier;
pub use config::Config;
pub use engine::Engine;
pub use error::EngineError;
pub use language::{detect_language, Language};
pub use parser::parse;
pub use risk::RiskAssessor;
pub use types::{
  AnalysisReport, ChangeType, Classification, ClassifiedFile, FileChange, FileStatus, ParsedDiff,
  RiskAssessment, RiskLevel,
};

/// Analyze diff text with the default configuration (no I/O).
pub fn analyze(diff_text: &str) -> AnalysisReport {
  Engine::with_defaults().analyze(diff_text)
}
