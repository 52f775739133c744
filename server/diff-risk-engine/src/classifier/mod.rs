//! Change classification: generic keyword rules, refined per language and
//! for dependency manifests.

mod rules;
mod strategy;

use tracing::{debug, trace};

use crate::config::ClassifierConfig;
use crate::error::EngineError;
use crate::language::{detect_language, file_name, Language};
use crate::types::{ChangeType, Classification, ClassifiedFile, FileChange, ParsedDiff};

use rules::GenericRules;
use strategy::LanguageStrategy;

pub struct ChangeClassifier {
  generic: GenericRules,
  typescript: LanguageStrategy,
  go: LanguageStrategy,
  manifests: Vec<String>,
  dependency_confidence: f64,
  language_aware: bool,
}

impl ChangeClassifier {
  pub fn new(config: &ClassifierConfig) -> Result<Self, EngineError> {
    config.validate()?;
    Ok(Self {
      generic: GenericRules::compile(config)?,
      typescript: LanguageStrategy::compile("typescript", &config.typescript)?,
      go: LanguageStrategy::compile("go", &config.go)?,
      manifests: config
        .dependency_manifests
        .iter()
        .map(|m| m.to_ascii_lowercase())
        .collect(),
      dependency_confidence: config.dependency_confidence,
      language_aware: config.language_aware,
    })
  }

  pub fn with_defaults() -> Self {
    Self::new(&ClassifierConfig::default()).expect("default classifier patterns compile")
  }

  /// Generic classification of one file from its changed-line content.
  pub fn classify_file(&self, file: &FileChange) -> Classification {
    self.generic.evaluate(file)
  }

  /// Generic classification refined by the strategy for `language`.
  pub fn classify_for_language(&self, file: &FileChange, language: Language) -> Classification {
    let generic = self.generic.evaluate(file);
    let mut out = match self.strategy_for(language) {
      Some(strategy) => strategy.refine(generic),
      None => generic,
    };
    if language != Language::Unknown {
      out.language = Some(language);
    }
    self.apply_manifest_rule(file, out)
  }

  /// Detect the language from the file path, then classify.
  pub fn classify_detected(&self, file: &FileChange) -> Classification {
    let language = file.path().map_or(Language::Unknown, detect_language);
    self.classify_for_language(file, language)
  }

  /// Classify every file of a diff, preserving order.
  pub fn classify(&self, parsed: &ParsedDiff) -> Vec<ClassifiedFile> {
    let files: Vec<ClassifiedFile> = parsed
      .files
      .iter()
      .map(|file| {
        let classification = if self.language_aware {
          self.classify_detected(file)
        } else {
          self.classify_file(file)
        };
        trace!(
          path = file.path().unwrap_or("unknown"),
          change_type = %classification.change_type,
          language = classification.language.map_or("none", Language::as_str),
          confidence = classification.confidence,
          issues = classification.issues.len(),
          "classified file"
        );
        ClassifiedFile {
          file: file.clone(),
          classification,
        }
      })
      .collect();
    debug!(files = files.len(), language_aware = self.language_aware, "classified diff");
    files
  }

  fn strategy_for(&self, language: Language) -> Option<&LanguageStrategy> {
    match language {
      Language::TypeScript => Some(&self.typescript),
      Language::Go => Some(&self.go),
      Language::JavaScript
      | Language::Python
      | Language::Java
      | Language::Kotlin
      | Language::Rust
      | Language::Json
      | Language::Yaml
      | Language::Toml
      | Language::Markdown
      | Language::Unknown => None,
    }
  }

  /// Manifests and lockfiles with real edits are dependency changes.
  fn apply_manifest_rule(&self, file: &FileChange, mut c: Classification) -> Classification {
    if c.change_type.is_terminal() {
      return c;
    }
    let Some(path) = file.path() else {
      return c;
    };
    let name = file_name(path).to_ascii_lowercase();
    if self.manifests.iter().any(|m| *m == name) {
      c.change_type = ChangeType::Dependency;
      c.confidence = self.dependency_confidence;
      c.signals.push("dependency-manifest".to_string());
    }
    c
  }
}
