//! Language detection from file paths (selects the classification strategy).

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Language {
  JavaScript,
  TypeScript,
  Python,
  Java,
  Kotlin,
  Go,
  Rust,
  Json,
  Yaml,
  Toml,
  Markdown,
  Unknown,
}

impl Language {
  pub fn as_str(self) -> &'static str {
    match self {
      Self::JavaScript => "javascript",
      Self::TypeScript => "typescript",
      Self::Python => "python",
      Self::Java => "java",
      Self::Kotlin => "kotlin",
      Self::Go => "go",
      Self::Rust => "rust",
      Self::Json => "json",
      Self::Yaml => "yaml",
      Self::Toml => "toml",
      Self::Markdown => "markdown",
      Self::Unknown => "unknown",
    }
  }
}

/// Last path segment.
pub fn file_name(path: &str) -> &str {
  path.rsplit(['/', '\\']).next().unwrap_or(path)
}

/// Lowercased extension of the file name, or the whole lowercased file name
/// when it has no dot (`Dockerfile` -> `dockerfile`, `.gitignore` -> `gitignore`).
pub fn extension_key(path: &str) -> String {
  let name = file_name(path);
  name.rsplit('.').next().unwrap_or(name).to_ascii_lowercase()
}

/// Map a path to its language by extension.
pub fn detect_language(path: &str) -> Language {
  if !file_name(path).contains('.') {
    return Language::Unknown;
  }
  match extension_key(path).as_str() {
    "js" | "jsx" | "mjs" | "cjs" => Language::JavaScript,
    "ts" | "tsx" | "mts" | "cts" => Language::TypeScript,
    "py" => Language::Python,
    "java" => Language::Java,
    "kt" | "kts" => Language::Kotlin,
    "go" => Language::Go,
    "rs" => Language::Rust,
    "json" => Language::Json,
    "yml" | "yaml" => Language::Yaml,
    "toml" => Language::Toml,
    "md" | "markdown" => Language::Markdown,
    _ => Language::Unknown,
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn detects_by_extension_case_insensitively() {
    assert_eq!(detect_language("src/App.TSX"), Language::TypeScript);
    assert_eq!(detect_language("cmd/server/main.go"), Language::Go);
    assert_eq!(detect_language("lib/index.js"), Language::JavaScript);
    assert_eq!(detect_language("build.gradle.kts"), Language::Kotlin);
    assert_eq!(detect_language(".github/ci.yml"), Language::Yaml);
    assert_eq!(detect_language("README.md"), Language::Markdown);
  }

  #[test]
  fn unknown_for_missing_or_unmapped_extension() {
    assert_eq!(detect_language(""), Language::Unknown);
    assert_eq!(detect_language("Makefile"), Language::Unknown);
    assert_eq!(detect_language("docs.v2/LICENSE"), Language::Unknown);
    assert_eq!(detect_language("image.png"), Language::Unknown);
  }

  #[test]
  fn extension_key_falls_back_to_file_name() {
    assert_eq!(extension_key("docker/Dockerfile"), "dockerfile");
    assert_eq!(extension_key(".gitignore"), "gitignore");
    assert_eq!(extension_key("a/b.c/file.RS"), "rs");
  }

  #[test]
  fn log_name_matches_wire_name() {
    for lang in [Language::TypeScript, Language::Go, Language::Markdown, Language::Unknown] {
      let json = serde_json::to_string(&lang).unwrap();
      assert_eq!(json, format!("\"{}\"", lang.as_str()));
    }
  }
}
