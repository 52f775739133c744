//! Integration tests for the diff risk engine.

use diff_risk_engine::types::{ClassifiedFile, Priority, DEV_NULL};
use diff_risk_engine::{
  parse, ChangeClassifier, ChangeType, Config, Engine, FileStatus, Language, RiskAssessor,
  RiskLevel,
};
use pretty_assertions::assert_eq;

const MIXED: &str = "diff --git a/src/payments/charge.ts b/src/payments/charge.ts
index 1a2b3c4..5d6e7f8 100644
--- a/src/payments/charge.ts
+++ b/src/payments/charge.ts
@@ -12,6 +12,9 @@ export async function charge(order: Order) {
   const amount = order.total;
-  return gateway.charge(amount);
+  if (amount == null || amount <= 0) {
+    throw new Error('invalid amount');
+  }
+  return gateway.charge(amount as any);
 }
diff --git a/README.md b/README.md
index 0000001..0000002 100644
--- a/README.md
+++ b/README.md
@@ -1,3 +1,3 @@
 # Payments
-Fix the typo in the docs
+Fixed the typo in the documentation
 
diff --git a/package.json b/package.json
index 1111111..2222222 100644
--- a/package.json
+++ b/package.json
@@ -5,7 +5,7 @@
   \"dependencies\": {
-    \"stripe\": \"^11.0.0\"
+    \"stripe\": \"^12.1.0\"
   }
diff --git a/src/legacy.js b/src/legacy.js
deleted file mode 100644
index 3333333..0000000
--- a/src/legacy.js
+++ /dev/null
@@ -1,2 +0,0 @@
-module.exports = function legacy() {};
-// old
diff --git a/lib/new_helper.go b/lib/new_helper.go
new file mode 100644
index 0000000..4444444
--- /dev/null
+++ b/lib/new_helper.go
@@ -0,0 +1,5 @@
+package lib
+
+type Cache struct {
+\tentries map[string]string
+}
";

#[test]
fn single_modified_file_counts_and_status() {
  let diff = "diff --git a/test.js b/test.js
index abc..def 100644
--- a/test.js
+++ b/test.js
@@ -1,3 +1,4 @@
 function hello() {
-  console.log('Hello');
+  console.log('Hello World');
 }
+// New comment";
  let parsed = parse(diff);
  assert_eq!(parsed.files.len(), 1);
  let f = &parsed.files[0];
  assert_eq!(f.new_path, "test.js");
  assert_eq!(f.additions, 2);
  assert_eq!(f.deletions, 1);
  assert_eq!(f.status, FileStatus::Modified);
}

#[test]
fn statuses_across_a_mixed_diff() {
  let parsed = parse(MIXED);
  let statuses: Vec<FileStatus> = parsed.files.iter().map(|f| f.status).collect();
  assert_eq!(
    statuses,
    vec![
      FileStatus::Modified,
      FileStatus::Modified,
      FileStatus::Modified,
      FileStatus::Deleted,
      FileStatus::Added,
    ]
  );
  assert_eq!(parsed.files[3].new_path, DEV_NULL);
  assert_eq!(parsed.files[4].old_path, DEV_NULL);
  assert_eq!(parsed.files[4].additions, 5);

  let stats = parsed.stats();
  assert_eq!(stats.total_files, 5);
  assert_eq!(stats.total_additions, 4 + 1 + 1 + 0 + 5);
  assert_eq!(stats.total_deletions, 1 + 1 + 1 + 2 + 0);
}

#[test]
fn full_report_over_mixed_diff() {
  let report = Engine::with_defaults().analyze(MIXED);

  let types: Vec<ChangeType> = report
    .files
    .iter()
    .map(|f| f.classification.change_type)
    .collect();
  assert_eq!(types[1], ChangeType::Documentation);
  assert_eq!(types[2], ChangeType::Dependency);
  assert_eq!(types[4], ChangeType::Feature);

  // Deleted file is scored by its old path.
  assert_eq!(report.risk.details.file_risks[3].file_path, "src/legacy.js");
  assert_eq!(report.risk.details.total_files, 5);

  let mean = report
    .risk
    .details
    .file_risks
    .iter()
    .map(|r| r.risk_score)
    .sum::<f64>()
    / 5.0;
  assert!((report.risk.risk_score - mean).abs() < 1e-12);

  assert_eq!(report.summary.total_files, 5);
  assert_eq!(report.summary.hotspots.len(), 5);
  assert!(report.summary.hotspots[0].risk_score >= report.summary.hotspots[4].risk_score);

  // Priorities are non-increasing.
  let priorities: Vec<Priority> = report.recommendations.iter().map(|r| r.priority).collect();
  let mut sorted = priorities.clone();
  sorted.sort();
  assert_eq!(priorities, sorted);
  assert!(report.recommendations.iter().any(|r| r.category == "dependencies"));
}

#[test]
fn typescript_file_carries_language_signals() {
  let report = Engine::with_defaults().analyze(MIXED);
  let ts = &report.files[0].classification;
  assert_eq!(ts.language, Some(Language::TypeScript));
  assert!(ts.signals.contains(&"unsafe-type-assertion".to_string()));
  assert!(ts.confidence <= 0.95);
}

#[test]
fn report_json_uses_camel_case_contract() {
  let report = Engine::with_defaults().analyze(MIXED);
  let json = serde_json::to_value(&report).unwrap();
  assert!(json["diffId"].as_str().unwrap().starts_with("diff-"));
  assert_eq!(json["files"][0]["newPath"], "src/payments/charge.ts");
  assert!(json["files"][0]["classification"]["changeType"].is_string());
  assert!(json["risk"]["details"]["fileRisks"][0]["riskFactors"]["fileType"].is_number());
  assert_eq!(json["changeTypes"]["dependency"], 1);
  assert!(json["summary"]["primaryChangeType"].is_string());
}

#[test]
fn deterministic_output_across_runs() {
  let a = serde_json::to_string(&Engine::with_defaults().analyze(MIXED)).unwrap();
  let b = serde_json::to_string(&Engine::with_defaults().analyze(MIXED)).unwrap();
  assert_eq!(a, b, "Same inputs must produce identical JSON output");
}

#[test]
fn no_change_file_classifies_with_full_confidence() {
  let diff = "diff --git a/a.py b/a.py
--- a/a.py
+++ b/a.py
@@ -1,2 +1,2 @@
 def f():
     return 1
";
  let parsed = parse(diff);
  let c = ChangeClassifier::with_defaults().classify_file(&parsed.files[0]);
  assert_eq!(c.change_type, ChangeType::NoChange);
  assert_eq!(c.confidence, 1.0);
}

#[test]
fn empty_assessment_serializes_with_empty_details() {
  let a = RiskAssessor::with_defaults().assess(&[]);
  assert_eq!(a.risk_level, RiskLevel::Low);
  let json = serde_json::to_value(&a).unwrap();
  assert_eq!(json, serde_json::json!({"riskScore": 0.0, "riskLevel": "low", "details": {}}));
}

#[test]
fn garbage_input_is_an_empty_report_not_an_error() {
  let report = Engine::with_defaults().analyze("not a diff\n\u{0}\u{1}binary junk\n@@ broken @@");
  assert!(report.files.is_empty());
  assert_eq!(report.risk.risk_level, RiskLevel::Low);
}

#[test]
fn config_overrides_change_the_outcome() {
  let config = Config::from_json_str(
    r#"{
      "risk": {"thresholds": {"high": 0.2, "medium": 0.1}},
      "classifier": {"languageAware": false}
    }"#,
  )
  .unwrap();
  let report = Engine::new(config).unwrap().analyze(MIXED);
  assert_eq!(report.risk.risk_level, RiskLevel::High);
  assert!(report.files.iter().all(|f| f.classification.language.is_none()));
  assert!(report
    .files
    .iter()
    .all(|f| f.classification.change_type != ChangeType::Dependency));
}

#[test]
fn classified_files_round_trip_through_json_for_collaborators() {
  let engine = Engine::with_defaults();
  let files = engine.classifier().classify(&parse(MIXED));
  let json = serde_json::to_string(&files).unwrap();
  let back: Vec<ClassifiedFile> = serde_json::from_str(&json).unwrap();
  let (a, b) = (engine.assessor().assess(&back), engine.assessor().assess(&files));
  assert_eq!(a.risk_level, b.risk_level);
  assert_eq!(a.details.total_files, b.details.total_files);
  assert!((a.risk_score - b.risk_score).abs() < 1e-9);
}

#[test]
fn collaborator_supplied_counts_never_panic_the_assessor() {
  let file: ClassifiedFile = serde_json::from_value(serde_json::json!({
    "oldPath": "src/big.rs",
    "newPath": "src/big.rs",
    "status": "modified",
    "additions": u32::MAX,
    "deletions": 1,
    "classification": {"changeType": "feature", "confidence": 0.7}
  }))
  .unwrap();
  let a = RiskAssessor::with_defaults().assess(&[file]);
  assert_eq!(a.details.total_files, 1);
  assert_eq!(a.details.file_risks[0].risk_factors.size, 0.9);
  assert!((0.0..=1.0).contains(&a.risk_score));
}

#[test]
fn risky_go_change_yields_file_scoped_security_warning() {
  let diff = "diff --git a/internal/shell/run.go b/internal/shell/run.go
--- a/internal/shell/run.go
+++ b/internal/shell/run.go
@@ -3,2 +3,3 @@ func Run(input string) error {
-\treturn nil
+\tcmd := exec.Command(\"sh\", \"-c\", input)
+\treturn cmd.Run()
";
  let report = Engine::with_defaults().analyze(diff);
  let issues = &report.files[0].classification.issues;
  assert_eq!(issues[0].kind, "command-injection");

  let scoped: Vec<_> = report
    .recommendations
    .iter()
    .filter(|r| r.file_path.is_some())
    .collect();
  assert_eq!(scoped.len(), 1);
  assert_eq!(scoped[0].priority, Priority::High);
  assert_eq!(scoped[0].category, "security");
  assert_eq!(scoped[0].file_path.as_deref(), Some("internal/shell/run.go"));

  let json = serde_json::to_value(&report).unwrap();
  assert_eq!(json["files"][0]["classification"]["issues"][0]["severity"], "critical");
}
