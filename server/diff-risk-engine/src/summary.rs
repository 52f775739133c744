//! Diff-level summary: totals, change-type histogram, riskiest files.

use std::collections::BTreeMap;

use crate::config::SummaryConfig;
use crate::types::{AnalysisSummary, ChangeType, ClassifiedFile, Hotspot, RiskAssessment};

/// Files per change type.
pub fn count_change_types(files: &[ClassifiedFile]) -> BTreeMap<ChangeType, usize> {
  let mut counts = BTreeMap::new();
  for f in files {
    *counts.entry(f.classification.change_type).or_insert(0) += 1;
  }
  counts
}

/// Most frequent change type; the one seen first in the diff wins ties.
pub fn primary_change_type(files: &[ClassifiedFile]) -> ChangeType {
  let counts = count_change_types(files);
  let mut best: Option<(ChangeType, usize)> = None;
  for f in files {
    let t = f.classification.change_type;
    let n = counts.get(&t).copied().unwrap_or(0);
    if n > best.map_or(0, |(_, c)| c) {
      best = Some((t, n));
    }
  }
  best.map_or(ChangeType::Other, |(t, _)| t)
}

/// Top `n` files by risk score; equal scores keep diff order.
pub fn hotspots(risk: &RiskAssessment, n: usize) -> Vec<Hotspot> {
  let mut ranked: Vec<Hotspot> = risk
    .details
    .file_risks
    .iter()
    .map(|r| Hotspot {
      file_path: r.file_path.clone(),
      risk_score: r.risk_score,
    })
    .collect();
  ranked.sort_by(|a, b| b.risk_score.total_cmp(&a.risk_score));
  ranked.truncate(n);
  ranked
}

pub fn summarize(
  files: &[ClassifiedFile],
  risk: &RiskAssessment,
  config: &SummaryConfig,
) -> AnalysisSummary {
  AnalysisSummary {
    total_files: files.len(),
    total_additions: files.iter().map(|f| f.file.additions as u64).sum(),
    total_deletions: files.iter().map(|f| f.file.deletions as u64).sum(),
    primary_change_type: primary_change_type(files),
    change_types: count_change_types(files),
    risk_level: risk.risk_level,
    hotspots: hotspots(risk, config.hotspot_count),
  }
}
