//! Unified diff parser: raw patch text into ordered file/hunk records.
//!
//! Single pass over the lines with "current file" state. The parser is total:
//! unrecognized lines are skipped, and malformed or empty input yields no files.

use once_cell::sync::Lazy;
use regex::Regex;
use tracing::{debug, trace};

use crate::types::{DiffHunk, FileChange, FileStatus, ParsedDiff, DEV_NULL};

static FILE_HEADER: Lazy<Regex> =
  Lazy::new(|| Regex::new(r"^diff --git a/(.+?) b/(.+?)$").expect("valid regex"));
static HUNK_HEADER: Lazy<Regex> = Lazy::new(|| {
  Regex::new(r"^@@ -(\d+)(?:,(\d+))? \+(\d+)(?:,(\d+))? @@").expect("valid regex")
});

/// Lines after a `diff --git` header searched for status markers.
const STATUS_LOOKAHEAD: usize = 4;

/// Parse diff text. Never fails.
pub fn parse(diff_text: &str) -> ParsedDiff {
  let lines: Vec<&str> = diff_text.lines().collect();
  let mut files = Vec::new();
  let mut current: Option<FileChange> = None;

  for (i, &line) in lines.iter().enumerate() {
    if let Some(caps) = FILE_HEADER.captures(line) {
      // Flush the open file before starting the next one.
      if let Some(done) = current.take() {
        files.push(done);
      }
      let status = resolve_status(&lines, i);
      trace!(old = &caps[1], new = &caps[2], ?status, "file header");
      current = Some(FileChange::new(&caps[1], &caps[2], status));
      continue;
    }

    if current.is_none() {
      current = open_headerless(&lines, i);
      continue;
    }
    let Some(file) = current.as_mut() else {
      continue;
    };

    if let Some(hunk) = parse_hunk_header(line) {
      file.hunks.push(hunk);
      continue;
    }

    // File headers are structural, never content.
    if line.starts_with("+++") || line.starts_with("---") {
      continue;
    }

    let Some(hunk) = file.hunks.last_mut() else {
      continue;
    };
    match line.as_bytes().first() {
      Some(b'+') => file.additions += 1,
      Some(b'-') => file.deletions += 1,
      Some(b' ') => {}
      _ => continue,
    }
    hunk.lines.push(line.to_string());
  }

  if let Some(done) = current {
    files.push(done);
  }

  debug!(files = files.len(), lines = lines.len(), "parsed diff");
  ParsedDiff { files }
}

/// Open a file from `---`/`+++` headers when the `diff --git` line is absent.
fn open_headerless(lines: &[&str], i: usize) -> Option<FileChange> {
  let line = lines[i];
  if let Some(path) = line.strip_prefix("+++ b/") {
    return Some(FileChange::new(DEV_NULL, header_path(path), FileStatus::Added));
  }
  if let Some(path) = line.strip_prefix("--- a/") {
    let next_is_null = lines
      .get(i + 1)
      .is_some_and(|next| next.starts_with("+++ /dev/null"));
    if next_is_null {
      return Some(FileChange::new(header_path(path), DEV_NULL, FileStatus::Deleted));
    }
  }
  None
}

/// Some tools append a tab and a timestamp after the path.
fn header_path(raw: &str) -> &str {
  raw.split('\t').next().unwrap_or(raw).trim_end()
}

/// Status from the markers nearest to the `diff --git` header at `index`.
/// Unusual header orderings fall back to `Modified`.
fn resolve_status(lines: &[&str], index: usize) -> FileStatus {
  let window: Vec<&str> = lines
    .iter()
    .skip(index + 1)
    .take(STATUS_LOOKAHEAD)
    .take_while(|l| !l.starts_with("diff --git ") && !l.starts_with("@@"))
    .copied()
    .collect();
  let any = |prefixes: &[&str]| {
    window
      .iter()
      .any(|l| prefixes.iter().any(|p| l.starts_with(p)))
  };

  if any(&["rename from "]) {
    return FileStatus::Renamed;
  }
  let preceded_by_new = index > 0 && lines[index - 1].starts_with("new file mode");
  if preceded_by_new || any(&["new file mode", "--- /dev/null"]) {
    return FileStatus::Added;
  }
  if any(&["deleted file mode", "+++ /dev/null"]) {
    return FileStatus::Deleted;
  }
  FileStatus::Modified
}

/// `@@ -a[,b] +c[,d] @@`; omitted counts default to 1. Out-of-range numbers
/// saturate so the hunk still opens and its lines are not misattributed.
fn parse_hunk_header(line: &str) -> Option<DiffHunk> {
  let caps = HUNK_HEADER.captures(line)?;
  let num = |idx: usize| -> u32 {
    let Some(m) = caps.get(idx) else {
      return 1;
    };
    // The pattern only admits digits, so a failed parse is an overflow.
    m.as_str().parse().unwrap_or_else(|_| {
      trace!(field = m.as_str(), "hunk header number saturated");
      u32::MAX
    })
  };
  Some(DiffHunk::new(num(1), num(2), num(3), num(4)))
}
