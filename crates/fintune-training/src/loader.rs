//! Line-delimited JSON dataset loading.
//!
//! One record per non-blank line. A malformed line is skipped with a
//! diagnostic, never fatal: a dataset with one bad line still trains on the
//! rest. A missing file is reported as a distinct outcome so callers can tell
//! "no data configured" from "file not found".

use crate::dataset::RawRecord;
use crate::error::TrainingResult;
use std::io::ErrorKind;
use std::path::Path;
use tracing::{info, warn};

/// Records loaded from one source, plus skip diagnostics.
#[derive(Debug, Clone, Default)]
pub struct LoadedSource {
    /// Decoded records, in input line order (skipped lines excluded).
    pub records: Vec<RawRecord>,
    /// Number of non-blank lines that failed to decode.
    pub skipped_lines: usize,
}

/// Outcome of loading a dataset source.
#[derive(Debug, Clone)]
pub enum LoadOutcome {
    /// The source exists; records and skip counts inside.
    Found(LoadedSource),
    /// The source file does not exist.
    NotFound,
}

impl LoadOutcome {
    /// Collapses this outcome to a record vector, treating a missing source
    /// as empty. Loses the found/not-found distinction.
    #[must_use]
    pub fn into_records(self) -> Vec<RawRecord> {
        match self {
            Self::Found(source) => source.records,
            Self::NotFound => Vec::new(),
        }
    }
}

/// Loads a line-delimited JSON source.
///
/// Blank lines are skipped silently. A line that fails to decode is skipped
/// with a `warn!` diagnostic and counted; decoding problems never abort the
/// load. Output order equals input line order.
///
/// # Errors
/// Returns an I/O error for any failure other than the file not existing.
pub fn load_jsonl(path: &Path) -> TrainingResult<LoadOutcome> {
    let contents = match std::fs::read_to_string(path) {
        Ok(contents) => contents,
        Err(e) if e.kind() == ErrorKind::NotFound => {
            warn!(path = %path.display(), "Dataset source not found");
            return Ok(LoadOutcome::NotFound);
        }
        Err(e) => return Err(e.into()),
    };

    let mut source = LoadedSource::default();

    for (idx, line) in contents.lines().enumerate() {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        match serde_json::from_str::<RawRecord>(line) {
            Ok(record) => source.records.push(record),
            Err(e) => {
                warn!(
                    path = %path.display(),
                    line = idx + 1,
                    error = %e,
                    "Skipping malformed JSONL line"
                );
                source.skipped_lines += 1;
            }
        }
    }

    info!(
        path = %path.display(),
        records = source.records.len(),
        skipped = source.skipped_lines,
        "Loaded dataset source"
    );

    Ok(LoadOutcome::Found(source))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn write_lines(lines: &[&str]) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        for line in lines {
            writeln!(file, "{line}").unwrap();
        }
        file
    }

    #[test]
    fn test_load_preserves_line_order() {
        let file = write_lines(&[r#"{"n": 1}"#, r#"{"n": 2}"#, r#"{"n": 3}"#]);
        let LoadOutcome::Found(source) = load_jsonl(file.path()).unwrap() else {
            panic!("expected Found");
        };
        let ns: Vec<i64> = source.records.iter().map(|r| r["n"].as_i64().unwrap()).collect();
        assert_eq!(ns, vec![1, 2, 3]);
        assert_eq!(source.skipped_lines, 0);
    }

    #[test]
    fn test_malformed_lines_skipped_with_count() {
        let file = write_lines(&[
            r#"{"n": 1}"#,
            "not json at all",
            "",
            r#"{"n": 2}"#,
            "{broken",
        ]);
        let LoadOutcome::Found(source) = load_jsonl(file.path()).unwrap() else {
            panic!("expected Found");
        };
        assert_eq!(source.records.len(), 2);
        assert_eq!(source.skipped_lines, 2);
    }

    #[test]
    fn test_blank_lines_not_counted_as_skipped() {
        let file = write_lines(&["", "   ", r#"{"n": 1}"#]);
        let LoadOutcome::Found(source) = load_jsonl(file.path()).unwrap() else {
            panic!("expected Found");
        };
        assert_eq!(source.records.len(), 1);
        assert_eq!(source.skipped_lines, 0);
    }

    #[test]
    fn test_missing_file_is_not_found() {
        let dir = tempfile::tempdir().unwrap();
        let outcome = load_jsonl(&dir.path().join("nope.jsonl")).unwrap();
        assert!(matches!(outcome, LoadOutcome::NotFound));
        assert!(outcome.into_records().is_empty());
    }

    #[test]
    fn test_non_object_lines_still_load() {
        // Loading does not validate shape; the validator does that later.
        let file = write_lines(&["[1, 2]", r#""just a string""#]);
        let LoadOutcome::Found(source) = load_jsonl(file.path()).unwrap() else {
            panic!("expected Found");
        };
        assert_eq!(source.records, vec![json!([1, 2]), json!("just a string")]);
    }
}
