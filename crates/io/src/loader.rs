// Upload-order loading with the skip-and-continue policy

use std::path::{Path, PathBuf};

use kwcompare_engine::error::{CompareError, MAX_FILES, MIN_FILES};
use kwcompare_engine::model::{KeywordTable, LoadIssue, LoadIssueKind, LoadOutcome};

use crate::{csv, xlsx};

/// Load all supplied files in upload order.
///
/// The file-count gate runs before any file is opened. Unreadable or
/// malformed files are skipped and reported as issues; the run fails only
/// when no file loads at all.
pub fn load_all(paths: &[PathBuf]) -> Result<LoadOutcome, CompareError> {
    if paths.len() < MIN_FILES || paths.len() > MAX_FILES {
        return Err(CompareError::FileCount { supplied: paths.len() });
    }

    let mut tables = Vec::new();
    let mut issues = Vec::new();
    for (idx, path) in paths.iter().enumerate() {
        match load_one(path, idx + 1) {
            Ok(table) => tables.push(table),
            Err(kind) => issues.push(LoadIssue {
                file_name: file_name_of(path),
                kind,
            }),
        }
    }

    if tables.is_empty() {
        return Err(CompareError::NoValidFiles);
    }
    Ok(LoadOutcome { tables, issues })
}

/// Load a single file, dispatching on extension. Everything that is not
/// CSV/TSV goes through calamine, which auto-detects the Excel flavor.
pub fn load_one(path: &Path, source_index: usize) -> Result<KeywordTable, LoadIssueKind> {
    match path.extension().and_then(|e| e.to_str()) {
        Some(ext) if ext.eq_ignore_ascii_case("csv") || ext.eq_ignore_ascii_case("tsv") => {
            csv::read_table(path, source_index)
        }
        _ => xlsx::read_table(path, source_index),
    }
}

pub(crate) fn file_name_of(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    fn csv_fixture(dir: &Path, name: &str, body: &str) -> PathBuf {
        let path = dir.join(name);
        fs::write(&path, body).unwrap();
        path
    }

    const VALID: &str = "Keyword,Position,Search Volume,CPC,URL\nshoes,1,900,2.5,u\n";
    const NARROW: &str = "Keyword,Position,Search Volume,CPC\nshoes,1,900,2.5\n";

    #[test]
    fn file_count_gate_rejects_two_and_seven() {
        let dir = tempdir().unwrap();
        let path = csv_fixture(dir.path(), "a.csv", VALID);

        let err = load_all(&[path.clone(), path.clone()]).unwrap_err();
        assert!(matches!(err, CompareError::FileCount { supplied: 2 }));

        let seven: Vec<PathBuf> = (0..7).map(|_| path.clone()).collect();
        let err = load_all(&seven).unwrap_err();
        assert!(matches!(err, CompareError::FileCount { supplied: 7 }));
    }

    #[test]
    fn bad_file_is_skipped_and_reported() {
        let dir = tempdir().unwrap();
        let good_a = csv_fixture(dir.path(), "a.csv", VALID);
        let narrow = csv_fixture(dir.path(), "b.csv", NARROW);
        let good_c = csv_fixture(dir.path(), "c.csv", VALID);

        let outcome = load_all(&[good_a, narrow, good_c]).unwrap();
        assert_eq!(outcome.tables.len(), 2);
        assert_eq!(outcome.issues.len(), 1);
        assert_eq!(outcome.issues[0].file_name, "b.csv");
        assert!(matches!(outcome.issues[0].kind, LoadIssueKind::Shape { columns: 4 }));

        // Skipped file leaves a gap in upload indexes, not a renumbering.
        assert_eq!(outcome.tables[0].source_index, 1);
        assert_eq!(outcome.tables[1].source_index, 3);
    }

    #[test]
    fn all_bad_files_is_fatal() {
        let dir = tempdir().unwrap();
        let a = csv_fixture(dir.path(), "a.csv", NARROW);
        let b = csv_fixture(dir.path(), "b.csv", NARROW);
        let c = csv_fixture(dir.path(), "c.csv", NARROW);

        let err = load_all(&[a, b, c]).unwrap_err();
        assert!(matches!(err, CompareError::NoValidFiles));
    }

    #[test]
    fn missing_file_is_a_read_issue() {
        let dir = tempdir().unwrap();
        let good = csv_fixture(dir.path(), "a.csv", VALID);
        let gone = dir.path().join("missing.xlsx");

        let outcome = load_all(&[good.clone(), gone, good]).unwrap();
        assert_eq!(outcome.tables.len(), 2);
        assert!(matches!(outcome.issues[0].kind, LoadIssueKind::Read { .. }));
        assert_eq!(outcome.issues[0].file_name, "missing.xlsx");
    }
}
