use crate::scanner::FileRecord;
use lazy_static::lazy_static;
use regex::Regex;
use serde::Serialize;
use std::collections::BTreeMap;

lazy_static! {
    static ref VERSION_TOKENS: Regex =
        Regex::new(r"(?i)v?\d+|rev?\d+|final|actualfinal").unwrap();
    static ref SEPARATOR_RUNS: Regex = Regex::new(r"[-_\s]+").unwrap();
}

/// A group of files that appear to be saved versions of one document.
#[derive(Debug, Clone, Serialize)]
pub struct VersionConflictSet {
    pub base_name: String,
    /// Members, newest modification time first.
    pub files: Vec<FileRecord>,
    pub conflict_count: usize,
    pub latest_file: String,
    pub oldest_file: String,
}

/// Reduce a filename to its base identity: version, revision and "final"
/// markers stripped, separator runs collapsed to a single underscore.
pub fn base_identity(filename: &str) -> String {
    let stripped = VERSION_TOKENS.replace_all(filename, "");
    let collapsed = SEPARATOR_RUNS.replace_all(&stripped, "_");
    collapsed.trim_matches('_').to_string()
}

/// Group files sharing a base identity; every group of two or more becomes
/// a conflict set. Members are ordered newest-first; equal timestamps fall
/// back to lexicographic filename order so output is stable across runs.
pub fn detect_conflicts(records: &[FileRecord]) -> Vec<VersionConflictSet> {
    let mut groups: BTreeMap<String, Vec<FileRecord>> = BTreeMap::new();
    for record in records {
        groups
            .entry(base_identity(&record.filename))
            .or_default()
            .push(record.clone());
    }

    let mut conflicts = Vec::new();
    for (base_name, mut files) in groups {
        if files.len() < 2 {
            continue;
        }
        files.sort_by(|a, b| {
            b.modified
                .cmp(&a.modified)
                .then_with(|| a.filename.cmp(&b.filename))
        });
        conflicts.push(VersionConflictSet {
            base_name,
            conflict_count: files.len(),
            latest_file: files[0].filename.clone(),
            oldest_file: files[files.len() - 1].filename.clone(),
            files,
        });
    }
    conflicts
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};
    use std::path::PathBuf;

    fn record(filename: &str, modified_secs: i64) -> FileRecord {
        FileRecord {
            path: PathBuf::from(filename),
            relative_path: PathBuf::from(filename),
            filename: filename.to_string(),
            extension: ".dwg".to_string(),
            size_bytes: 10,
            modified: Utc.timestamp_opt(modified_secs, 0).unwrap(),
            folder_depth: 0,
            parent_folder: String::new(),
            project_path: filename.to_string(),
        }
    }

    #[test]
    fn test_base_identity_strips_version_markers() {
        assert_eq!(
            base_identity("Proj_v1_final.dwg"),
            base_identity("Proj_v2_final.dwg")
        );
        assert_eq!(
            base_identity("Plate_Rev2.dwg"),
            base_identity("Plate_rev3.dwg")
        );
    }

    #[test]
    fn test_latest_is_newest_by_mtime() {
        let records = vec![
            record("Proj_v1_final.dwg", 1_000_000),
            record("Proj_v2_final.dwg", 2_000_000),
        ];
        let conflicts = detect_conflicts(&records);
        assert_eq!(conflicts.len(), 1);
        assert_eq!(conflicts[0].conflict_count, 2);
        assert_eq!(conflicts[0].latest_file, "Proj_v2_final.dwg");
        assert_eq!(conflicts[0].oldest_file, "Proj_v1_final.dwg");
    }

    #[test]
    fn test_equal_mtimes_break_ties_by_filename() {
        let records = vec![
            record("Plate_v2.dwg", 1_000_000),
            record("Plate_v1.dwg", 1_000_000),
        ];
        let conflicts = detect_conflicts(&records);
        assert_eq!(conflicts.len(), 1);
        assert_eq!(conflicts[0].latest_file, "Plate_v1.dwg");
        assert_eq!(conflicts[0].oldest_file, "Plate_v2.dwg");
    }

    #[test]
    fn test_singletons_are_not_conflicts() {
        let records = vec![record("Unique_v1.dwg", 1), record("Other_v1.dwg", 2)];
        assert!(detect_conflicts(&records).is_empty());
    }
}
