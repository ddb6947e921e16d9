use super::relationships;
use crate::scanner::FileRecord;
use serde::Serialize;

/// Folder-name fragments that mark a path as a dumping ground.
pub const JUNK_FOLDER_KEYWORDS: &[&str] = &["misc", "temp", "old", "backup", "archive", "delete"];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum OrphanReason {
    JunkFolder,
    NoProjectAffiliation,
}

#[derive(Debug, Clone, Serialize)]
pub struct OrphanRecord {
    pub file: FileRecord,
    pub reason: OrphanReason,
}

/// Flag files that live in junk folders or carry no project identifier.
/// A file is flagged at most once; the junk-folder check runs first.
pub fn detect_orphans(records: &[FileRecord]) -> Vec<OrphanRecord> {
    records
        .iter()
        .filter_map(|record| {
            let folder_path = record.relative_path.to_string_lossy().to_lowercase();
            if JUNK_FOLDER_KEYWORDS
                .iter()
                .any(|keyword| folder_path.contains(keyword))
            {
                return Some(OrphanRecord {
                    file: record.clone(),
                    reason: OrphanReason::JunkFolder,
                });
            }

            if relationships::identify_project(&record.filename).is_none()
                && record.folder_depth > 0
            {
                return Some(OrphanRecord {
                    file: record.clone(),
                    reason: OrphanReason::NoProjectAffiliation,
                });
            }

            None
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};
    use std::path::PathBuf;

    fn record(relative_path: &str, depth: usize) -> FileRecord {
        let filename = PathBuf::from(relative_path)
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_default();
        FileRecord {
            path: PathBuf::from(relative_path),
            relative_path: PathBuf::from(relative_path),
            filename,
            extension: ".dwg".to_string(),
            size_bytes: 100,
            modified: Utc.timestamp_opt(1_600_000_000, 0).unwrap(),
            folder_depth: depth,
            parent_folder: String::new(),
            project_path: String::new(),
        }
    }

    #[test]
    fn test_junk_folder_wins_even_with_project_id() {
        // Resolvable project name, but the folder is junk.
        let records = vec![record("TempFolder/Alpha_bracket.dwg", 1)];
        let orphans = detect_orphans(&records);
        assert_eq!(orphans.len(), 1);
        assert_eq!(orphans[0].reason, OrphanReason::JunkFolder);
    }

    #[test]
    fn test_no_affiliation_below_root() {
        let records = vec![record("stuff/12345.dwg", 1)];
        let orphans = detect_orphans(&records);
        assert_eq!(orphans.len(), 1);
        assert_eq!(orphans[0].reason, OrphanReason::NoProjectAffiliation);
    }

    #[test]
    fn test_root_level_files_are_not_orphans() {
        let records = vec![record("12345.dwg", 0)];
        assert!(detect_orphans(&records).is_empty());
    }

    #[test]
    fn test_affiliated_files_pass() {
        let records = vec![record("ProjectAlpha/Alpha_Main.dwg", 1)];
        assert!(detect_orphans(&records).is_empty());
    }
}
