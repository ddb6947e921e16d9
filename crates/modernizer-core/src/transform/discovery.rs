use crate::scanner::FileRecord;
use lazy_static::lazy_static;
use regex::Regex;
use std::collections::{BTreeSet, HashMap};
use std::path::{Component, Path};

pub const UNKNOWN_PROJECT: &str = "Unknown_Project";
/// Fallback year for folders carrying no year token.
pub const DEFAULT_PROJECT_YEAR: i32 = 2020;

lazy_static! {
    static ref PROJECT_TOKEN: Regex = Regex::new(r"(?i)project[_\s]*([a-zA-Z]+)").unwrap();
    static ref YEAR_TOKEN: Regex = Regex::new(r"(20\d{2})").unwrap();
    static ref YEAR_RUN: Regex = Regex::new(r"20\d{2}[_\s]*").unwrap();
    static ref PATH_CODE: Regex = Regex::new(r"([A-Z]{2,4})[-_]").unwrap();
    static ref SEGMENT_SPLIT: Regex = Regex::new(r"[_\s/\\]+").unwrap();
}

/// Rules for deriving a project name from a folder path, in priority order.
/// First match wins. Distinct from the filename heuristic in
/// `analysis::relationships`; the two are not reconciled.
#[derive(Debug, Clone, Copy)]
enum PathRule {
    /// A "project" token followed by a word, title-cased.
    ProjectToken,
    /// A year token, combined with the next path segment.
    YearGrouping,
    /// 2-4 uppercase letters followed by a separator.
    LeadingCode,
    /// First non-hidden path segment, normalized.
    FirstSegment,
}

const PATH_RULES: &[PathRule] = &[
    PathRule::ProjectToken,
    PathRule::YearGrouping,
    PathRule::LeadingCode,
    PathRule::FirstSegment,
];

fn apply_rule(rule: PathRule, relative_dir: &str) -> Option<String> {
    match rule {
        PathRule::ProjectToken => PROJECT_TOKEN
            .captures(relative_dir)
            .map(|captures| title_case(&captures[1])),
        PathRule::YearGrouping => {
            let year = YEAR_TOKEN.captures(relative_dir)?[1].to_string();
            let remaining = YEAR_RUN.replace_all(relative_dir, "");
            let segment = SEGMENT_SPLIT
                .split(&remaining)
                .find(|segment| !segment.is_empty());
            Some(match segment {
                Some(segment) => format!("{}_{}", segment, year),
                None => format!("Project_{}", year),
            })
        }
        PathRule::LeadingCode => PATH_CODE
            .captures(relative_dir)
            .map(|captures| captures[1].to_string()),
        PathRule::FirstSegment => first_segment(relative_dir)
            .map(|segment| title_case(&segment.replace(' ', "_"))),
    }
}

/// Derive a project display name from a folder path relative to the scan
/// root. Never fails; the final fallback is `Unknown_Project`.
pub fn identify_project_from_path(relative_dir: &str) -> String {
    PATH_RULES
        .iter()
        .find_map(|rule| apply_rule(*rule, relative_dir))
        .unwrap_or_else(|| UNKNOWN_PROJECT.to_string())
}

/// Year for chronological folder naming: first year token in the path,
/// else the default.
pub fn extract_year(relative_dir: &str) -> i32 {
    YEAR_TOKEN
        .captures(relative_dir)
        .and_then(|captures| captures[1].parse().ok())
        .unwrap_or(DEFAULT_PROJECT_YEAR)
}

fn first_segment(relative_dir: &str) -> Option<String> {
    Path::new(relative_dir)
        .components()
        .filter_map(|component| match component {
            Component::Normal(segment) => Some(segment.to_string_lossy().into_owned()),
            _ => None,
        })
        .find(|segment| !segment.is_empty() && !segment.starts_with('.'))
}

/// Uppercase the first letter of every alphabetic run, lowercase the rest.
fn title_case(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut boundary = true;
    for ch in text.chars() {
        if ch.is_alphabetic() {
            if boundary {
                out.extend(ch.to_uppercase());
            } else {
                out.extend(ch.to_lowercase());
            }
            boundary = false;
        } else {
            out.push(ch);
            boundary = true;
        }
    }
    out
}

/// Files grouped under one discovered project.
#[derive(Debug, Clone)]
pub struct ProjectGroup {
    /// Original display name derived from the path.
    pub name: String,
    pub year: i32,
    pub files: Vec<FileRecord>,
    /// Distinct source folders contributing files.
    pub source_folders: BTreeSet<String>,
}

/// Group a catalog into projects by folder-path identity.
///
/// Groups are ordered by first encounter in the (deterministic) catalog
/// order. Canonical project ids are assigned from this order, so it must
/// be stable across runs.
pub fn discover_projects(records: &[FileRecord]) -> Vec<ProjectGroup> {
    let mut groups: Vec<ProjectGroup> = Vec::new();
    let mut index: HashMap<String, usize> = HashMap::new();

    for record in records {
        let dir = record
            .relative_path
            .parent()
            .map(|parent| parent.to_string_lossy().into_owned())
            .unwrap_or_default();
        let name = identify_project_from_path(&dir);

        let slot = *index.entry(name.clone()).or_insert_with(|| {
            groups.push(ProjectGroup {
                name,
                year: extract_year(&dir),
                files: Vec::new(),
                source_folders: BTreeSet::new(),
            });
            groups.len() - 1
        });
        groups[slot].files.push(record.clone());
        groups[slot].source_folders.insert(dir);
    }

    groups
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};
    use std::path::PathBuf;

    fn record(relative_path: &str) -> FileRecord {
        let rel = PathBuf::from(relative_path);
        FileRecord {
            path: rel.clone(),
            relative_path: rel.clone(),
            filename: rel
                .file_name()
                .map(|name| name.to_string_lossy().into_owned())
                .unwrap_or_default(),
            extension: ".dwg".to_string(),
            size_bytes: 1,
            modified: Utc.timestamp_opt(1_600_000_000, 0).unwrap(),
            folder_depth: rel.components().count().saturating_sub(1),
            parent_folder: String::new(),
            project_path: String::new(),
        }
    }

    #[test]
    fn test_project_token_rule() {
        assert_eq!(identify_project_from_path("ProjectAlpha"), "Alpha");
        assert_eq!(identify_project_from_path("project_beta/drawings"), "Beta");
    }

    #[test]
    fn test_year_grouping_rule() {
        assert_eq!(identify_project_from_path("2019_Gamma"), "Gamma_2019");
        assert_eq!(identify_project_from_path("2019"), "Project_2019");
    }

    #[test]
    fn test_leading_code_rule() {
        assert_eq!(identify_project_from_path("DEL_drawings"), "DEL");
    }

    #[test]
    fn test_first_segment_fallback() {
        assert_eq!(
            identify_project_from_path("shared resources/cad"),
            "Shared_Resources"
        );
    }

    #[test]
    fn test_unknown_for_root_files() {
        assert_eq!(identify_project_from_path(""), UNKNOWN_PROJECT);
    }

    #[test]
    fn test_extract_year() {
        assert_eq!(extract_year("2019_Gamma"), 2019);
        assert_eq!(extract_year("misc"), DEFAULT_PROJECT_YEAR);
    }

    #[test]
    fn test_groups_keep_first_encounter_order() {
        let records = vec![
            record("2019_Gamma/layout.dwg"),
            record("ProjectAlpha/main.dwg"),
            record("2019_Gamma/detail.dwg"),
        ];
        let groups = discover_projects(&records);
        assert_eq!(groups.len(), 2);
        assert_eq!(groups[0].name, "Gamma_2019");
        assert_eq!(groups[0].files.len(), 2);
        assert_eq!(groups[1].name, "Alpha");
    }

    #[test]
    fn test_source_folders_are_collected() {
        let records = vec![
            record("ProjectAlpha/cad/main.dwg"),
            record("ProjectAlpha/docs/spec.pdf"),
        ];
        let groups = discover_projects(&records);
        assert_eq!(groups.len(), 1);
        assert_eq!(groups[0].source_folders.len(), 2);
    }
}
