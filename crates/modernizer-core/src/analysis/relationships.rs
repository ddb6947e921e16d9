use crate::scanner::FileRecord;
use lazy_static::lazy_static;
use regex::Regex;
use serde::Serialize;
use std::collections::BTreeMap;

const DRAWING_EXTENSIONS: &[&str] = &[".dwg"];
const SPECIFICATION_EXTENSIONS: &[&str] = &[".pdf"];
const BOM_EXTENSIONS: &[&str] = &[".xlsx", ".xls"];

lazy_static! {
    static ref LEADING_WORD: Regex = Regex::new(r"^([A-Za-z]+)").unwrap();
    static ref LEADING_CODE: Regex = Regex::new(r"^([A-Z]{2,4})[-_]").unwrap();
    static ref YEAR_TOKEN: Regex = Regex::new(r"(20\d{2})").unwrap();
}

/// Rules for deriving a project key from a bare filename, in priority order.
/// First match wins. This is the Analyzer-side heuristic; project discovery
/// during transformation uses the path-based chain in `transform::discovery`
/// and the two are not guaranteed to agree.
#[derive(Debug, Clone, Copy)]
enum NameRule {
    /// Leading alphabetic run of length >= 3, uppercased.
    LeadingWord,
    /// Leading 2-4 uppercase letters followed by a separator.
    LeadingCode,
    /// Four-digit year anywhere in the name.
    YearToken,
}

const FILENAME_RULES: &[NameRule] = &[
    NameRule::LeadingWord,
    NameRule::LeadingCode,
    NameRule::YearToken,
];

fn apply_rule(rule: NameRule, filename: &str) -> Option<String> {
    match rule {
        NameRule::LeadingWord => {
            let captures = LEADING_WORD.captures(filename)?;
            let word = captures.get(1)?.as_str();
            if word.len() >= 3 {
                Some(word.to_uppercase())
            } else {
                None
            }
        }
        NameRule::LeadingCode => LEADING_CODE
            .captures(filename)
            .map(|captures| captures[1].to_string()),
        NameRule::YearToken => YEAR_TOKEN
            .captures(filename)
            .map(|captures| format!("YEAR_{}", &captures[1])),
    }
}

/// Derive a project key from a filename, or `None` when the file has no
/// confident affiliation.
pub fn identify_project(filename: &str) -> Option<String> {
    FILENAME_RULES
        .iter()
        .find_map(|rule| apply_rule(*rule, filename))
}

/// Files of one project partitioned by engineering role.
#[derive(Debug, Default, Serialize)]
pub struct ProjectRelations {
    pub drawings: Vec<FileRecord>,
    pub specifications: Vec<FileRecord>,
    pub boms: Vec<FileRecord>,
    pub total_files: usize,
}

/// Group records by filename-derived project key and partition each group
/// into drawings / specifications / BOMs. Files without a key are left out.
pub fn map_relationships(records: &[FileRecord]) -> BTreeMap<String, ProjectRelations> {
    let mut groups: BTreeMap<String, Vec<&FileRecord>> = BTreeMap::new();
    for record in records {
        if let Some(key) = identify_project(&record.filename) {
            groups.entry(key).or_default().push(record);
        }
    }

    groups
        .into_iter()
        .map(|(key, files)| {
            let mut relations = ProjectRelations {
                total_files: files.len(),
                ..Default::default()
            };
            for file in files {
                let ext = file.extension.as_str();
                if DRAWING_EXTENSIONS.contains(&ext) {
                    relations.drawings.push(file.clone());
                } else if SPECIFICATION_EXTENSIONS.contains(&ext) {
                    relations.specifications.push(file.clone());
                } else if BOM_EXTENSIONS.contains(&ext) {
                    relations.boms.push(file.clone());
                }
            }
            (key, relations)
        })
        .collect()
}
