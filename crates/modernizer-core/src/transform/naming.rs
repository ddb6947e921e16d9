use super::rules::TransformRules;
use lazy_static::lazy_static;
use regex::Regex;

pub const DEFAULT_REVISION_NUMBER: u32 = 1;
const MAX_DESCRIPTION_LEN: usize = 30;
const SEQUENCE_DIGITS: usize = 3;

const ASSEMBLY_WORDS: &[&str] = &["assembly", "asm", "main"];
const SPEC_WORDS: &[&str] = &["spec", "requirement", "standard"];
const BOM_WORDS: &[&str] = &["bom", "bill", "material"];

lazy_static! {
    /// Revision markers in priority order. First match wins.
    static ref REVISION_PATTERNS: Vec<Regex> = vec![
        Regex::new(r"[rR]ev\s*(\d+)").unwrap(),
        Regex::new(r"[rR](\d+)").unwrap(),
        Regex::new(r"[vV]\s*(\d+)").unwrap(),
        Regex::new(r"Rev\s*([A-Z])").unwrap(),
        Regex::new(r"_(\d+)\.[^.]*$").unwrap(),
    ];
    static ref EXTENSION_SUFFIX: Regex = Regex::new(r"\.[^.]*$").unwrap();
    static ref VERSION_TOKENS: Regex = Regex::new(r"(?i)v?\d+|rev?\d*|final|actualfinal").unwrap();
    static ref LEADING_CODE: Regex = Regex::new(r"^[A-Z]{2,4}[-_]").unwrap();
    static ref TYPE_WORDS: Regex = Regex::new(r"(?i)dwg|pdf|xlsx?|assembly|asm|part|prt").unwrap();
    static ref SEPARATOR_RUNS: Regex = Regex::new(r"[-_\s]+").unwrap();
    static ref RESERVED_CHARS: Regex = Regex::new(r#"[<>:"/\\|?*]"#).unwrap();
}

fn contains_any(haystack: &str, needles: &[&str]) -> bool {
    needles.iter().any(|needle| haystack.contains(needle))
}

/// Assign the semantic type code: the extension picks the family, a keyword
/// pass over the filename refines it.
pub fn type_code(filename: &str, extension: &str) -> &'static str {
    let lower = filename.to_lowercase();
    match extension {
        ".dwg" => {
            if contains_any(&lower, ASSEMBLY_WORDS) {
                "ASM"
            } else {
                "PRT"
            }
        }
        ".pdf" => {
            if contains_any(&lower, SPEC_WORDS) {
                "SPEC"
            } else {
                "DOC"
            }
        }
        ".xlsx" | ".xls" => {
            if contains_any(&lower, BOM_WORDS) {
                "BOM"
            } else {
                "DATA"
            }
        }
        _ => "MISC",
    }
}

/// Extract a revision marker and normalize it through the configured
/// template. Numeric markers keep their number, letters map A->1, B->2, ...
/// No marker yields revision 1.
pub fn extract_revision(filename: &str, revision_format: &str) -> String {
    for pattern in REVISION_PATTERNS.iter() {
        if let Some(m) = pattern.captures(filename).and_then(|c| c.get(1)) {
            let number = m
                .as_str()
                .parse::<u32>()
                .unwrap_or_else(|_| letter_to_number(m.as_str()));
            return revision_format.replace("{number}", &number.to_string());
        }
    }
    revision_format.replace("{number}", &DEFAULT_REVISION_NUMBER.to_string())
}

fn letter_to_number(letter: &str) -> u32 {
    letter
        .chars()
        .next()
        .filter(|ch| ch.is_ascii_alphabetic())
        .map(|ch| ch.to_ascii_uppercase() as u32 - 'A' as u32 + 1)
        .unwrap_or(DEFAULT_REVISION_NUMBER)
}

/// Distill a clean CamelCase description from the original filename.
/// Version markers, project codes and type-indicator words are stripped;
/// when nothing meaningful remains the type code picks a default.
pub fn generate_description(filename: &str, type_code: &str) -> String {
    let stem = EXTENSION_SUFFIX.replace(filename, "");
    let no_versions = VERSION_TOKENS.replace_all(&stem, "");
    let no_code = LEADING_CODE.replace(&no_versions, "");
    let no_type_words = TYPE_WORDS.replace_all(&no_code, "");
    let collapsed = SEPARATOR_RUNS.replace_all(&no_type_words, "_");
    let trimmed = collapsed.trim_matches('_');

    if trimmed.len() < 3 {
        return default_description(type_code)
            .chars()
            .take(MAX_DESCRIPTION_LEN)
            .collect();
    }

    let capitalized: String = trimmed.split('_').map(capitalize).collect();
    capitalized.chars().take(MAX_DESCRIPTION_LEN).collect()
}

fn capitalize(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().collect::<String>() + &chars.as_str().to_lowercase(),
        None => String::new(),
    }
}

fn default_description(type_code: &str) -> &'static str {
    match type_code {
        "ASM" => "MainAssembly",
        "PRT" => "Component",
        "SPEC" => "Specification",
        "BOM" => "BillOfMaterials",
        "DOC" => "Document",
        "DATA" => "DataSheet",
        _ => "File",
    }
}

/// Fill the naming template and make the result filesystem-safe.
/// Sequence numbers are zero-padded and scoped per (project, type code)
/// by the caller.
pub fn compose_filename(
    rules: &TransformRules,
    project_id: &str,
    type_code: &str,
    sequence: u32,
    description: &str,
    revision: &str,
    extension: &str,
) -> String {
    let filled = rules
        .naming_convention
        .replace("{project_id}", project_id)
        .replace("{type_code}", type_code)
        .replace("{sequence}", &format!("{:0width$}", sequence, width = SEQUENCE_DIGITS))
        .replace("{description}", description)
        .replace("{revision}", revision)
        .replace("{ext}", extension.trim_start_matches('.'));
    sanitize_filename(&filled)
}

/// Replace filesystem-reserved characters with underscores.
pub fn sanitize_filename(name: &str) -> String {
    RESERVED_CHARS.replace_all(name, "_").into_owned()
}
