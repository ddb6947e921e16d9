use lazy_static::lazy_static;
use regex::Regex;

pub const UNCLASSIFIED: &str = "unclassified";

lazy_static! {
    /// Naming conventions observed across legacy engineering archives, in
    /// priority order. First match wins; rule order is part of the contract.
    pub static ref NAMING_PATTERNS: Vec<(&'static str, Regex)> = vec![
        (
            "descriptive_with_version",
            Regex::new(r"(?i)^[A-Za-z_]+.*v?\d+.*\.(dwg|pdf|xlsx?)$").unwrap(),
        ),
        (
            "project_code_sequential",
            Regex::new(r"(?i)^[A-Z]{2,4}[-_]\d{3}[-_].*\.(dwg|pdf|xlsx?)$").unwrap(),
        ),
        (
            "structured_code",
            Regex::new(r"(?i)^[A-Z]\d{3}[-_][A-Z]{3}[-_]\d{3}.*\.(dwg|pdf|xlsx?)$").unwrap(),
        ),
        (
            "date_based",
            Regex::new(r"(?i)^.*\d{6}.*\.(dwg|pdf|xlsx?)$").unwrap(),
        ),
        (
            "revision_controlled",
            Regex::new(r"(?i)^.*rev?\d+.*\.(dwg|pdf|xlsx?)$").unwrap(),
        ),
        (
            "final_versions",
            Regex::new(r"(?i)^.*final.*\.(dwg|pdf|xlsx?)$").unwrap(),
        ),
    ];
}

/// Classify a filename against the known conventions.
pub fn classify(filename: &str) -> &'static str {
    for (name, pattern) in NAMING_PATTERNS.iter() {
        if pattern.is_match(filename) {
            return *name;
        }
    }
    UNCLASSIFIED
}

/// Count files per convention. Only populated buckets are returned, in rule
/// order with `unclassified` last.
pub fn pattern_histogram(filenames: impl Iterator<Item = impl AsRef<str>>) -> Vec<(String, usize)> {
    let mut counts = vec![0usize; NAMING_PATTERNS.len()];
    let mut unclassified = 0usize;

    for filename in filenames {
        let name = classify(filename.as_ref());
        match NAMING_PATTERNS.iter().position(|(n, _)| *n == name) {
            Some(idx) => counts[idx] += 1,
            None => unclassified += 1,
        }
    }

    let mut histogram: Vec<(String, usize)> = NAMING_PATTERNS
        .iter()
        .zip(counts)
        .filter(|(_, count)| *count > 0)
        .map(|((name, _), count)| (name.to_string(), count))
        .collect();
    if unclassified > 0 {
        histogram.push((UNCLASSIFIED.to_string(), unclassified));
    }
    histogram
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_descriptive_with_version_wins_first() {
        assert_eq!(classify("Bracket_Mount_v2.dwg"), "descriptive_with_version");
        // Version digits anywhere after a leading word also satisfy rule 1,
        // so a project-code name lands there before rule 2 is consulted.
        assert_eq!(classify("GAM-001-bracket.dwg"), "descriptive_with_version");
    }

    #[test]
    fn test_date_based() {
        assert_eq!(classify("240115_meeting_notes.pdf"), "date_based");
    }

    #[test]
    fn test_revision_controlled() {
        assert_eq!(classify("2020_rev2_layout.dwg"), "revision_controlled");
    }

    #[test]
    fn test_final_versions() {
        assert_eq!(classify("final_layout.pdf"), "final_versions");
    }

    #[test]
    fn test_unclassified() {
        assert_eq!(classify("notes.txt"), UNCLASSIFIED);
        assert_eq!(classify("no_extension"), UNCLASSIFIED);
    }

    #[test]
    fn test_histogram_orders_buckets_by_rule() {
        let names = [
            "final_layout.pdf",
            "Bracket_v1.dwg",
            "notes.txt",
            "Plate_v2.dwg",
        ];
        let histogram = pattern_histogram(names.iter());
        assert_eq!(
            histogram,
            vec![
                ("descriptive_with_version".to_string(), 2),
                ("final_versions".to_string(), 1),
                (UNCLASSIFIED.to_string(), 1),
            ]
        );
    }
}
