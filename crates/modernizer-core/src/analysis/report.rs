use super::conflicts::VersionConflictSet;
use super::orphans::{OrphanRecord, OrphanReason};
use super::relationships::ProjectRelations;
use crate::scanner::FileRecord;
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::collections::BTreeMap;

const BYTES_PER_MB: f64 = 1024.0 * 1024.0;
const DAYS_PER_YEAR: f64 = 365.25;

/// Per-unit impact constants feeding the recommendation estimates.
const MINUTES_SAVED_PER_CONFLICT: usize = 10;
const SEARCH_TIME_REDUCTION_PCT: usize = 50;
/// More distinct conventions than this triggers the standardization nudge.
const PATTERN_DIVERSITY_THRESHOLD: usize = 3;

#[derive(Debug, Serialize)]
pub struct AnalysisReport {
    pub summary: AnalysisSummary,
    pub file_types: Vec<ExtensionCount>,
    pub naming_patterns: Vec<PatternCount>,
    pub project_breakdown: BTreeMap<String, ProjectBreakdown>,
    pub issues: IssueCounts,
    pub recommendations: Vec<Recommendation>,
}

#[derive(Debug, Serialize)]
pub struct AnalysisSummary {
    pub total_files: usize,
    pub total_size_mb: f64,
    pub unique_projects: usize,
    pub version_conflicts: usize,
    pub orphaned_files: usize,
    /// Absent when the archive holds no files.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub date_range: Option<DateRange>,
}

#[derive(Debug, Serialize)]
pub struct DateRange {
    pub earliest: DateTime<Utc>,
    pub latest: DateTime<Utc>,
    pub span_years: f64,
}

#[derive(Debug, Serialize)]
pub struct ExtensionCount {
    pub extension: String,
    pub count: usize,
}

#[derive(Debug, Serialize)]
pub struct PatternCount {
    pub pattern: String,
    pub count: usize,
}

#[derive(Debug, Serialize)]
pub struct ProjectBreakdown {
    pub total_files: usize,
    pub drawings: usize,
    pub specifications: usize,
    pub boms: usize,
}

#[derive(Debug, Serialize)]
pub struct IssueCounts {
    pub version_conflicts: usize,
    pub orphaned_files: usize,
    pub unclassified_files: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Priority {
    High,
    Medium,
}

#[derive(Debug, Serialize)]
pub struct Recommendation {
    pub priority: Priority,
    pub category: String,
    pub issue: String,
    pub recommendation: String,
    pub estimated_impact: String,
}

/// Aggregate the independent analysis passes into the final report.
pub fn assemble(
    records: &[FileRecord],
    relations: &BTreeMap<String, ProjectRelations>,
    pattern_counts: Vec<(String, usize)>,
    conflicts: &[VersionConflictSet],
    orphans: &[OrphanRecord],
) -> AnalysisReport {
    let total_size: u64 = records.iter().map(|r| r.size_bytes).sum();

    let date_range = records
        .iter()
        .map(|r| r.modified)
        .min()
        .zip(records.iter().map(|r| r.modified).max())
        .map(|(earliest, latest)| DateRange {
            earliest,
            latest,
            span_years: round2((latest - earliest).num_days() as f64 / DAYS_PER_YEAR),
        });

    let mut extension_counts: BTreeMap<String, usize> = BTreeMap::new();
    for record in records {
        *extension_counts.entry(record.extension.clone()).or_default() += 1;
    }
    let mut file_types: Vec<ExtensionCount> = extension_counts
        .into_iter()
        .map(|(extension, count)| ExtensionCount { extension, count })
        .collect();
    file_types.sort_by(|a, b| {
        b.count
            .cmp(&a.count)
            .then_with(|| a.extension.cmp(&b.extension))
    });

    let unclassified_files = pattern_counts
        .iter()
        .find(|(name, _)| name == super::patterns::UNCLASSIFIED)
        .map(|(_, count)| *count)
        .unwrap_or(0);

    let project_breakdown = relations
        .iter()
        .map(|(key, group)| {
            (
                key.clone(),
                ProjectBreakdown {
                    total_files: group.total_files,
                    drawings: group.drawings.len(),
                    specifications: group.specifications.len(),
                    boms: group.boms.len(),
                },
            )
        })
        .collect();

    let recommendations = build_recommendations(&pattern_counts, conflicts, orphans);

    AnalysisReport {
        summary: AnalysisSummary {
            total_files: records.len(),
            total_size_mb: round2(total_size as f64 / BYTES_PER_MB),
            unique_projects: relations.len(),
            version_conflicts: conflicts.len(),
            orphaned_files: orphans.len(),
            date_range,
        },
        file_types,
        naming_patterns: pattern_counts
            .into_iter()
            .map(|(pattern, count)| PatternCount { pattern, count })
            .collect(),
        project_breakdown,
        issues: IssueCounts {
            version_conflicts: conflicts.len(),
            orphaned_files: orphans.len(),
            unclassified_files,
        },
        recommendations,
    }
}

fn build_recommendations(
    pattern_counts: &[(String, usize)],
    conflicts: &[VersionConflictSet],
    orphans: &[OrphanRecord],
) -> Vec<Recommendation> {
    let mut recommendations = Vec::new();

    if !conflicts.is_empty() {
        recommendations.push(Recommendation {
            priority: Priority::High,
            category: "Version Control".to_string(),
            issue: format!(
                "{} sets of conflicting file versions detected",
                conflicts.len()
            ),
            recommendation:
                "Implement systematic version control with clear latest-version identification"
                    .to_string(),
            estimated_impact: format!(
                "{} minutes saved per search",
                conflicts.len() * MINUTES_SAVED_PER_CONFLICT
            ),
        });
    }

    if pattern_counts.len() > PATTERN_DIVERSITY_THRESHOLD {
        recommendations.push(Recommendation {
            priority: Priority::Medium,
            category: "Standardization".to_string(),
            issue: format!(
                "{} different naming conventions in use",
                pattern_counts.len()
            ),
            recommendation: "Standardize on single naming convention across all projects"
                .to_string(),
            estimated_impact: format!(
                "{}% reduction in file search time",
                SEARCH_TIME_REDUCTION_PCT
            ),
        });
    }

    if !orphans.is_empty() {
        let junk_count = orphans
            .iter()
            .filter(|o| o.reason == OrphanReason::JunkFolder)
            .count();
        let orphan_bytes: u64 = orphans.iter().map(|o| o.file.size_bytes).sum();
        recommendations.push(Recommendation {
            priority: Priority::Medium,
            category: "Organization".to_string(),
            issue: format!(
                "{} orphaned files ({} in misc/temp folders)",
                orphans.len(),
                junk_count
            ),
            recommendation: "Archive or categorize orphaned files to reduce clutter".to_string(),
            estimated_impact: format!(
                "{:.1} MB reclaimable",
                orphan_bytes as f64 / BYTES_PER_MB
            ),
        });
    }

    recommendations
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_archive_produces_zeroed_summary() {
        let report = assemble(&[], &BTreeMap::new(), Vec::new(), &[], &[]);
        assert_eq!(report.summary.total_files, 0);
        assert_eq!(report.summary.total_size_mb, 0.0);
        assert!(report.summary.date_range.is_none());
        assert!(report.recommendations.is_empty());
    }

    #[test]
    fn test_conflicts_raise_high_priority_recommendation() {
        let conflict = VersionConflictSet {
            base_name: "Plate_.dwg".to_string(),
            files: Vec::new(),
            conflict_count: 2,
            latest_file: "Plate_v2.dwg".to_string(),
            oldest_file: "Plate_v1.dwg".to_string(),
        };
        let report = assemble(&[], &BTreeMap::new(), Vec::new(), &[conflict], &[]);
        assert_eq!(report.recommendations.len(), 1);
        assert_eq!(report.recommendations[0].priority, Priority::High);
        assert_eq!(report.recommendations[0].category, "Version Control");
        assert_eq!(
            report.recommendations[0].estimated_impact,
            "10 minutes saved per search"
        );
    }

    #[test]
    fn test_pattern_diversity_recommendation_threshold() {
        let below: Vec<(String, usize)> = (0..3).map(|i| (format!("p{i}"), 1)).collect();
        let report = assemble(&[], &BTreeMap::new(), below, &[], &[]);
        assert!(report.recommendations.is_empty());

        let above: Vec<(String, usize)> = (0..4).map(|i| (format!("p{i}"), 1)).collect();
        let report = assemble(&[], &BTreeMap::new(), above, &[], &[]);
        assert_eq!(report.recommendations.len(), 1);
        assert_eq!(report.recommendations[0].category, "Standardization");
    }
}
