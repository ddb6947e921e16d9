use super::rules::TransformRules;
use crate::error::Error;
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

const BYTES_PER_MB: f64 = 1024.0 * 1024.0;

pub const REPORT_JSON_FILENAME: &str = "transformation_report.json";
pub const REPORT_SUMMARY_FILENAME: &str = "transformation_summary.txt";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum CopyStatus {
    Success,
    Failed,
}

/// One audit entry per attempted file, success or failure.
#[derive(Debug, Clone, Serialize)]
pub struct TransformationLogEntry {
    pub timestamp: DateTime<Utc>,
    pub source_path: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub target_path: Option<String>,
    pub original_filename: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub new_filename: Option<String>,
    pub project_id: String,
    pub file_size: u64,
    pub status: CopyStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// Mapping from an original project name to its canonical identity,
/// recorded in first-encounter order.
#[derive(Debug, Clone, Serialize)]
pub struct ProjectMapping {
    pub original_name: String,
    pub new_id: String,
    pub folder_name: String,
}

#[derive(Debug, Serialize)]
pub struct TransformationSummary {
    pub timestamp: DateTime<Utc>,
    pub source_path: String,
    pub target_path: String,
    pub total_projects: usize,
    pub total_files_processed: usize,
    pub successful_transformations: usize,
    pub failed_transformations: usize,
    pub success_rate: f64,
    pub total_size_mb: f64,
}

#[derive(Debug, Serialize)]
pub struct TransformationReport {
    pub transformation_summary: TransformationSummary,
    pub project_mappings: Vec<ProjectMapping>,
    pub transformation_rules: TransformRules,
    pub detailed_log: Vec<TransformationLogEntry>,
}

/// Success rate as a percentage, defined as 0 for an empty run rather than
/// a division fault.
pub fn success_rate(succeeded: usize, total: usize) -> f64 {
    if total == 0 {
        0.0
    } else {
        round2(succeeded as f64 / total as f64 * 100.0)
    }
}

/// Fold the append-only log into the final report.
pub fn assemble(
    source: &Path,
    target: &Path,
    rules: &TransformRules,
    mappings: Vec<ProjectMapping>,
    log: Vec<TransformationLogEntry>,
) -> TransformationReport {
    let total = log.len();
    let succeeded = log
        .iter()
        .filter(|entry| entry.status == CopyStatus::Success)
        .count();
    let copied_bytes: u64 = log
        .iter()
        .filter(|entry| entry.status == CopyStatus::Success)
        .map(|entry| entry.file_size)
        .sum();

    TransformationReport {
        transformation_summary: TransformationSummary {
            timestamp: Utc::now(),
            source_path: source.display().to_string(),
            target_path: target.display().to_string(),
            total_projects: mappings.len(),
            total_files_processed: total,
            successful_transformations: succeeded,
            failed_transformations: total - succeeded,
            success_rate: success_rate(succeeded, total),
            total_size_mb: round2(copied_bytes as f64 / BYTES_PER_MB),
        },
        project_mappings: mappings,
        transformation_rules: rules.clone(),
        detailed_log: log,
    }
}

/// Persist the machine-readable report.
pub fn write_json(report: &TransformationReport, path: &Path) -> Result<(), Error> {
    let file = File::create(path)?;
    serde_json::to_writer_pretty(BufWriter::new(file), report)?;
    Ok(())
}

/// Persist the human-readable summary: header, counts, project mappings
/// and any failures.
pub fn write_summary(report: &TransformationReport, path: &Path) -> Result<(), Error> {
    let summary = &report.transformation_summary;
    let mut out = BufWriter::new(File::create(path)?);

    writeln!(out, "ARCHIVE TRANSFORMATION SUMMARY")?;
    writeln!(out, "{}", "=".repeat(50))?;
    writeln!(out)?;
    writeln!(
        out,
        "Transformation completed: {}",
        summary.timestamp.format("%Y-%m-%d %H:%M:%S")
    )?;
    writeln!(out, "Source: {}", summary.source_path)?;
    writeln!(out, "Target: {}", summary.target_path)?;
    writeln!(out)?;
    writeln!(out, "Projects processed: {}", summary.total_projects)?;
    writeln!(
        out,
        "Files transformed: {}/{}",
        summary.successful_transformations, summary.total_files_processed
    )?;
    writeln!(out, "Success rate: {}%", summary.success_rate)?;
    writeln!(out, "Total size: {} MB", summary.total_size_mb)?;
    writeln!(out)?;

    writeln!(out, "PROJECT MAPPINGS:")?;
    writeln!(out, "{}", "-".repeat(30))?;
    for mapping in &report.project_mappings {
        writeln!(out, "{} -> {}", mapping.original_name, mapping.folder_name)?;
    }

    if summary.failed_transformations > 0 {
        writeln!(out)?;
        writeln!(
            out,
            "FAILED TRANSFORMATIONS ({}):",
            summary.failed_transformations
        )?;
        writeln!(out, "{}", "-".repeat(30))?;
        for entry in &report.detailed_log {
            if entry.status == CopyStatus::Failed {
                writeln!(
                    out,
                    "{}: {}",
                    entry.original_filename,
                    entry.error.as_deref().unwrap_or("Unknown error")
                )?;
            }
        }
    }

    out.flush()?;
    Ok(())
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}
