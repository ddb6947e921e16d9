use crate::error::Error;
use crate::progress::ProgressReporter;
use crate::scanner;
use report::AnalysisReport;
use std::path::PathBuf;
use std::time::Instant;
use tracing::{debug, info};

pub mod conflicts;
pub mod orphans;
pub mod patterns;
pub mod relationships;
pub mod report;

/// Read-only analysis engine for a legacy archive.
pub struct ArchiveAnalyzer {
    root: PathBuf,
    ignore_patterns: Vec<String>,
}

impl ArchiveAnalyzer {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            ignore_patterns: Vec::new(),
        }
    }

    pub fn with_ignore_patterns(mut self, patterns: Vec<String>) -> Self {
        self.ignore_patterns = patterns;
        self
    }

    /// Run the full analysis pipeline:
    /// 1. Discover files and metadata
    /// 2. Classify naming conventions
    /// 3. Map project relationships
    /// 4. Detect version conflicts
    /// 5. Flag orphaned files
    /// 6. Assemble the report
    ///
    /// The source tree is never modified.
    pub fn analyze(&self, reporter: &dyn ProgressReporter) -> Result<AnalysisReport, Error> {
        info!("Starting analysis of archive: {}", self.root.display());

        reporter.on_scan_start();
        let scan_start = Instant::now();
        let records = scanner::scan(&self.root, &self.ignore_patterns)?;
        let scan_duration = scan_start.elapsed();
        reporter.on_scan_complete(records.len(), scan_duration.as_secs_f64());
        debug!(
            "Scan completed in {:.2}s — {} files",
            scan_duration.as_secs_f64(),
            records.len(),
        );

        info!("Identifying naming patterns...");
        let pattern_counts = patterns::pattern_histogram(records.iter().map(|r| &r.filename));

        info!("Mapping file relationships...");
        let relations = relationships::map_relationships(&records);

        info!("Detecting version conflicts...");
        let conflicts = conflicts::detect_conflicts(&records);

        info!("Identifying orphaned files...");
        let orphans = orphans::detect_orphans(&records);

        info!("Generating analysis report...");
        let report = report::assemble(&records, &relations, pattern_counts, &conflicts, &orphans);
        debug!(
            "{} projects, {} conflicts, {} orphans",
            report.summary.unique_projects,
            report.summary.version_conflicts,
            report.summary.orphaned_files,
        );

        Ok(report)
    }
}
