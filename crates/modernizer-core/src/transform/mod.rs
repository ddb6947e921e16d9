use crate::error::Error;
use crate::progress::ProgressReporter;
use crate::scanner::{self, FileRecord};
use chrono::Utc;
use discovery::ProjectGroup;
use lazy_static::lazy_static;
use regex::Regex;
use report::{CopyStatus, ProjectMapping, TransformationLogEntry, TransformationReport};
use rules::TransformRules;
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, error, info};

pub mod copier;
pub mod discovery;
pub mod naming;
pub mod report;
pub mod rules;

lazy_static! {
    static ref NON_ALPHANUMERIC: Regex = Regex::new(r"[^a-zA-Z0-9]").unwrap();
}

/// Transformation engine: discovers projects in a legacy archive and
/// rebuilds them under the standardized target layout with systematic
/// names. The source tree is read-only throughout.
pub struct ArchiveTransformer {
    source: PathBuf,
    target: PathBuf,
    rules: TransformRules,
    ignore_patterns: Vec<String>,
    cancel: Arc<AtomicBool>,
}

/// Mutable state owned by a single transformation run. Project and
/// per-type-code sequence counters live here, never in process-wide state,
/// so repeated runs over an unchanged source stay deterministic.
struct RunContext {
    project_counter: u32,
    mappings: Vec<ProjectMapping>,
    log: Vec<TransformationLogEntry>,
}

impl ArchiveTransformer {
    pub fn new(source: impl Into<PathBuf>, target: impl Into<PathBuf>) -> Self {
        Self {
            source: source.into(),
            target: target.into(),
            rules: TransformRules::default(),
            ignore_patterns: Vec::new(),
            cancel: Arc::new(AtomicBool::new(false)),
        }
    }

    pub fn with_rules(mut self, rules: TransformRules) -> Self {
        self.rules = rules;
        self
    }

    pub fn with_ignore_patterns(mut self, patterns: Vec<String>) -> Self {
        self.ignore_patterns = patterns;
        self
    }

    /// Cooperative cancellation flag, checked between files. Mid-copy
    /// cancellation is not supported.
    pub fn cancel_token(&self) -> Arc<AtomicBool> {
        Arc::clone(&self.cancel)
    }

    /// Discovery pass only: group source files into projects without
    /// creating or copying anything. Used for previews and dry runs.
    pub fn discover_projects(&self) -> Result<Vec<ProjectGroup>, Error> {
        let records = scanner::scan(&self.source, &self.ignore_patterns)?;
        let projects = discovery::discover_projects(&records);
        info!("Discovered {} projects", projects.len());
        Ok(projects)
    }

    /// Run the full transformation pipeline:
    /// 1. Scan the source and group files into projects
    /// 2. Create the target skeleton
    /// 3. Per project: assign the canonical id, build folders, rename and
    ///    copy each file
    /// 4. Assemble and persist the report
    ///
    /// Per-file copy failures are recorded in the audit log and never abort
    /// the batch; only a missing source root, malformed rules or
    /// cancellation end the run early.
    pub fn transform(&self, reporter: &dyn ProgressReporter) -> Result<TransformationReport, Error> {
        self.rules.validate()?;
        self.cancel.store(false, Ordering::Relaxed);

        info!(
            "Starting transformation: {} -> {}",
            self.source.display(),
            self.target.display(),
        );

        reporter.on_scan_start();
        let scan_start = Instant::now();
        let records = scanner::scan(&self.source, &self.ignore_patterns)?;
        reporter.on_scan_complete(records.len(), scan_start.elapsed().as_secs_f64());

        let projects = discovery::discover_projects(&records);
        reporter.on_discovery_complete(projects.len());
        info!("Discovered {} projects", projects.len());

        copier::create_target_skeleton(&self.target)?;

        let mut ctx = RunContext {
            project_counter: 1,
            mappings: Vec::new(),
            log: Vec::new(),
        };

        let total_files = records.len();
        reporter.on_copy_start(total_files);
        let copy_start = Instant::now();
        let mut processed = 0usize;

        for project in &projects {
            self.transform_project(project, &mut ctx, reporter, &mut processed, total_files)?;
        }

        let succeeded = ctx
            .log
            .iter()
            .filter(|entry| entry.status == CopyStatus::Success)
            .count();
        let failed = ctx.log.len() - succeeded;
        reporter.on_copy_complete(succeeded, failed, copy_start.elapsed().as_secs_f64());
        debug!(
            "Copy phase completed in {:.2}s — {} succeeded, {} failed",
            copy_start.elapsed().as_secs_f64(),
            succeeded,
            failed,
        );

        let report = report::assemble(&self.source, &self.target, &self.rules, ctx.mappings, ctx.log);

        let reports_dir = self.target.join(copier::REPORTS_DIR);
        report::write_json(&report, &reports_dir.join(report::REPORT_JSON_FILENAME))?;
        report::write_summary(&report, &reports_dir.join(report::REPORT_SUMMARY_FILENAME))?;

        info!(
            "Transformation complete. Success rate: {}%",
            report.transformation_summary.success_rate,
        );
        Ok(report)
    }

    fn transform_project(
        &self,
        project: &ProjectGroup,
        ctx: &mut RunContext,
        reporter: &dyn ProgressReporter,
        processed: &mut usize,
        total_files: usize,
    ) -> Result<(), Error> {
        let new_id = format!(
            "{}{:0width$}",
            self.rules.project_prefix,
            ctx.project_counter,
            width = self.rules.project_digits,
        );
        let clean_name = NON_ALPHANUMERIC.replace_all(&project.name, "");
        let folder_name = format!("{}_{}_{}", new_id, clean_name, project.year);

        ctx.mappings.push(ProjectMapping {
            original_name: project.name.clone(),
            new_id: new_id.clone(),
            folder_name: folder_name.clone(),
        });
        info!("Transforming project: {} -> {}", project.name, folder_name);

        let project_base = self.target.join(copier::PROJECTS_DIR).join(&folder_name);
        copier::create_project_dirs(&project_base, &self.rules)?;

        // Sequence numbers restart at 1 for every (project, type code) pair.
        let mut sequences: HashMap<&'static str, u32> = HashMap::new();

        for file in &project.files {
            if self.cancel.load(Ordering::Relaxed) {
                return Err(Error::Cancelled);
            }
            self.transform_file(file, &new_id, &project_base, &mut sequences, ctx);
            *processed += 1;
            reporter.on_copy_progress(*processed, total_files);
        }

        ctx.project_counter += 1;
        Ok(())
    }

    fn transform_file(
        &self,
        file: &FileRecord,
        project_id: &str,
        project_base: &Path,
        sequences: &mut HashMap<&'static str, u32>,
        ctx: &mut RunContext,
    ) {
        let category = self
            .rules
            .file_type_mapping
            .get(&file.extension)
            .map(String::as_str)
            .unwrap_or(rules::FALLBACK_CATEGORY);
        let folder = self
            .rules
            .folder_structure
            .get(category)
            .map(String::as_str)
            .unwrap_or(rules::FALLBACK_FOLDER);
        let target_folder = project_base.join(folder);

        let code = naming::type_code(&file.filename, &file.extension);
        let revision = naming::extract_revision(&file.filename, &self.rules.revision_format);
        let description = naming::generate_description(&file.filename, code);
        let sequence = *sequences.entry(code).or_insert(1);
        let new_filename = naming::compose_filename(
            &self.rules,
            project_id,
            code,
            sequence,
            &description,
            &revision,
            &file.extension,
        );
        let target_path = target_folder.join(&new_filename);

        match execute_copy(&file.path, &target_folder, &target_path) {
            Ok(()) => {
                ctx.log.push(TransformationLogEntry {
                    timestamp: Utc::now(),
                    source_path: file.path.display().to_string(),
                    target_path: Some(target_path.display().to_string()),
                    original_filename: file.filename.clone(),
                    new_filename: Some(new_filename),
                    project_id: project_id.to_string(),
                    file_size: file.size_bytes,
                    status: CopyStatus::Success,
                    error: None,
                });
                sequences.insert(code, sequence + 1);
            }
            Err(err) => {
                error!("Failed to transform {}: {}", file.filename, err);
                ctx.log.push(TransformationLogEntry {
                    timestamp: Utc::now(),
                    source_path: file.path.display().to_string(),
                    target_path: None,
                    original_filename: file.filename.clone(),
                    new_filename: None,
                    project_id: project_id.to_string(),
                    file_size: file.size_bytes,
                    status: CopyStatus::Failed,
                    error: Some(err.to_string()),
                });
            }
        }
    }
}

fn execute_copy(source: &Path, target_folder: &Path, target_path: &Path) -> std::io::Result<()> {
    // Fallback-category folders are not part of the fixed skeleton.
    fs::create_dir_all(target_folder)?;
    copier::copy_file(source, target_path)?;
    Ok(())
}
