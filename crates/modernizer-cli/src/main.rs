mod commands;
mod logging;
mod progress;

use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::process;

use clap::{CommandFactory, Parser};
use colored::*;
use commands::{Cli, Commands};
use dotenv::dotenv;
use modernizer_core::{AnalysisReport, ArchiveAnalyzer, ArchiveTransformer, TransformRules};
use progress::CliReporter;
use tracing::{error, info};

fn main() -> anyhow::Result<()> {
    dotenv().ok();

    let _guard = logging::init_logger();

    let args = Cli::parse();

    match args.command {
        Some(Commands::Analyze { path, output }) => {
            if let Err(err) = run_analyze(&path, output.as_deref()) {
                error!("Error: {}", err);
                process::exit(1);
            }
        }
        Some(Commands::Transform {
            source,
            target,
            rules,
            dry_run,
            yes,
        }) => {
            if let Err(err) = run_transform(&source, &target, rules.as_deref(), dry_run, yes) {
                error!("Error: {}", err);
                process::exit(1);
            }
        }
        Some(Commands::PrintRules) => {
            println!("{}", serde_json::to_string_pretty(&TransformRules::default())?);
        }
        None => {
            let _ = Cli::command().print_long_help();
        }
    }

    Ok(())
}

fn run_analyze(path: &Path, output: Option<&Path>) -> anyhow::Result<()> {
    let analyzer = ArchiveAnalyzer::new(path);
    let reporter = CliReporter::new();
    let report = analyzer.analyze(&reporter)?;

    match output {
        Some(output_path) => {
            fs::write(output_path, serde_json::to_string_pretty(&report)?)?;
            info!("Analysis report saved to: {}", output_path.display());
        }
        None => print_analysis_summary(&report),
    }

    Ok(())
}

fn print_analysis_summary(report: &AnalysisReport) {
    println!();
    println!("{}", "=".repeat(50));
    println!("ARCHIVE ANALYSIS REPORT");
    println!("{}", "=".repeat(50));
    println!("Total Files: {}", report.summary.total_files);
    println!("Total Size: {} MB", report.summary.total_size_mb);
    println!("Projects Identified: {}", report.summary.unique_projects);
    println!(
        "Version Conflicts: {}",
        format!("{}", report.summary.version_conflicts).red()
    );
    println!(
        "Orphaned Files: {}",
        format!("{}", report.summary.orphaned_files).yellow()
    );

    println!("\nFile Types:");
    for entry in &report.file_types {
        println!("  {}: {} files", entry.extension, entry.count);
    }

    println!("\nRecommendations:");
    for rec in &report.recommendations {
        println!(
            "  [{}] {}: {}",
            format!("{:?}", rec.priority).to_uppercase().cyan(),
            rec.category,
            rec.recommendation
        );
    }
}

fn run_transform(
    source: &Path,
    target: &Path,
    rules_path: Option<&Path>,
    dry_run: bool,
    yes: bool,
) -> anyhow::Result<()> {
    let rules = match rules_path {
        Some(path) => TransformRules::load(path)?,
        None => TransformRules::default(),
    };

    let transformer = ArchiveTransformer::new(source, target).with_rules(rules);

    if dry_run {
        info!("DRY RUN MODE - No files will be copied");
        let projects = transformer.discover_projects()?;
        println!("\nWould transform {} projects:", projects.len());
        for project in &projects {
            println!("  {}: {} files", project.name, project.files.len());
        }
        return Ok(());
    }

    if !yes && target_is_non_empty(target)? {
        let prompt = format!(
            "Target directory {} is not empty. Continue?",
            target.display()
        );
        if !prompt_confirm(&prompt, Some(false))? {
            process::exit(0);
        }
    }

    let reporter = CliReporter::new();
    let report = transformer.transform(&reporter)?;
    let summary = &report.transformation_summary;

    println!();
    info!(
        "{} projects, {} files transformed, success rate {}",
        format!("{}", summary.total_projects).green(),
        format!(
            "{}/{}",
            summary.successful_transformations, summary.total_files_processed
        )
        .green(),
        format!("{}%", summary.success_rate).green(),
    );
    if summary.failed_transformations > 0 {
        info!(
            "{} files failed — see the detailed log",
            format!("{}", summary.failed_transformations).red(),
        );
    }
    info!(
        "Report saved to: {}",
        PathBuf::from(target).join("Migration_Reports").display()
    );

    Ok(())
}

fn target_is_non_empty(target: &Path) -> io::Result<bool> {
    if !target.exists() {
        return Ok(false);
    }
    Ok(fs::read_dir(target)?.next().is_some())
}

fn prompt_confirm(prompt: &str, default: Option<bool>) -> io::Result<bool> {
    let mut input = String::new();

    loop {
        input.clear();

        match default {
            Some(true) => print!("{} (Y/n): ", prompt),
            Some(false) | None => print!("{} (y/N): ", prompt),
        }
        io::stdout().flush()?;

        io::stdin().read_line(&mut input)?;

        match input.trim().to_uppercase().as_str() {
            "Y" => return Ok(true),
            "N" => return Ok(false),
            "" => match default {
                Some(default) => return Ok(default),
                None => continue,
            },
            _ => continue,
        }
    }
}
