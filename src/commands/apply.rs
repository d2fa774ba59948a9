use anyhow::{Context, Result};
use colored::Colorize;
use std::collections::BTreeSet;
use std::ops::ControlFlow;
use std::path::{Path, PathBuf};

use super::scan_with_status;
use crate::config::Config;
use crate::tidy::{
    execute_with_progress, EventLog, ExecuteOptions, ExecutionResult, FileFormat, FolderFormat,
    ItemPlan, ScanResult,
};

/// Run the apply command - execute plans from a saved file or a fresh scan
#[allow(clippy::too_many_arguments)]
pub fn run(
    config_path: Option<&Path>,
    library_override: Option<&PathBuf>,
    plan_file: Option<&Path>,
    only: Option<&[usize]>,
    folder_format: Option<FolderFormat>,
    file_format: Option<FileFormat>,
    no_dry_run: bool,
    quiet: bool,
) -> Result<()> {
    let config = Config::load(config_path).context("Failed to load config")?;

    let scan = match plan_file {
        Some(file) => load_plans(file)?,
        None => {
            let library = config
                .library(library_override)
                .context("No library specified. Set [library] path in config or pass a path")?;
            let naming = config.naming(folder_format, file_format);
            scan_with_status(&library, &naming, quiet)?
        }
    };

    let plans = select_plans(&scan.plans, only);
    if plans.is_empty() {
        println!("{} Nothing to apply.", "✓".green());
        return Ok(());
    }

    let options = ExecuteOptions {
        dry_run: !no_dry_run,
        log: config.log_path(&scan.library_root).map(EventLog::new),
    };

    if options.dry_run {
        println!("Previewing {} item(s)...", plans.len());
    } else {
        println!("{}", format!("Applying {} item(s)...", plans.len()).green());
    }

    let result = execute_with_progress(&plans, &options, |_, plan, outcome| {
        match outcome {
            Ok(report) if report.succeeded() => {
                println!(
                    "  {} {} ({} file(s) moved)",
                    "✓".green(),
                    plan.new_relative_dir.display(),
                    report.moved
                );
            }
            Ok(report) => {
                println!(
                    "  {} {} ({} file(s) failed)",
                    "✗".red(),
                    plan.new_relative_dir.display(),
                    report.failed
                );
            }
            Err(err) => {
                println!("  {} {}: {}", "✗".red(), plan.old_relative_dir.display(), err);
            }
        }
        ControlFlow::Continue(())
    });

    print_result(&result);

    if let Some(log) = &options.log {
        println!("Event log: {}", log.path().display());
    }

    if options.dry_run {
        println!();
        println!("{}", "Dry run - no files moved.".yellow());
        println!("Run with {} to move files.", "--no-dry-run".cyan());
    }

    Ok(())
}

fn load_plans(path: &Path) -> Result<ScanResult> {
    let content =
        std::fs::read_to_string(path).with_context(|| format!("Failed to read {:?}", path))?;
    serde_json::from_str(&content).with_context(|| format!("Failed to parse plan file {:?}", path))
}

/// Pick plans by index; out-of-range indices are ignored and duplicates collapse
fn select_plans(plans: &[ItemPlan], only: Option<&[usize]>) -> Vec<ItemPlan> {
    match only {
        None => plans.to_vec(),
        Some(indices) => indices
            .iter()
            .copied()
            .collect::<BTreeSet<_>>()
            .into_iter()
            .filter_map(|i| plans.get(i).cloned())
            .collect(),
    }
}

fn print_result(result: &ExecutionResult) {
    println!();
    println!(
        "{} {} applied, {} error(s), {} collision(s)",
        "Done!".green().bold(),
        result.applied_count,
        result.error_count,
        result.collisions.len()
    );

    if !result.collisions.is_empty() {
        println!();
        println!(
            "{}: target already exists, source left in place:",
            "Collisions".yellow().bold()
        );
        for name in &result.collisions {
            println!("  {}", name);
        }
    }
}
