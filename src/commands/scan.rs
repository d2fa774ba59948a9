use anyhow::{Context, Result};
use colored::Colorize;
use std::path::{Path, PathBuf};

use super::scan_with_status;
use crate::config::Config;
use crate::tidy::scanner::ScanIssue;
use crate::tidy::stats::LibraryStatistics;
use crate::tidy::{tree, FileFormat, FolderFormat, ScanResult};

/// Run the scan command - plan changes without touching the library
#[allow(clippy::too_many_arguments)]
pub fn run(
    config_path: Option<&Path>,
    library_override: Option<&PathBuf>,
    folder_format: Option<FolderFormat>,
    file_format: Option<FileFormat>,
    json: bool,
    save: Option<&Path>,
    tree_view: bool,
    quiet: bool,
) -> Result<()> {
    let config = Config::load(config_path).context("Failed to load config")?;

    let library = config
        .library(library_override)
        .context("No library specified. Set [library] path in config or pass a path")?;

    let naming = config.naming(folder_format, file_format);
    let result = scan_with_status(&library, &naming, quiet || json)?;

    if let Some(save_path) = save {
        save_plans(&result, save_path)?;
    }

    if json {
        println!("{}", serde_json::to_string_pretty(&result)?);
        return Ok(());
    }

    if !quiet {
        print_statistics(&result.statistics);
        println!();
    }

    print_plans(&result, tree_view);
    print_issues(&result.issues);

    if let Some(save_path) = save {
        println!();
        println!("Plans saved to {}", save_path.display());
    }

    if !result.plans.is_empty() && !quiet {
        println!();
        println!(
            "Run {} to preview, then add {} to move files.",
            "tidylibrary apply".cyan(),
            "--no-dry-run".cyan()
        );
    }

    Ok(())
}

fn save_plans(result: &ScanResult, path: &Path) -> Result<()> {
    let content = serde_json::to_string_pretty(result)?;
    std::fs::write(path, content).with_context(|| format!("Failed to write {:?}", path))
}

fn print_statistics(stats: &LibraryStatistics) {
    let summary = stats.summary();

    println!("{}", "Library statistics".bold());
    println!("  Items:      {}", summary.items);
    println!("  Authors:    {}", summary.authors);
    println!("  Narrators:  {}", summary.narrators);
    println!("  Series:     {}", summary.series);
    println!("  Standalone: {}", summary.standalone_count);
    println!("  Duration:   {}", summary.formatted_duration);
    println!("  Size:       {}", summary.formatted_size);
}

fn print_plans(result: &ScanResult, tree_view: bool) {
    if result.plans.is_empty() {
        println!(
            "{} All {} item(s) are already tidy!",
            "✓".green(),
            result.statistics.items
        );
        return;
    }

    println!(
        "{} item(s) need changes",
        result.plans.len().to_string().yellow()
    );
    println!();

    if tree_view {
        print!("{}", tree::render_tree(&result.plans, &result.library_root));
    } else {
        print!("{}", tree::render_list(&result.plans));
    }
}

fn print_issues(issues: &[ScanIssue]) {
    if issues.is_empty() {
        return;
    }

    println!();
    println!(
        "{}: {} path(s) could not be scanned",
        "Warning".yellow().bold(),
        issues.len()
    );
    for issue in issues {
        println!("  {}", issue.message);
    }
}
