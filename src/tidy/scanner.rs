use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::{debug, warn};
use walkdir::WalkDir;

use super::naming::NamingConfig;
use super::planner::{plan_item, ItemPlan};
use super::stats::LibraryStatistics;
use crate::error::{TidyError, TidyResult};
use crate::metadata::{normalize, read_record, SIDECAR_FILENAME};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum IssueKind {
    /// A directory could not be listed; everything below it was skipped
    Subtree,
    /// An item's sidecar or listing could not be read; the item was skipped
    Item,
}

/// A non-fatal problem met while scanning
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScanIssue {
    pub kind: IssueKind,
    pub path: PathBuf,
    pub message: String,
}

/// Output of a library scan
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ScanResult {
    pub library_root: PathBuf,
    pub statistics: LibraryStatistics,
    /// Plans for items that need changes, in walk order
    pub plans: Vec<ItemPlan>,
    #[serde(default)]
    pub issues: Vec<ScanIssue>,
}

/// Scan a library and plan every item that is not already in place
pub fn scan_library(root: &Path, naming: &NamingConfig) -> TidyResult<ScanResult> {
    scan_library_with_progress(root, naming, |_| {})
}

/// Scan a library, calling `on_item` with each item directory as it is visited
pub fn scan_library_with_progress<F>(
    root: &Path,
    naming: &NamingConfig,
    mut on_item: F,
) -> TidyResult<ScanResult>
where
    F: FnMut(&Path),
{
    let root = resolve_root(root)?;
    let mut result = ScanResult {
        library_root: root.clone(),
        ..Default::default()
    };

    for entry in WalkDir::new(&root)
        .follow_links(true)
        .sort_by_file_name()
    {
        let entry = match entry {
            Ok(entry) => entry,
            Err(e) => {
                if let Some(link) = e.path().filter(|path| is_broken_link(path)) {
                    // Item listing skips it too; nothing below it to lose
                    warn!("Ignoring broken link: {}", link.display());
                    continue;
                }
                let path = e.path().unwrap_or(&root).to_path_buf();
                let err = TidyError::SubtreeRead {
                    path,
                    message: e.to_string(),
                };
                warn!("{}", err);
                result.issues.push(issue(IssueKind::Subtree, &err));
                continue;
            }
        };

        if !entry.file_type().is_file() || entry.file_name() != SIDECAR_FILENAME {
            continue;
        }

        let Some(item_dir) = entry.path().parent() else {
            continue;
        };
        on_item(item_dir);

        match scan_item(item_dir, entry.path(), naming, &root) {
            Ok((stats, plan)) => {
                result.statistics = std::mem::take(&mut result.statistics).merge(stats);
                if plan.has_changes {
                    result.plans.push(plan);
                } else {
                    debug!("Already in place: {}", item_dir.display());
                }
            }
            Err(err) => {
                warn!("Skipping item: {}", err);
                result.issues.push(issue(IssueKind::Item, &err));
            }
        }
    }

    Ok(result)
}

/// Canonical form of the library root, or `PathNotFound`
fn resolve_root(root: &Path) -> TidyResult<PathBuf> {
    let resolved = std::fs::canonicalize(root).map_err(|source| TidyError::PathNotFound {
        path: root.to_path_buf(),
        source: Some(source),
    })?;

    if !resolved.is_dir() {
        return Err(TidyError::PathNotFound {
            path: root.to_path_buf(),
            source: None,
        });
    }

    Ok(resolved)
}

/// Plan one item along with its own contribution to the library totals
fn scan_item(
    item_dir: &Path,
    sidecar: &Path,
    naming: &NamingConfig,
    root: &Path,
) -> TidyResult<(LibraryStatistics, ItemPlan)> {
    let record = read_record(sidecar)?;
    let (files, size) = list_files(item_dir)?;

    let item = normalize(&record);
    let plan = plan_item(item_dir, &item, &files, naming, root);

    Ok((LibraryStatistics::for_item(&item, size), plan))
}

/// Regular files directly inside an item directory, and their combined size
///
/// Only a failure to list the directory fails the item. An entry that
/// cannot be stat'ed on its own, such as a dangling symlink, is skipped.
fn list_files(dir: &Path) -> TidyResult<(Vec<PathBuf>, u64)> {
    let read_err = |source| TidyError::ItemRead {
        path: dir.to_path_buf(),
        source,
    };

    let mut files = Vec::new();
    let mut size = 0;

    for entry in std::fs::read_dir(dir).map_err(read_err)? {
        let path = entry.map_err(read_err)?.path();
        match std::fs::metadata(&path) {
            Ok(metadata) if metadata.is_file() => {
                size += metadata.len();
                files.push(path);
            }
            Ok(_) => {}
            Err(e) => warn!("Skipping {}: {}", path.display(), e),
        }
    }

    Ok((files, size))
}

/// A symlink whose target does not exist
fn is_broken_link(path: &Path) -> bool {
    path.symlink_metadata()
        .map(|meta| meta.file_type().is_symlink())
        .unwrap_or(false)
        && std::fs::metadata(path).is_err()
}

fn issue(kind: IssueKind, err: &TidyError) -> ScanIssue {
    let path = match err {
        TidyError::PathNotFound { path, .. }
        | TidyError::ItemRead { path, .. }
        | TidyError::Metadata { path, .. }
        | TidyError::SubtreeRead { path, .. }
        | TidyError::MoveIo { path, .. } => path.clone(),
        TidyError::MoveCollision { target } => target.clone(),
    };

    ScanIssue {
        kind,
        path,
        message: err.to_string(),
    }
}
