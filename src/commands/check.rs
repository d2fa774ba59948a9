use anyhow::{bail, Result};
use colored::Colorize;
use std::path::Path;
use walkdir::WalkDir;

use crate::metadata::SIDECAR_FILENAME;

/// Run the check command - validate that a path looks like a library
pub fn run(path: &Path) -> Result<()> {
    if !path.exists() {
        bail!("Path does not exist: {:?}", path);
    }
    if !path.is_dir() {
        bail!("Path is not a directory: {:?}", path);
    }

    let count = count_sidecars(path);

    if count > 0 {
        println!(
            "{} {:?} looks like a library: {} {} file(s) found",
            "✓".green(),
            path,
            count,
            SIDECAR_FILENAME
        );
    } else {
        println!(
            "{}: no {} files found under {:?}",
            "Warning".yellow().bold(),
            SIDECAR_FILENAME,
            path
        );
    }

    Ok(())
}

/// Count sidecar files anywhere under `dir`, skipping unreadable subtrees
fn count_sidecars(dir: &Path) -> usize {
    WalkDir::new(dir)
        .follow_links(true)
        .into_iter()
        .filter_map(|e| e.ok())
        .filter(|e| e.file_type().is_file() && e.file_name() == SIDECAR_FILENAME)
        .count()
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_count_sidecars() {
        let temp = TempDir::new().unwrap();
        assert_eq!(count_sidecars(temp.path()), 0);

        for dir in ["a", "b/c", "b/c/d"] {
            let item = temp.path().join(dir);
            std::fs::create_dir_all(&item).unwrap();
            std::fs::write(item.join("metadata.json"), "{}").unwrap();
        }
        std::fs::write(temp.path().join("a/other.json"), "{}").unwrap();

        assert_eq!(count_sidecars(temp.path()), 3);
    }

    #[test]
    fn test_missing_path_fails() {
        assert!(run(Path::new("/nonexistent/library")).is_err());
    }
}
