use serde::{Deserialize, Serialize};
use std::collections::{BTreeSet, HashSet};
use std::ops::ControlFlow;
use std::path::{Path, PathBuf};
use tracing::{debug, error, info, warn};

use super::event_log::EventLog;
use super::planner::{FileMove, ItemPlan};
use crate::error::TidyError;

/// Outcome of an `execute` call
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ExecutionResult {
    pub applied_count: usize,
    pub error_count: usize,
    /// Intended file names whose target was already occupied, sorted and unique
    pub collisions: Vec<String>,
}

#[derive(Debug, Clone, Default)]
pub struct ExecuteOptions {
    /// Report what would happen without touching the filesystem
    pub dry_run: bool,
    pub log: Option<EventLog>,
}

/// What happened to a single plan
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PlanReport {
    pub moved: usize,
    pub collisions: Vec<String>,
    pub failed: usize,
}

impl PlanReport {
    pub fn succeeded(&self) -> bool {
        self.failed == 0
    }
}

/// Apply plans in order, each one independently
#[allow(dead_code)]
pub fn execute(plans: &[ItemPlan], options: &ExecuteOptions) -> ExecutionResult {
    execute_with_progress(plans, options, |_, _, _| ControlFlow::Continue(()))
}

/// Apply plans in order, calling `on_plan` after each one
///
/// Returning `ControlFlow::Break` stops before the next plan; whatever was
/// already moved stays moved.
pub fn execute_with_progress<F>(
    plans: &[ItemPlan],
    options: &ExecuteOptions,
    mut on_plan: F,
) -> ExecutionResult
where
    F: FnMut(usize, &ItemPlan, &Result<PlanReport, TidyError>) -> ControlFlow<()>,
{
    let executor = Executor { options };
    let mut result = ExecutionResult::default();
    let mut collisions = BTreeSet::new();

    executor.log(&format!(
        "--- SESSION START: {} item(s) (dry_run={}) ---",
        plans.len(),
        options.dry_run
    ));

    for (index, plan) in plans.iter().enumerate() {
        let outcome = executor.apply(plan);

        match &outcome {
            Ok(report) => {
                collisions.extend(report.collisions.iter().cloned());
                if report.succeeded() {
                    result.applied_count += 1;
                } else {
                    result.error_count += 1;
                }
            }
            Err(err) => {
                error!("{}", err);
                executor.log(&format!("ERROR: {}", err));
                result.error_count += 1;
            }
        }

        if on_plan(index, plan, &outcome).is_break() {
            info!("Execution stopped after {} of {} item(s)", index + 1, plans.len());
            executor.log("--- ABORTED ---");
            break;
        }
    }

    result.collisions = collisions.into_iter().collect();

    executor.log(&format!(
        "--- SESSION END: {} applied, {} error(s), {} collision(s) ---",
        result.applied_count,
        result.error_count,
        result.collisions.len()
    ));

    result
}

struct Executor<'a> {
    options: &'a ExecuteOptions,
}

impl Executor<'_> {
    fn log(&self, message: &str) {
        if let Some(log) = &self.options.log {
            log.record(message);
        }
    }

    fn apply(&self, plan: &ItemPlan) -> Result<PlanReport, TidyError> {
        let dry_run = self.options.dry_run;
        let prefix = if dry_run { "[DRY RUN] " } else { "" };

        if plan.folder_changed() {
            self.log(&format!(
                "{}DIR: {} -> {}",
                prefix,
                plan.source_dir.display(),
                plan.target_dir.display()
            ));
        }

        if !dry_run {
            std::fs::create_dir_all(&plan.target_dir).map_err(|source| TidyError::MoveIo {
                action: "create directory",
                path: plan.target_dir.clone(),
                source,
            })?;
        }

        let mut report = PlanReport::default();
        let mut moves = MoveState::default();

        for file in rename_order(plan) {
            let target = plan.target_dir.join(&file.new_name);

            if moves.is_occupied(&target) {
                let err = TidyError::MoveCollision {
                    target: target.clone(),
                };
                warn!("{}", err);
                self.log(&format!("{}COLLISION: {}", prefix, target.display()));
                report.collisions.push(file.new_name.clone());
                continue;
            }

            if dry_run {
                self.log(&format!(
                    "{}MOVE: {} -> {}",
                    prefix,
                    file.old_path.display(),
                    target.display()
                ));
                moves.record(&file.old_path, target);
                report.moved += 1;
                continue;
            }

            match std::fs::rename(&file.old_path, &target) {
                Ok(()) => {
                    debug!("Moved {} -> {}", file.old_path.display(), target.display());
                    self.log(&format!(
                        "MOVE: {} -> {}",
                        file.old_path.display(),
                        target.display()
                    ));
                    moves.record(&file.old_path, target);
                    report.moved += 1;
                }
                Err(source) => {
                    let err = TidyError::MoveIo {
                        action: "move",
                        path: file.old_path.clone(),
                        source,
                    };
                    error!("{}", err);
                    self.log(&format!("ERROR: {}", err));
                    report.failed += 1;
                }
            }
        }

        if !dry_run && plan.folder_changed() {
            for removed in remove_empty_dirs(&plan.source_dir, &plan.library_root) {
                self.log(&format!("REMOVED EMPTY DIR: {}", removed.display()));
            }
        }

        Ok(report)
    }
}

/// Paths vacated and filled so far within one plan
///
/// In a dry run nothing moves on disk, so this is what keeps the collision
/// check in step with a real run.
#[derive(Default)]
struct MoveState {
    vacated: HashSet<PathBuf>,
    filled: HashSet<PathBuf>,
}

impl MoveState {
    fn is_occupied(&self, target: &Path) -> bool {
        self.filled.contains(target)
            || (target.symlink_metadata().is_ok() && !self.vacated.contains(target))
    }

    fn record(&mut self, source: &Path, target: PathBuf) {
        self.filled.remove(source);
        self.vacated.insert(source.to_path_buf());
        self.vacated.remove(&target);
        self.filled.insert(target);
    }
}

/// File moves of a plan in an order where no file targets a name another
/// file of the same plan still holds
///
/// Files already at their target are left out. A cycle cannot be ordered;
/// its members are returned last and meet the usual collision check.
fn rename_order(plan: &ItemPlan) -> Vec<&FileMove> {
    let mut pending: Vec<&FileMove> = plan
        .file_moves
        .iter()
        .filter(|file| plan.target_dir.join(&file.new_name) != file.old_path)
        .collect();
    let mut ordered = Vec::with_capacity(pending.len());

    while !pending.is_empty() {
        let held: HashSet<&Path> = pending
            .iter()
            .copied()
            .map(|file| file.old_path.as_path())
            .collect();
        let (ready, blocked): (Vec<&FileMove>, Vec<&FileMove>) = pending
            .into_iter()
            .partition(|file| !held.contains(plan.target_dir.join(&file.new_name).as_path()));

        if ready.is_empty() {
            ordered.extend(blocked);
            break;
        }
        ordered.extend(ready);
        pending = blocked;
    }

    ordered
}

/// Remove `start` and its ancestors while they are empty, stopping below `root`
///
/// Returns the directories actually removed. Any failure simply ends the
/// climb; `remove_dir` itself refuses non-empty directories.
fn remove_empty_dirs(start: &Path, root: &Path) -> Vec<PathBuf> {
    let mut removed = Vec::new();
    let mut current = Some(start);

    while let Some(dir) = current {
        if dir == root || !dir.starts_with(root) || !is_empty_dir(dir) {
            break;
        }
        if std::fs::remove_dir(dir).is_err() {
            break;
        }
        removed.push(dir.to_path_buf());
        current = dir.parent();
    }

    removed
}

fn is_empty_dir(dir: &Path) -> bool {
    std::fs::read_dir(dir)
        .map(|mut entries| entries.next().is_none())
        .unwrap_or(false)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tidy::naming::NamingConfig;
    use crate::tidy::scanner::scan_library;
    use std::fs;
    use tempfile::TempDir;

    fn write_item(root: &Path, dir: &str, metadata: &str, files: &[(&str, &str)]) -> PathBuf {
        let item_dir = root.join(dir);
        fs::create_dir_all(&item_dir).unwrap();
        fs::write(item_dir.join("metadata.json"), metadata).unwrap();
        for (name, content) in files {
            fs::write(item_dir.join(name), content).unwrap();
        }
        item_dir
    }

    const MISTBORN: &str =
        r#"{"title": "The Final Empire", "author": "Brandon Sanderson", "series": "Mistborn #1"}"#;

    fn scan(root: &Path) -> Vec<ItemPlan> {
        scan_library(root, &NamingConfig::default()).unwrap().plans
    }

    fn apply(plans: &[ItemPlan]) -> ExecutionResult {
        execute(plans, &ExecuteOptions::default())
    }

    #[test]
    fn test_execute_moves_and_reaches_fixed_point() {
        let temp = TempDir::new().unwrap();
        let source = write_item(
            temp.path(),
            "incoming/mistborn",
            MISTBORN,
            &[("track2.mp3", "two"), ("track1.mp3", "one")],
        );

        let plans = scan(temp.path());
        let result = apply(&plans);
        assert_eq!(result.applied_count, 1);
        assert_eq!(result.error_count, 0);
        assert!(result.collisions.is_empty());

        let target = plans[0].target_dir.clone();
        assert_eq!(
            fs::read_to_string(
                target.join("Brandon Sanderson - Mistborn 01 - The Final Empire - 01.mp3")
            )
            .unwrap(),
            "one"
        );
        assert_eq!(
            fs::read_to_string(
                target.join("Brandon Sanderson - Mistborn 01 - The Final Empire - 02.mp3")
            )
            .unwrap(),
            "two"
        );
        assert!(target.join("metadata.json").exists());

        // Both the item directory and its now-empty parent are gone
        assert!(!source.exists());
        assert!(!temp.path().join("incoming").exists());
        assert!(temp.path().exists());

        assert!(scan(temp.path()).is_empty());
    }

    #[test]
    fn test_collision_leaves_source_untouched() {
        let temp = TempDir::new().unwrap();
        let source = write_item(temp.path(), "incoming", MISTBORN, &[("book.m4b", "new copy")]);

        let plans = scan(temp.path());
        let target = plans[0].target_dir.clone();
        fs::create_dir_all(&target).unwrap();
        let occupied = target.join("Brandon Sanderson - Mistborn 01 - The Final Empire.m4b");
        fs::write(&occupied, "existing").unwrap();

        let result = apply(&plans);

        assert_eq!(
            result.collisions,
            vec!["Brandon Sanderson - Mistborn 01 - The Final Empire.m4b"]
        );
        assert_eq!(result.applied_count, 1);
        assert_eq!(fs::read_to_string(&occupied).unwrap(), "existing");
        assert_eq!(
            fs::read_to_string(source.join("book.m4b")).unwrap(),
            "new copy"
        );
        // metadata.json still moved, but the directory is not empty so it stays
        assert!(target.join("metadata.json").exists());
        assert!(source.exists());
    }

    #[test]
    fn test_non_empty_source_is_kept() {
        let temp = TempDir::new().unwrap();
        let source = write_item(temp.path(), "incoming", MISTBORN, &[("book.m4b", "x")]);
        fs::create_dir(source.join("extras")).unwrap();

        let plans = scan(temp.path());
        let result = apply(&plans);

        assert_eq!(result.applied_count, 1);
        assert!(source.join("extras").exists());
    }

    #[test]
    fn test_dry_run_changes_nothing() {
        let temp = TempDir::new().unwrap();
        let source = write_item(temp.path(), "incoming", MISTBORN, &[("book.m4b", "x")]);
        let log = EventLog::new(temp.path().join("events.txt"));

        let plans = scan(temp.path());
        let options = ExecuteOptions {
            dry_run: true,
            log: Some(log.clone()),
        };
        let result = execute(&plans, &options);

        assert_eq!(result.applied_count, 1);
        assert!(source.join("book.m4b").exists());
        assert!(!plans[0].target_dir.exists());

        let content = fs::read_to_string(log.path()).unwrap();
        assert!(content.contains("SESSION START: 1 item(s) (dry_run=true)"));
        assert!(content.contains("[DRY RUN] MOVE:"));
        assert!(content.contains("SESSION END: 1 applied"));
    }

    #[test]
    fn test_rename_in_place() {
        let temp = TempDir::new().unwrap();
        let dir = write_item(
            temp.path(),
            "Brandon Sanderson/Mistborn/01 The Final Empire",
            MISTBORN,
            &[("book.m4b", "x")],
        );

        let plans = scan(temp.path());
        assert_eq!(plans.len(), 1);
        assert!(!plans[0].folder_changed());

        let result = apply(&plans);
        assert_eq!(result.applied_count, 1);
        assert!(dir
            .join("Brandon Sanderson - Mistborn 01 - The Final Empire.m4b")
            .exists());
        assert!(!dir.join("book.m4b").exists());
        assert!(scan(temp.path()).is_empty());
    }

    #[test]
    fn test_renumbering_in_place_shifts_existing_tracks() {
        const TRACK: &str = "Brandon Sanderson - Mistborn 01 - The Final Empire";
        let track = |n: u32| format!("{} - {:02}.mp3", TRACK, n);
        let temp = TempDir::new().unwrap();
        let (first, second) = (track(1), track(2));
        let dir = write_item(
            temp.path(),
            "Brandon Sanderson/Mistborn/01 The Final Empire",
            MISTBORN,
            &[
                (first.as_str(), "first"),
                (second.as_str(), "second"),
                ("bonus.mp3", "bonus"),
            ],
        );

        let plans = scan(temp.path());
        assert_eq!(plans.len(), 1);

        let preview = execute(
            &plans,
            &ExecuteOptions {
                dry_run: true,
                log: None,
            },
        );
        assert!(preview.collisions.is_empty());

        let result = apply(&plans);
        assert!(result.collisions.is_empty());
        assert_eq!(result.error_count, 0);

        let read = |n: u32| fs::read_to_string(dir.join(track(n))).unwrap();
        assert_eq!(read(1), "bonus");
        assert_eq!(read(2), "first");
        assert_eq!(read(3), "second");
        assert!(!dir.join("bonus.mp3").exists());
        assert!(scan(temp.path()).is_empty());
    }

    #[test]
    fn test_dry_run_sees_earlier_moves_of_same_plan() {
        let temp = TempDir::new().unwrap();
        write_item(temp.path(), "incoming", MISTBORN, &[("book.m4b", "x")]);

        let mut plans = scan(temp.path());
        // Two files planned onto one name: only the second one collides
        let mut duplicate = plans[0].file_moves[0].clone();
        duplicate.old_path = temp.path().join("incoming/metadata.json");
        duplicate.old_name = "metadata.json".to_string();
        plans[0].file_moves = vec![plans[0].file_moves[0].clone(), duplicate];

        let result = execute(
            &plans,
            &ExecuteOptions {
                dry_run: true,
                log: None,
            },
        );
        assert_eq!(
            result.collisions,
            vec!["Brandon Sanderson - Mistborn 01 - The Final Empire.m4b"]
        );
    }

    #[test]
    fn test_directory_failure_is_isolated() {
        let temp = TempDir::new().unwrap();
        write_item(temp.path(), "a", MISTBORN, &[("book.m4b", "x")]);
        write_item(
            temp.path(),
            "b",
            r#"{"title": "Other", "author": "Someone"}"#,
            &[("other.mp3", "y")],
        );

        let plans = scan(temp.path());
        assert_eq!(plans.len(), 2);

        // A file where the author directory should go makes directory creation fail
        fs::write(temp.path().join("Brandon Sanderson"), "blocker").unwrap();

        let result = apply(&plans);
        assert_eq!(result.error_count, 1);
        assert_eq!(result.applied_count, 1);
        assert!(temp.path().join("a/book.m4b").exists());
        assert!(temp.path().join("Someone/Other/Someone - Other.mp3").exists());
    }

    #[test]
    fn test_progress_can_abort_between_items() {
        let temp = TempDir::new().unwrap();
        write_item(temp.path(), "a", MISTBORN, &[("book.m4b", "x")]);
        write_item(
            temp.path(),
            "b",
            r#"{"title": "Other", "author": "Someone"}"#,
            &[("other.mp3", "y")],
        );

        let plans = scan(temp.path());
        let mut visited = 0;
        let result = execute_with_progress(&plans, &ExecuteOptions::default(), |_, _, _| {
            visited += 1;
            ControlFlow::Break(())
        });

        assert_eq!(visited, 1);
        assert_eq!(result.applied_count, 1);
        assert!(temp.path().join("b/other.mp3").exists());
    }

    #[test]
    fn test_remove_empty_dirs_stops_at_root() {
        let temp = TempDir::new().unwrap();
        let deep = temp.path().join("x/y/z");
        fs::create_dir_all(&deep).unwrap();
        fs::write(temp.path().join("x/keep.txt"), "k").unwrap();

        let removed = remove_empty_dirs(&deep, temp.path());
        assert_eq!(removed, vec![deep.clone(), temp.path().join("x/y")]);
        assert!(temp.path().join("x").exists());

        let lone = temp.path().join("lone");
        fs::create_dir(&lone).unwrap();
        fs::remove_file(temp.path().join("x/keep.txt")).unwrap();
        remove_empty_dirs(&temp.path().join("x"), temp.path());
        assert!(temp.path().exists());
    }
}
