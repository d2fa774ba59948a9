use std::collections::BTreeMap;
use std::path::Path;

use super::planner::ItemPlan;

/// Target directories of the plans, with the files each one will receive
#[derive(Debug, Default)]
struct DirNode {
    dirs: BTreeMap<String, DirNode>,
    files: Vec<String>,
}

impl DirNode {
    /// Descend along `relative`, creating directories as needed
    fn dir_mut(&mut self, relative: &Path) -> &mut DirNode {
        relative.components().fold(self, |node, component| {
            node.dirs
                .entry(component.as_os_str().to_string_lossy().into_owned())
                .or_default()
        })
    }

    /// Subdirectories first, then files in plan order
    fn render(&self, output: &mut String, indent: &str) {
        let total = self.dirs.len() + self.files.len();
        let entries = self
            .dirs
            .iter()
            .map(|(name, dir)| (format!("{}/", name), Some(dir)))
            .chain(self.files.iter().map(|name| (name.clone(), None)));

        for (i, (label, dir)) in entries.enumerate() {
            let last = i + 1 == total;
            let (branch, extension) = if last {
                ("└── ", "    ")
            } else {
                ("├── ", "│   ")
            };
            output.push_str(&format!("{}{}{}\n", indent, branch, label));

            if let Some(dir) = dir {
                dir.render(output, &format!("{}{}", indent, extension));
            }
        }
    }
}

/// Render the layout the library will have once the plans are applied
pub fn render_tree(plans: &[ItemPlan], root: &Path) -> String {
    let mut layout = DirNode::default();
    for plan in plans {
        let dir = layout.dir_mut(&plan.new_relative_dir);
        dir.files
            .extend(plan.file_moves.iter().map(|file| file.new_name.clone()));
    }

    let mut output = format!("{}/\n", root.display());
    layout.render(&mut output, "");
    output
}

/// Render a numbered list of plans with their folder move and file renames
///
/// The numbers are the indices `apply --only` accepts.
pub fn render_list(plans: &[ItemPlan]) -> String {
    let mut output = String::new();

    for (index, plan) in plans.iter().enumerate() {
        output.push_str(&format!("[{}] {} by {}\n", index, plan.title, plan.author));

        if plan.folder_changed() {
            output.push_str(&format!(
                "    {} → {}\n",
                plan.old_relative_dir.display(),
                plan.new_relative_dir.display()
            ));
        }

        for file in plan.renamed_files() {
            output.push_str(&format!("      {} → {}\n", file.old_name, file.new_name));
        }
    }

    output
}
