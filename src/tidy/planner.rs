use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use super::naming::{FileFormat, FolderFormat, NamingConfig};
use super::natsort::natural_cmp;
use super::sanitize::{sanitize, sanitize_or};
use crate::metadata::{NormalizedItem, UNKNOWN_AUTHOR, UNKNOWN_TITLE};

/// Extensions treated as audio, compared case-insensitively
const AUDIO_EXTENSIONS: &[&str] = &["mp3", "m4b", "m4a", "flac", "ogg", "opus", "aac"];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FileKind {
    Audio,
    Other,
}

/// One file's planned rename or move
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FileMove {
    pub old_name: String,
    pub new_name: String,
    pub old_path: PathBuf,
    pub kind: FileKind,
}

impl FileMove {
    pub fn is_renamed(&self) -> bool {
        self.old_name != self.new_name
    }
}

/// Everything needed to bring one item into the naming scheme
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ItemPlan {
    pub title: String,
    pub author: String,
    pub old_relative_dir: PathBuf,
    pub new_relative_dir: PathBuf,
    pub file_moves: Vec<FileMove>,
    pub source_dir: PathBuf,
    pub target_dir: PathBuf,
    /// Library root the plan was computed against; cleanup never climbs past it
    pub library_root: PathBuf,
    pub has_changes: bool,
}

impl ItemPlan {
    pub fn folder_changed(&self) -> bool {
        self.source_dir != self.target_dir
    }

    pub fn renamed_files(&self) -> impl Iterator<Item = &FileMove> {
        self.file_moves.iter().filter(|m| m.is_renamed())
    }
}

/// Check if a path has a recognized audio extension
pub fn is_audio_file(path: &Path) -> bool {
    path.extension()
        .map(|ext| {
            let ext_lower = ext.to_string_lossy().to_lowercase();
            AUDIO_EXTENSIONS.contains(&ext_lower.as_str())
        })
        .unwrap_or(false)
}

/// Target directory of an item relative to the library root
pub fn target_relative_dir(item: &NormalizedItem, folder_format: FolderFormat) -> PathBuf {
    let author = sanitize_or(&item.author, UNKNOWN_AUTHOR);
    let title = sanitize_or(&item.title, UNKNOWN_TITLE);
    let series = sanitize_or(&item.series_title, "");

    let mut dir = PathBuf::from(author);
    if folder_format == FolderFormat::AuthorSeriesBook && !series.is_empty() {
        dir.push(series);
        if item.book_number.is_empty() {
            dir.push(title);
        } else {
            dir.push(sanitize_or(&format!("{} {}", item.book_number, title), &title));
        }
    } else {
        dir.push(title);
    }
    dir
}

/// New name for the audio file at `position` (1-based) of `total`
pub fn audio_file_name(
    item: &NormalizedItem,
    original: &str,
    position: usize,
    total: usize,
    file_format: FileFormat,
) -> String {
    let base = match file_format {
        FileFormat::KeepOriginal => return original.to_string(),
        FileFormat::TitleOnly => item.title.clone(),
        FileFormat::FullDetails => {
            let series = if item.is_standalone() {
                String::new()
            } else {
                format!("{} {}", item.series_title, item.book_number)
                    .trim()
                    .to_string()
            };
            [item.author.as_str(), series.as_str(), item.title.as_str()]
                .into_iter()
                .filter(|part| !part.is_empty())
                .collect::<Vec<_>>()
                .join(" - ")
        }
    };

    let suffix = if total > 1 {
        format!(" - {:02}", position)
    } else {
        String::new()
    };

    let extension = Path::new(original)
        .extension()
        .map(|ext| format!(".{}", ext.to_string_lossy()))
        .unwrap_or_default();

    sanitize(&format!("{}{}{}", base, suffix, extension))
}

/// Compute the plan for one item directory
///
/// `files` are the paths of the regular files directly inside `item_dir`.
/// Audio files are renumbered in natural order; everything else keeps its
/// name and simply follows the folder.
pub fn plan_item(
    item_dir: &Path,
    item: &NormalizedItem,
    files: &[PathBuf],
    naming: &NamingConfig,
    library_root: &Path,
) -> ItemPlan {
    let new_relative_dir = target_relative_dir(item, naming.folder_format);
    let target_dir = library_root.join(&new_relative_dir);

    let (mut audio, mut other): (Vec<&PathBuf>, Vec<&PathBuf>) =
        files.iter().partition(|path| is_audio_file(path));
    audio.sort_by(|a, b| natural_cmp(&file_name(a), &file_name(b)));
    other.sort_by_key(|path| file_name(path));

    let total = audio.len();
    let mut file_moves: Vec<FileMove> = audio
        .into_iter()
        .enumerate()
        .map(|(i, path)| {
            let old_name = file_name(path);
            let new_name = audio_file_name(item, &old_name, i + 1, total, naming.file_format);
            FileMove {
                old_name,
                new_name,
                old_path: path.clone(),
                kind: FileKind::Audio,
            }
        })
        .collect();

    file_moves.extend(other.into_iter().map(|path| {
        let name = file_name(path);
        FileMove {
            old_name: name.clone(),
            new_name: name,
            old_path: path.clone(),
            kind: FileKind::Other,
        }
    }));

    let has_changes = item_dir != target_dir || file_moves.iter().any(FileMove::is_renamed);

    ItemPlan {
        title: item.title.clone(),
        author: item.author.clone(),
        old_relative_dir: item_dir
            .strip_prefix(library_root)
            .unwrap_or(item_dir)
            .to_path_buf(),
        new_relative_dir,
        file_moves,
        source_dir: item_dir.to_path_buf(),
        target_dir,
        library_root: library_root.to_path_buf(),
        has_changes,
    }
}

fn file_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().to_string())
        .unwrap_or_default()
}
