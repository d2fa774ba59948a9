use clap::ValueEnum;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Folder layout under the library root
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "kebab-case")]
pub enum FolderFormat {
    /// Author/Series/NN Title for series items, Author/Title otherwise
    #[default]
    AuthorSeriesBook,
    /// Author/Title for every item
    AuthorBook,
}

/// How audio files inside an item folder are named
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "kebab-case")]
pub enum FileFormat {
    /// "Author - Series NN - Title - 01.ext"
    #[default]
    FullDetails,
    /// "Title - 01.ext"
    TitleOnly,
    /// Leave audio file names alone
    KeepOriginal,
}

/// Naming scheme applied by the planner
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct NamingConfig {
    #[serde(default)]
    pub folder_format: FolderFormat,
    #[serde(default)]
    pub file_format: FileFormat,
}

/// Accepted values with descriptions, for `tidylibrary formats`
pub const FOLDER_FORMATS: &[(&str, &str)] = &[
    (
        "author-series-book",
        "Author/Series/NN Title (series items), Author/Title (standalone)",
    ),
    ("author-book", "Author/Title, ignoring series"),
];

pub const FILE_FORMATS: &[(&str, &str)] = &[
    (
        "full-details",
        "Author - Series NN - Title - 01.ext (track suffix only for multi-file items)",
    ),
    ("title-only", "Title - 01.ext"),
    ("keep-original", "Keep existing audio file names"),
];

impl fmt::Display for FolderFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::AuthorSeriesBook => "author-series-book",
            Self::AuthorBook => "author-book",
        })
    }
}

impl fmt::Display for FileFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::FullDetails => "full-details",
            Self::TitleOnly => "title-only",
            Self::KeepOriginal => "keep-original",
        })
    }
}
