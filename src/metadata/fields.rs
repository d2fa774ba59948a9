use serde::{Deserialize, Serialize};

pub const UNKNOWN_AUTHOR: &str = "Unknown Author";
pub const UNKNOWN_TITLE: &str = "Unknown Title";
pub const UNKNOWN_NARRATOR: &str = "Unknown Narrator";

/// Sidecar keys consulted for each field, in priority order
pub const AUTHOR_KEYS: &[&str] = &["authorName", "author", "authors", "bookAuthor"];
pub const TITLE_KEYS: &[&str] = &["title", "bookTitle"];
pub const NARRATOR_KEYS: &[&str] = &["narratorName", "narrator", "narrators"];
pub const SERIES_KEYS: &[&str] = &["seriesName", "series"];
pub const DURATION_KEY: &str = "duration";

/// Canonical per-item metadata derived from a sidecar record
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NormalizedItem {
    pub author: String,
    pub title: String,
    pub narrator: String,
    /// Empty for standalone items
    pub series_title: String,
    /// Zero-padded position ("01", "03.5"), empty when standalone or unnumbered
    pub book_number: String,
    pub duration_seconds: f64,
}

impl NormalizedItem {
    pub fn is_standalone(&self) -> bool {
        self.series_title.is_empty()
    }
}

impl Default for NormalizedItem {
    fn default() -> Self {
        Self {
            author: UNKNOWN_AUTHOR.to_string(),
            title: UNKNOWN_TITLE.to_string(),
            narrator: UNKNOWN_NARRATOR.to_string(),
            series_title: String::new(),
            book_number: String::new(),
            duration_seconds: 0.0,
        }
    }
}
