mod fields;
mod reader;
mod record;

pub use fields::{NormalizedItem, UNKNOWN_AUTHOR, UNKNOWN_NARRATOR, UNKNOWN_TITLE};
pub use reader::{normalize, read_record};
pub use record::MetadataRecord;

/// Name of the per-item sidecar file
pub const SIDECAR_FILENAME: &str = "metadata.json";
