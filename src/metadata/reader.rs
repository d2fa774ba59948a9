use serde_json::Value;
use std::path::Path;

use crate::error::{TidyError, TidyResult};
use crate::metadata::fields::*;
use crate::metadata::MetadataRecord;
use crate::tidy::sanitize;

/// Read and parse a `metadata.json` sidecar
pub fn read_record(path: &Path) -> TidyResult<MetadataRecord> {
    let content = std::fs::read_to_string(path).map_err(|source| TidyError::ItemRead {
        path: path.to_path_buf(),
        source,
    })?;

    match serde_json::from_str::<Value>(&content) {
        Ok(Value::Object(fields)) => Ok(MetadataRecord::new(fields)),
        Ok(_) => Err(TidyError::Metadata {
            path: path.to_path_buf(),
            reason: "expected a JSON object".to_string(),
        }),
        Err(e) => Err(TidyError::Metadata {
            path: path.to_path_buf(),
            reason: e.to_string(),
        }),
    }
}

/// Derive the canonical fields of an item, filling defaults for anything missing
pub fn normalize(record: &MetadataRecord) -> NormalizedItem {
    let (series_title, book_number) = parse_series(&record.extract(SERIES_KEYS));

    NormalizedItem {
        author: or_default(record.extract(AUTHOR_KEYS), UNKNOWN_AUTHOR),
        title: or_default(record.extract(TITLE_KEYS), UNKNOWN_TITLE),
        narrator: or_default(record.extract(NARRATOR_KEYS), UNKNOWN_NARRATOR),
        series_title,
        book_number,
        duration_seconds: record.get_number(DURATION_KEY).unwrap_or(0.0),
    }
}

fn or_default(value: String, default: &str) -> String {
    if value.is_empty() {
        default.to_string()
    } else {
        value
    }
}

/// Split a raw series field such as "Mistborn #3.5" into title and book number
///
/// Numeric positions are zero-padded to two digits; fractional positions
/// keep their fraction verbatim. Any other label after `#` passes through
/// unchanged. A series without a title is treated as standalone.
pub fn parse_series(raw: &str) -> (String, String) {
    let Some((name, position)) = raw.split_once('#') else {
        return (sanitize(raw), String::new());
    };

    let title = sanitize(name);
    if title.is_empty() {
        return (String::new(), String::new());
    }

    let position = position.trim();
    let number = if let Some((whole, fraction)) = position.split_once('.') {
        format!("{:0>2}.{}", whole, fraction)
    } else if !position.is_empty() && position.chars().all(|c| c.is_ascii_digit()) {
        format!("{:0>2}", position)
    } else {
        position.to_string()
    };

    (title, number)
}
