use serde_json::{Map, Value};

/// Key under which some sidecar files nest their fields
const NESTED_KEY: &str = "metadata";

/// Raw contents of one `metadata.json` sidecar
///
/// Fields may live at the top level or under a nested `metadata` object,
/// as a scalar or as a list. Accessors never fail; missing or oddly shaped
/// values degrade to an empty string.
#[derive(Debug, Clone, Default)]
pub struct MetadataRecord {
    fields: Map<String, Value>,
}

impl MetadataRecord {
    pub fn new(fields: Map<String, Value>) -> Self {
        Self { fields }
    }

    /// Look up a non-null value, checking the top level before the nested object
    pub fn get(&self, key: &str) -> Option<&Value> {
        let top = self.fields.get(key).filter(|v| !v.is_null());
        top.or_else(|| {
            self.fields
                .get(NESTED_KEY)
                .and_then(Value::as_object)
                .and_then(|nested| nested.get(key))
                .filter(|v| !v.is_null())
        })
    }

    /// Numeric value of a key, accepting numbers and numeric strings
    pub fn get_number(&self, key: &str) -> Option<f64> {
        let number = match self.get(key)? {
            Value::Number(n) => n.as_f64(),
            Value::Array(items) => items.first().map(clean)?.parse().ok(),
            other => clean(other).parse().ok(),
        }?;
        (number.is_finite() && number >= 0.0).then_some(number)
    }

    /// First present candidate key wins, in the order given
    pub fn extract(&self, candidates: &[&str]) -> String {
        candidates
            .iter()
            .find_map(|key| self.get(key))
            .map(clean)
            .unwrap_or_default()
    }
}

/// Reduce a loosely typed value to a single trimmed string
///
/// Lists yield their first element. Text after the first comma is dropped
/// (joined author fields), as are stray brackets and quotes left over from
/// stringified one-element lists.
pub fn clean(value: &Value) -> String {
    let text = match value {
        Value::Null => return String::new(),
        Value::Array(items) => return items.first().map(clean).unwrap_or_default(),
        Value::String(s) => s.clone(),
        other => other.to_string(),
    };

    let head = text.split(',').next().unwrap_or_default();
    head.trim()
        .trim_start_matches(['[', '\'', '"'])
        .trim_end_matches(['\'', '"', ']'])
        .trim()
        .to_string()
}
