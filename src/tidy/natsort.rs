use std::cmp::Ordering;

/// One run of a natural sort key
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
enum Chunk {
    /// Lowercased non-digit text
    Text(String),
    /// Digit run with leading zeros stripped, compared by length then digits
    Number { len: usize, digits: String },
}

/// Sort key that orders "track2" before "track10"
///
/// The key always starts with a text chunk (possibly empty) and then
/// alternates, so chunks at the same position are of the same kind.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub struct NaturalKey(Vec<Chunk>);

impl NaturalKey {
    pub fn new(name: &str) -> Self {
        let mut chunks = Vec::new();
        let mut text = String::new();
        let mut digits = String::new();

        for c in name.chars() {
            if c.is_ascii_digit() {
                if digits.is_empty() {
                    chunks.push(Chunk::Text(std::mem::take(&mut text).to_lowercase()));
                }
                digits.push(c);
            } else {
                if !digits.is_empty() {
                    chunks.push(number_chunk(&std::mem::take(&mut digits)));
                }
                text.push(c);
            }
        }

        if !digits.is_empty() {
            chunks.push(number_chunk(&digits));
        } else {
            chunks.push(Chunk::Text(text.to_lowercase()));
        }

        Self(chunks)
    }
}

fn number_chunk(run: &str) -> Chunk {
    let trimmed = run.trim_start_matches('0');
    Chunk::Number {
        len: trimmed.len(),
        digits: trimmed.to_string(),
    }
}

/// Compare two file names the way a person would read them
///
/// Names whose keys are equal ("a01" and "a1", "A" and "a") fall back to a
/// plain byte comparison so the order never depends on input order.
pub fn natural_cmp(a: &str, b: &str) -> Ordering {
    NaturalKey::new(a)
        .cmp(&NaturalKey::new(b))
        .then_with(|| a.cmp(b))
}
