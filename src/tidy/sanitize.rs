/// Characters rejected by at least one common filesystem
const INVALID_CHARS: &[char] = &['<', '>', ':', '"', '/', '\\', '|', '?', '*'];

/// Make a string safe to use as a single path component
///
/// Drops invalid characters, collapses whitespace runs to one space and
/// trims both ends. Applying it twice gives the same result as once.
pub fn sanitize(name: &str) -> String {
    name.chars()
        .filter(|c| !INVALID_CHARS.contains(c))
        .collect::<String>()
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
}

/// Sanitize, falling back to `default` when nothing usable is left
///
/// `.` and `..` count as unusable: as a directory component they would
/// point at the current or parent directory.
pub fn sanitize_or(name: &str, default: &str) -> String {
    let sanitized = sanitize(name);
    if sanitized.is_empty() || sanitized == "." || sanitized == ".." {
        default.to_string()
    } else {
        sanitized
    }
}
