//! Small helpers shared by plugin authors.

/// Parse an integer out of a trigger argument, ignoring punctuation
/// (`"#123"`, `"123,"` and `"123"` all yield 123). Returns `None`
/// when nothing numeric is left, so handlers can no-op or reply with
/// a usage string.
#[must_use]
pub fn ensure_int(param: &str) -> Option<i64> {
    let digits: String = param
        .chars()
        .filter(|c| c.is_ascii_digit() || *c == '-')
        .collect();
    digits.parse().ok()
}
