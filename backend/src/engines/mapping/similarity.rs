//! Lexical similarity between tag names and column headers.

/// Lowercases and drops whitespace and underscores, so `"Client Name"`,
/// `"client_name"` and `"clientname"` compare equal.
pub fn normalize(value: &str) -> String {
    value
        .chars()
        .filter(|c| !c.is_whitespace() && *c != '_')
        .flat_map(char::to_lowercase)
        .collect()
}

/// Levenshtein distance over Unicode scalar values.
pub fn edit_distance(a: &str, b: &str) -> usize {
    strsim::levenshtein(a, b)
}

/// `1 - distance / max_len` on normalized input, in `[0, 1]`. Two empty
/// names are identical.
pub fn name_similarity(a: &str, b: &str) -> f64 {
    strsim::normalized_levenshtein(&normalize(a), &normalize(b))
}
