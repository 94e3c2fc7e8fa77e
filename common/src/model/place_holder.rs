use serde::{Deserialize, Serialize};

/// Regex source for a placeholder token; group 1 is the slug.
pub const PLACEHOLDER_PATTERN: &str = r"\{\{([a-zA-Z_]+)\}\}";

/// Returns `true` when `slug` can be embedded in a placeholder token,
/// i.e. it matches `[a-zA-Z_]+`.
pub fn is_placeholder_slug(slug: &str) -> bool {
    !slug.is_empty() && slug.chars().all(|c| c.is_ascii_alphabetic() || c == '_')
}

/// Builds the `{{slug}}` token the freeze step writes and renderers consume.
pub fn placeholder_token(slug: &str) -> String {
    format!("{{{{{}}}}}", slug)
}

/// How a tag's example value was located in the document text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReplacementMethod {
    Exact,
    Anchor,
    Pattern,
    Manual,
}

/// Outcome of freezing one mapped tag.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlaceholderReplacement {
    /// The literal example text the strategy looked for.
    pub original: String,
    pub placeholder: String,
    pub confidence: f64,
    pub method: ReplacementMethod,
    pub applied: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
}
