use serde::{Deserialize, Serialize};

/// A variable slot detected in a source document.
///
/// Tags arrive from the extraction step already normalized: `slug` is unique
/// within the set and safe to embed in a `{{slug}}` placeholder token, and
/// `example` is the literal value as it appears in the source document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Tag {
    pub name: String,
    pub slug: String,
    pub example: String,
    #[serde(rename = "type")]
    pub tag_type: TagType,
    pub confidence: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub page: Option<u32>,
    /// Contextual phrase found next to the example, e.g. "sol·licitada per".
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub anchor: Option<String>,
}

impl Tag {
    pub fn new(
        name: impl Into<String>,
        slug: impl Into<String>,
        example: impl Into<String>,
        tag_type: TagType,
    ) -> Self {
        Self {
            name: name.into(),
            slug: slug.into(),
            example: example.into(),
            tag_type,
            confidence: 1.0,
            page: None,
            anchor: None,
        }
    }

    pub fn with_anchor(mut self, anchor: impl Into<String>) -> Self {
        self.anchor = Some(anchor.into());
        self
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TagType {
    String,
    Date,
    Currency,
    Percent,
    Number,
    Id,
    Address,
}

impl TagType {
    pub fn as_str(&self) -> &'static str {
        match self {
            TagType::String => "string",
            TagType::Date => "date",
            TagType::Currency => "currency",
            TagType::Percent => "percent",
            TagType::Number => "number",
            TagType::Id => "id",
            TagType::Address => "address",
        }
    }
}
