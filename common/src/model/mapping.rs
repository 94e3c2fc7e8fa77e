use serde::{Deserialize, Serialize};

/// One tag-to-header association.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MappingSuggestion {
    pub tag_slug: String,
    pub suggested_header: String,
    pub confidence: f64,
    pub reasoning: String,
}

/// Ordered list of tag-to-header associations.
///
/// Serialized as a plain JSON array. When a slug appears more than once the
/// first entry wins for lookups.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Mapping {
    pub suggestions: Vec<MappingSuggestion>,
}

impl Mapping {
    pub fn new(suggestions: Vec<MappingSuggestion>) -> Self {
        Self { suggestions }
    }

    /// Builds a mapping from `(slug, header)` pairs with full confidence.
    pub fn from_pairs<I, S, H>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (S, H)>,
        S: Into<String>,
        H: Into<String>,
    {
        Self {
            suggestions: pairs
                .into_iter()
                .map(|(slug, header)| MappingSuggestion {
                    tag_slug: slug.into(),
                    suggested_header: header.into(),
                    confidence: 1.0,
                    reasoning: "provided".to_string(),
                })
                .collect(),
        }
    }

    pub fn header_for(&self, slug: &str) -> Option<&str> {
        self.suggestions
            .iter()
            .find(|s| s.tag_slug == slug)
            .map(|s| s.suggested_header.as_str())
    }

    pub fn contains_slug(&self, slug: &str) -> bool {
        self.header_for(slug).is_some()
    }

    pub fn len(&self) -> usize {
        self.suggestions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.suggestions.is_empty()
    }

    /// Distinct mapped slugs, in first-seen order.
    pub fn slugs(&self) -> Vec<&str> {
        let mut seen: Vec<&str> = Vec::with_capacity(self.suggestions.len());
        for s in &self.suggestions {
            if !seen.contains(&s.tag_slug.as_str()) {
                seen.push(&s.tag_slug);
            }
        }
        seen
    }
}

/// Prompt text the client sends to its generative backend before calling
/// header-major mapping with the answer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReasoningPrompt {
    pub prompt: String,
}

/// Result of a mapping run.
///
/// `total` counts tags for tag-major runs and headers for header-major runs,
/// so `coverage` always describes the side the run guarantees.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MappingReport {
    pub mappings: Mapping,
    pub mapped_count: usize,
    pub total: usize,
    pub coverage: f64,
}

impl MappingReport {
    pub fn new(mappings: Mapping, total: usize) -> Self {
        let mapped_count = mappings.len().min(total);
        let coverage = if total == 0 {
            0.0
        } else {
            mapped_count as f64 / total as f64
        };
        Self {
            mappings,
            mapped_count,
            total,
            coverage,
        }
    }

    /// Coverage as a whole percentage for display.
    pub fn coverage_percent(&self) -> u32 {
        (self.coverage * 100.0).round() as u32
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn first_suggestion_wins_on_lookup() {
        let mapping = Mapping::from_pairs([("nom", "Client Name"), ("nom", "Email")]);
        assert_eq!(mapping.header_for("nom"), Some("Client Name"));
        assert_eq!(mapping.slugs(), vec!["nom"]);
        assert_eq!(mapping.header_for("import"), None);
    }

    #[test]
    fn mapping_is_a_plain_array_on_the_wire() {
        let mapping = Mapping::from_pairs([("pressupost", "Import")]);
        let json = serde_json::to_value(&mapping).unwrap();
        assert!(json.is_array());
        assert_eq!(json[0]["tagSlug"], "pressupost");
        assert_eq!(json[0]["suggestedHeader"], "Import");
    }

    #[test]
    fn report_coverage() {
        let report = MappingReport::new(Mapping::from_pairs([("a", "A"), ("b", "B")]), 4);
        assert_eq!(report.mapped_count, 2);
        assert_eq!(report.coverage, 0.5);
        assert_eq!(report.coverage_percent(), 50);

        let empty = MappingReport::new(Mapping::default(), 0);
        assert_eq!(empty.coverage, 0.0);
    }
}
