//! Primary step of header-major mapping.
//!
//! The generative call itself lives outside this crate. The engine only sees
//! a [`MappingReasoner`] that returns raw model output, which must parse as a
//! JSON array of proposals (optionally wrapped in `{"mappings": [...]}` or in
//! a markdown code fence).

use common::model::tag::Tag;
use serde::Deserialize;

use crate::error::{EngineError, Result};

/// Inputs handed to the reasoning step.
#[derive(Debug, Clone, Copy)]
pub struct ReasoningRequest<'a> {
    pub tags: &'a [Tag],
    pub headers: &'a [String],
    pub context: Option<&'a str>,
}

impl ReasoningRequest<'_> {
    /// Prompt text for a generative backend.
    pub fn prompt(&self) -> String {
        let mut prompt = String::from(
            "Assign exactly one document tag to every spreadsheet column header.\n\
             Answer with a JSON array of objects with the fields \
             \"tagSlug\", \"header\", \"confidence\" (0..1) and \"reasoning\".\n\n",
        );
        if let Some(context) = self.context.filter(|c| !c.trim().is_empty()) {
            prompt.push_str("Document context:\n");
            prompt.push_str(context.trim());
            prompt.push_str("\n\n");
        }
        prompt.push_str("Tags:\n");
        for tag in self.tags {
            prompt.push_str(&format!(
                "- {} ({}): name \"{}\", example \"{}\"\n",
                tag.slug,
                tag.tag_type.as_str(),
                tag.name,
                tag.example
            ));
        }
        prompt.push_str("\nHeaders:\n");
        for header in self.headers {
            prompt.push_str(&format!("- {}\n", header));
        }
        prompt
    }
}

pub trait MappingReasoner {
    /// Returns the raw output of the reasoning step.
    fn propose(&self, request: &ReasoningRequest<'_>) -> Result<String>;
}

/// Replays output produced elsewhere, e.g. by the client before calling the
/// API. With no output it proposes nothing.
#[derive(Debug, Clone, Default)]
pub struct PrecomputedReasoner {
    output: Option<String>,
}

impl PrecomputedReasoner {
    pub fn new(output: Option<String>) -> Self {
        Self { output }
    }
}

impl MappingReasoner for PrecomputedReasoner {
    fn propose(&self, _request: &ReasoningRequest<'_>) -> Result<String> {
        Ok(self.output.clone().unwrap_or_else(|| "[]".to_string()))
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Proposal {
    pub tag_slug: String,
    #[serde(alias = "suggestedHeader")]
    pub header: String,
    pub confidence: f64,
    #[serde(default)]
    pub reasoning: String,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum ProposalEnvelope {
    List(Vec<Proposal>),
    Wrapped { mappings: Vec<Proposal> },
}

/// Parses raw reasoning output. Anything that is not a list of proposals is
/// an [`EngineError::UpstreamReasoningFailure`].
pub fn parse_proposals(raw: &str) -> Result<Vec<Proposal>> {
    let cleaned = strip_code_fence(raw);
    let envelope: ProposalEnvelope = serde_json::from_str(&cleaned)
        .map_err(|e| EngineError::UpstreamReasoningFailure(e.to_string()))?;
    let proposals = match envelope {
        ProposalEnvelope::List(list) => list,
        ProposalEnvelope::Wrapped { mappings } => mappings,
    };
    Ok(proposals
        .into_iter()
        .map(|p| Proposal {
            confidence: p.confidence.clamp(0.0, 1.0),
            ..p
        })
        .collect())
}

fn strip_code_fence(text: &str) -> String {
    let trimmed = text.trim();
    if !trimmed.starts_with("```") {
        return trimmed.to_string();
    }
    let body = match trimmed.find('\n') {
        Some(pos) => &trimmed[pos + 1..],
        None => trimmed.trim_start_matches('`'),
    };
    body.trim_end()
        .strip_suffix("```")
        .unwrap_or(body)
        .trim()
        .to_string()
}
