//! # Freeze Engine
//!
//! Turns a source document into a template by replacing each mapped tag's
//! literal example with its `{{slug}}` token. This is a one-way edit: the
//! original values are gone from the result.
//!
//! Tags are processed in the order given, as a fold over the current text.
//! Every strategy sees the text as left by the tags before it, so an earlier
//! replacement can make a later example unique (or remove it entirely).
//!
//! Per tag the first strategy that applies wins:
//!
//! | strategy | applies when                                   | confidence |
//! |----------|------------------------------------------------|------------|
//! | exact    | example occurs exactly once                    | 0.95       |
//! | anchor   | exactly one `anchor … example` on one line     | 0.80       |
//! | pattern  | one type-pattern hit equal to the example      | 0.70       |
//! | manual   | nothing applied; listed for manual review      | 0.00       |

pub mod container;
pub mod patterns;
pub mod strategies;

use common::model::mapping::Mapping;
use common::model::place_holder::{
    is_placeholder_slug, placeholder_token, PlaceholderReplacement, ReplacementMethod,
};
use common::model::tag::Tag;
use common::model::template::{FreezeReport, FrozenTemplate};
use log::{debug, info, warn};

use crate::error::{EngineError, Result};
use container::DocumentContainer;
use patterns::PatternRegistry;
use strategies::confidence_of;

/// Edited text plus the per-tag report.
#[derive(Debug, Clone, PartialEq)]
pub struct FreezeOutcome {
    /// The input text with every applied replacement spliced in.
    pub text: String,
    /// One entry per mapped tag, in tag order.
    pub report: FreezeReport,
}

#[derive(Debug, Clone)]
pub struct FreezeEngine {
    /// Backs the pattern strategy.
    patterns: PatternRegistry,
}

impl Default for FreezeEngine {
    fn default() -> Self {
        Self::new(PatternRegistry::with_defaults())
    }
}

impl FreezeEngine {
    pub fn new(patterns: PatternRegistry) -> Self {
        Self { patterns }
    }

    /// Replaces the examples of all mapped tags in `text`.
    ///
    /// Tags without a mapping are skipped, are not validated and do not
    /// count towards the totals.
    pub fn freeze(&self, text: &str, tags: &[Tag], mapping: &Mapping) -> Result<FreezeOutcome> {
        if tags.is_empty() {
            return Err(EngineError::InvalidInput("no tags to freeze".to_string()));
        }
        if mapping.is_empty() {
            return Err(EngineError::InvalidInput("mapping is empty".to_string()));
        }
        let mapped: Vec<&Tag> = tags
            .iter()
            .filter(|tag| mapping.contains_slug(&tag.slug))
            .collect();
        if let Some(bad) = mapped.iter().find(|t| !is_placeholder_slug(&t.slug)) {
            return Err(EngineError::InvalidInput(format!(
                "slug '{}' is not a valid placeholder name",
                bad.slug
            )));
        }

        let (text, replacements) = mapped.into_iter().fold(
            (text.to_string(), Vec::new()),
            |(current, mut replacements), tag| {
                let (next, replacement) = self.freeze_tag(current, tag);
                replacements.push(replacement);
                (next, replacements)
            },
        );

        let successful = replacements.iter().filter(|r| r.applied).count();
        let manual_review_required: Vec<String> = replacements
            .iter()
            .filter(|r| !r.applied)
            .map(|r| r.original.clone())
            .collect();
        let report = FreezeReport {
            total: replacements.len(),
            successful,
            manual_review_required,
            replacements,
        };
        info!(
            "Froze {}/{} tags, {} need manual review",
            report.successful,
            report.total,
            report.manual_review_required.len()
        );
        Ok(FreezeOutcome { text, report })
    }

    /// Reads the text layer of `bytes`, freezes it and writes it back through
    /// the same container.
    pub fn freeze_document(
        &self,
        bytes: &[u8],
        tags: &[Tag],
        mapping: &Mapping,
        container: &dyn DocumentContainer,
    ) -> Result<FrozenTemplate> {
        if bytes.is_empty() {
            return Err(EngineError::InvalidInput("document is empty".to_string()));
        }
        let text = container.read_text(bytes)?;
        let outcome = self.freeze(&text, tags, mapping)?;
        let frozen = container.write_text(bytes, &outcome.text)?;
        Ok(FrozenTemplate::new(frozen, outcome.report))
    }

    /// One step of the fold: the first applicable strategy edits `current`.
    fn freeze_tag(&self, current: String, tag: &Tag) -> (String, PlaceholderReplacement) {
        let token = placeholder_token(&tag.slug);
        let attempts: [(ReplacementMethod, &dyn Fn(&str) -> Result<String>); 3] = [
            (ReplacementMethod::Exact, &|text: &str| {
                strategies::exact(text, tag, &token)
            }),
            (ReplacementMethod::Anchor, &|text: &str| {
                strategies::anchor(text, tag, &token)
            }),
            (ReplacementMethod::Pattern, &|text: &str| {
                strategies::pattern(text, tag, &token, &self.patterns)
            }),
        ];

        let mut declined: Vec<String> = Vec::with_capacity(attempts.len());
        for (method, strategy) in attempts {
            match strategy(&current) {
                Ok(text) => {
                    debug!("Tag '{}' frozen by {} match", tag.slug, method_name(method));
                    let replacement = PlaceholderReplacement {
                        original: tag.example.clone(),
                        placeholder: token.clone(),
                        confidence: confidence_of(method),
                        method,
                        applied: true,
                        reason: None,
                    };
                    return (text, replacement);
                }
                Err(e) => declined.push(format!("{}: {}", method_name(method), e)),
            }
        }

        let reason = declined.join("; ");
        warn!("Tag '{}' needs manual review: {}", tag.slug, reason);
        let replacement = PlaceholderReplacement {
            original: tag.example.clone(),
            placeholder: token.clone(),
            confidence: confidence_of(ReplacementMethod::Manual),
            method: ReplacementMethod::Manual,
            applied: false,
            reason: Some(reason),
        };
        (current, replacement)
    }
}

fn method_name(method: ReplacementMethod) -> &'static str {
    match method {
        ReplacementMethod::Exact => "exact",
        ReplacementMethod::Anchor => "anchor",
        ReplacementMethod::Pattern => "pattern",
        ReplacementMethod::Manual => "manual",
    }
}
