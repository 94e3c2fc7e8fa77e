//! # Mapping Engine
//!
//! Pairs detected tags with dataset column headers. Two operations with two
//! different guarantees:
//!
//! - [`suggest_by_tag`]: tag-major. Each tag gets at most one header, and
//!   only when the best score clears the threshold. Low scorers are left out.
//! - [`cover_headers`]: header-major. Every header gets exactly one tag; the
//!   reasoning step proposes, then a name-similarity fallback fills the gaps.

pub mod reasoner;
pub mod semantics;
pub mod similarity;

use std::collections::HashSet;

use common::model::mapping::{Mapping, MappingReport, MappingSuggestion};
use common::model::tag::Tag;
use log::{debug, info, warn};
use rayon::prelude::*;

use crate::error::{EngineError, Result};
use reasoner::{parse_proposals, MappingReasoner, ReasoningRequest};
use semantics::{content_boost, semantic_boost};
use similarity::name_similarity;

pub const DEFAULT_THRESHOLD: f64 = 0.7;
/// Confidence given to headers covered by the similarity fallback.
pub const FALLBACK_CONFIDENCE: f64 = 0.4;
const FALLBACK_REASONING: &str = "Assigned automatically by name similarity";

/// Scores one tag against one header, in `[0, 1]`.
pub fn score(tag: &Tag, header: &str) -> f64 {
    let base = name_similarity(&tag.name, header);
    let total = base + semantic_boost(&tag.name, header) + content_boost(&tag.example, header);
    total.clamp(0.0, 1.0)
}

/// Best header for `tag`; ties keep the earliest header.
fn best_header<'h>(tag: &Tag, headers: &'h [String]) -> Option<(&'h str, f64)> {
    let mut best: Option<(&str, f64)> = None;
    for header in headers {
        let s = score(tag, header);
        let better = match best {
            Some((_, top)) => s > top,
            None => true,
        };
        if better {
            best = Some((header, s));
        }
    }
    best
}

fn describe(tag: &Tag, header: &str) -> String {
    let mut parts = vec![format!(
        "name similarity {:.2}",
        name_similarity(&tag.name, header)
    )];
    if semantic_boost(&tag.name, header) > 0.0 {
        parts.push("same semantic category".to_string());
    }
    if content_boost(&tag.example, header) > 0.0 {
        parts.push("example format fits the column".to_string());
    }
    parts.join(", ")
}

/// Tag-major mapping: one suggestion per tag whose best score reaches
/// `threshold`, in tag order.
pub fn suggest_by_tag(tags: &[Tag], headers: &[String], threshold: f64) -> Result<MappingReport> {
    if tags.is_empty() {
        return Err(EngineError::InvalidInput("no tags to map".to_string()));
    }
    if headers.is_empty() {
        return Err(EngineError::InvalidInput("no headers to map onto".to_string()));
    }
    if !(0.0..=1.0).contains(&threshold) {
        return Err(EngineError::InvalidInput(format!(
            "threshold {} is outside [0, 1]",
            threshold
        )));
    }

    let suggestions: Vec<MappingSuggestion> = tags
        .par_iter()
        .filter_map(|tag| {
            let (header, confidence) = best_header(tag, headers)?;
            if confidence < threshold {
                debug!(
                    "Tag '{}' best match '{}' scored {:.2}, below threshold",
                    tag.slug, header, confidence
                );
                return None;
            }
            Some(MappingSuggestion {
                tag_slug: tag.slug.clone(),
                suggested_header: header.to_string(),
                confidence,
                reasoning: describe(tag, header),
            })
        })
        .collect();

    let report = MappingReport::new(Mapping::new(suggestions), tags.len());
    info!(
        "Mapped {}/{} tags ({}% coverage)",
        report.mapped_count,
        report.total,
        report.coverage_percent()
    );
    Ok(report)
}

/// Header-major mapping: every header receives exactly one tag.
///
/// Proposals from `reasoner` are taken first, in the order given. Proposals
/// naming an unknown tag or header, or a header that is already assigned, are
/// skipped. Headers left over are assigned to the tag with the highest name
/// similarity at [`FALLBACK_CONFIDENCE`]. Malformed reasoning output aborts
/// the call.
pub fn cover_headers(
    tags: &[Tag],
    headers: &[String],
    context: Option<&str>,
    reasoner: &dyn MappingReasoner,
) -> Result<MappingReport> {
    if tags.is_empty() {
        return Err(EngineError::InvalidInput("no tags to map".to_string()));
    }
    if headers.is_empty() {
        return Err(EngineError::InvalidInput("no headers to cover".to_string()));
    }

    let request = ReasoningRequest {
        tags,
        headers,
        context,
    };
    let raw = reasoner.propose(&request).map_err(|e| match e {
        EngineError::UpstreamReasoningFailure(_) => e,
        other => EngineError::UpstreamReasoningFailure(other.to_string()),
    })?;
    let proposals = parse_proposals(&raw)?;

    let known_slugs: HashSet<&str> = tags.iter().map(|t| t.slug.as_str()).collect();
    let mut assigned: Vec<Option<MappingSuggestion>> = vec![None; headers.len()];
    for proposal in proposals {
        if !known_slugs.contains(proposal.tag_slug.as_str()) {
            warn!("Reasoning proposed unknown tag '{}', skipped", proposal.tag_slug);
            continue;
        }
        let Some(index) = headers.iter().position(|h| *h == proposal.header) else {
            warn!("Reasoning proposed unknown header '{}', skipped", proposal.header);
            continue;
        };
        if assigned[index].is_some() {
            warn!("Header '{}' proposed twice, keeping the first", proposal.header);
            continue;
        }
        assigned[index] = Some(MappingSuggestion {
            tag_slug: proposal.tag_slug,
            suggested_header: proposal.header,
            confidence: proposal.confidence,
            reasoning: proposal.reasoning,
        });
    }

    let proposed = assigned.iter().filter(|a| a.is_some()).count();
    let suggestions: Vec<MappingSuggestion> = assigned
        .into_iter()
        .zip(headers)
        .map(|(slot, header)| slot.unwrap_or_else(|| fallback_for(header, tags)))
        .collect();

    if proposed < headers.len() {
        info!(
            "Reasoning covered {}/{} headers, {} assigned by similarity",
            proposed,
            headers.len(),
            headers.len() - proposed
        );
    }

    Ok(MappingReport::new(Mapping::new(suggestions), headers.len()))
}

fn fallback_for(header: &str, tags: &[Tag]) -> MappingSuggestion {
    let mut best = &tags[0];
    let mut best_score = name_similarity(&best.name, header);
    for tag in &tags[1..] {
        let s = name_similarity(&tag.name, header);
        if s > best_score {
            best = tag;
            best_score = s;
        }
    }
    debug!(
        "Header '{}' assigned to '{}' by similarity {:.2}",
        header, best.slug, best_score
    );
    MappingSuggestion {
        tag_slug: best.slug.clone(),
        suggested_header: header.to_string(),
        confidence: FALLBACK_CONFIDENCE,
        reasoning: FALLBACK_REASONING.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use common::model::tag::TagType;
    use proptest::prelude::*;

    fn headers(names: &[&str]) -> Vec<String> {
        names.iter().map(|s| s.to_string()).collect()
    }

    struct FailingReasoner;

    impl MappingReasoner for FailingReasoner {
        fn propose(&self, _request: &ReasoningRequest<'_>) -> Result<String> {
            Err(EngineError::InvalidInput("model unavailable".to_string()))
        }
    }

    #[test]
    fn fuzzy_mapping_uses_semantic_boost() {
        let tags = vec![Tag::new("nom", "nom", "Paquita Ferre SL", TagType::String)];
        let report = suggest_by_tag(&tags, &headers(&["Client Name", "Email"]), DEFAULT_THRESHOLD)
            .unwrap();

        assert_eq!(report.mapped_count, 1);
        let suggestion = &report.mappings.suggestions[0];
        assert_eq!(suggestion.tag_slug, "nom");
        assert_eq!(suggestion.suggested_header, "Client Name");
        assert!(suggestion.confidence >= 0.7);
        assert!(suggestion.reasoning.contains("semantic"));
    }

    #[test]
    fn content_hint_picks_amount_column() {
        let tags = vec![Tag::new("pressupost", "pressupost", "683,00 €", TagType::Currency)];
        let report = suggest_by_tag(
            &tags,
            &headers(&["Client Name", "Import", "Data"]),
            DEFAULT_THRESHOLD,
        )
        .unwrap();
        assert_eq!(report.mappings.header_for("pressupost"), Some("Import"));
        assert_eq!(report.mappings.suggestions[0].confidence, 1.0);
    }

    #[test]
    fn below_threshold_tags_are_omitted() {
        let tags = vec![
            Tag::new("Client Name", "client_name", "Paquita", TagType::String),
            Tag::new("zzz", "zzz", "qqq", TagType::String),
        ];
        let report = suggest_by_tag(&tags, &headers(&["Client Name"]), DEFAULT_THRESHOLD).unwrap();
        assert_eq!(report.mapped_count, 1);
        assert_eq!(report.total, 2);
        assert_eq!(report.coverage, 0.5);
        assert!(!report.mappings.contains_slug("zzz"));
    }

    #[test]
    fn ties_resolve_to_first_header() {
        let tags = vec![Tag::new("abc", "abc", "x", TagType::String)];
        let report = suggest_by_tag(&tags, &headers(&["abd", "abe"]), 0.0).unwrap();
        assert_eq!(report.mappings.header_for("abc"), Some("abd"));
    }

    #[test]
    fn empty_inputs_are_rejected() {
        let tags = vec![Tag::new("nom", "nom", "x", TagType::String)];
        assert!(matches!(
            suggest_by_tag(&[], &headers(&["A"]), 0.7),
            Err(EngineError::InvalidInput(_))
        ));
        assert!(matches!(
            suggest_by_tag(&tags, &[], 0.7),
            Err(EngineError::InvalidInput(_))
        ));
        assert!(matches!(
            suggest_by_tag(&tags, &headers(&["A"]), 1.5),
            Err(EngineError::InvalidInput(_))
        ));
        assert!(matches!(
            cover_headers(&tags, &[], None, &reasoner::PrecomputedReasoner::default()),
            Err(EngineError::InvalidInput(_))
        ));
    }

    #[test]
    fn header_coverage_fills_gaps_with_fallback() {
        let tags = vec![
            Tag::new("Nom", "nom", "Paquita Ferre SL", TagType::String),
            Tag::new("Email", "email", "info@paquita.cat", TagType::String),
            Tag::new("Import", "import", "683,00 €", TagType::Currency),
            Tag::new("Data", "data", "15/03/2025", TagType::Date),
            Tag::new("Adreça", "adreca", "Carrer Major 1", TagType::Address),
        ];
        let hdrs = headers(&["Nom", "Email", "Import", "Data", "Adreça"]);
        let output = r#"[
            {"tagSlug":"nom","header":"Nom","confidence":0.95,"reasoning":"same name"},
            {"tagSlug":"email","header":"Email","confidence":0.9,"reasoning":"same name"},
            {"tagSlug":"import","header":"Import","confidence":0.85,"reasoning":"amount"}
        ]"#;
        let reasoner = reasoner::PrecomputedReasoner::new(Some(output.to_string()));

        let report = cover_headers(&tags, &hdrs, None, &reasoner).unwrap();

        assert_eq!(report.mapped_count, 5);
        assert_eq!(report.total, 5);
        assert_eq!(report.coverage, 1.0);
        let fallbacks: Vec<_> = report
            .mappings
            .suggestions
            .iter()
            .filter(|s| s.confidence == FALLBACK_CONFIDENCE)
            .collect();
        assert_eq!(fallbacks.len(), 2);
        assert_eq!(fallbacks[0].suggested_header, "Data");
        assert_eq!(fallbacks[0].tag_slug, "data");
        assert_eq!(fallbacks[1].suggested_header, "Adreça");
        assert_eq!(fallbacks[1].tag_slug, "adreca");
    }

    #[test]
    fn invalid_proposals_are_skipped() {
        let tags = vec![Tag::new("Nom", "nom", "x", TagType::String)];
        let hdrs = headers(&["Nom"]);
        let output = r#"[
            {"tagSlug":"ghost","header":"Nom","confidence":0.9},
            {"tagSlug":"nom","header":"Unknown","confidence":0.9},
            {"tagSlug":"nom","header":"Nom","confidence":0.8,"reasoning":"ok"},
            {"tagSlug":"nom","header":"Nom","confidence":0.2,"reasoning":"dup"}
        ]"#;
        let reasoner = reasoner::PrecomputedReasoner::new(Some(output.to_string()));
        let report = cover_headers(&tags, &hdrs, None, &reasoner).unwrap();
        assert_eq!(report.mappings.len(), 1);
        assert_eq!(report.mappings.suggestions[0].confidence, 0.8);
        assert_eq!(report.mappings.suggestions[0].reasoning, "ok");
    }

    #[test]
    fn fallback_ties_go_to_the_first_tag() {
        let tags = vec![
            Tag::new("Ab", "ab", "x", TagType::String),
            Tag::new("Ba", "ba", "y", TagType::String),
        ];
        assert_eq!(name_similarity("Ab", "Xy"), name_similarity("Ba", "Xy"));
        let report = cover_headers(
            &tags,
            &headers(&["Xy"]),
            None,
            &reasoner::PrecomputedReasoner::default(),
        )
        .unwrap();
        let suggestion = &report.mappings.suggestions[0];
        assert_eq!(suggestion.tag_slug, "ab");
        assert_eq!(suggestion.confidence, FALLBACK_CONFIDENCE);
        assert_eq!(suggestion.reasoning, FALLBACK_REASONING);
    }

    #[test]
    fn malformed_reasoning_aborts() {
        let tags = vec![Tag::new("Nom", "nom", "x", TagType::String)];
        let reasoner = reasoner::PrecomputedReasoner::new(Some("{oops".to_string()));
        let result = cover_headers(&tags, &headers(&["Nom"]), None, &reasoner);
        assert!(matches!(result, Err(EngineError::UpstreamReasoningFailure(_))));

        let result = cover_headers(&tags, &headers(&["Nom"]), None, &FailingReasoner);
        assert!(matches!(result, Err(EngineError::UpstreamReasoningFailure(_))));
    }

    proptest! {
        #[test]
        fn coverage_is_bounded(
            names in prop::collection::vec("[a-z ]{1,12}", 1..6),
            hdrs in prop::collection::vec("[A-Za-z ]{1,12}", 1..6),
            threshold in 0.0f64..=1.0,
        ) {
            let tags: Vec<Tag> = names
                .iter()
                .enumerate()
                .map(|(i, n)| Tag::new(n.clone(), format!("tag_{}", "a".repeat(i + 1)), "x", TagType::String))
                .collect();
            let report = suggest_by_tag(&tags, &hdrs, threshold).unwrap();
            prop_assert!(report.mapped_count <= tags.len());
            prop_assert!((0.0..=1.0).contains(&report.coverage));
            for s in &report.mappings.suggestions {
                prop_assert!(s.confidence >= threshold);
                prop_assert!((0.0..=1.0).contains(&s.confidence));
            }
        }

        #[test]
        fn every_header_is_covered_exactly_once(
            header_count in 1usize..6,
            proposals in prop::collection::vec((0usize..8, 0usize..8, 0.0f64..=1.0), 0..12),
        ) {
            let tags: Vec<Tag> = ["nom", "import", "data"]
                .iter()
                .map(|s| Tag::new(*s, *s, "x", TagType::String))
                .collect();
            let hdrs: Vec<String> = (0..header_count).map(|i| format!("Columna {}", i)).collect();
            // Indices past the known tags or headers name unknown ones.
            let entries: Vec<String> = proposals
                .iter()
                .map(|(t, h, c)| {
                    let slug = tags.get(*t).map_or("ghost", |tag| tag.slug.as_str());
                    let header = hdrs.get(*h).cloned().unwrap_or_else(|| "Fantasma".to_string());
                    format!(r#"{{"tagSlug":"{}","header":"{}","confidence":{}}}"#, slug, header, c)
                })
                .collect();
            let reasoner = reasoner::PrecomputedReasoner::new(Some(format!("[{}]", entries.join(","))));

            let report = cover_headers(&tags, &hdrs, None, &reasoner).unwrap();
            let covered: Vec<&str> = report
                .mappings
                .suggestions
                .iter()
                .map(|s| s.suggested_header.as_str())
                .collect();
            let expected: Vec<&str> = hdrs.iter().map(String::as_str).collect();
            prop_assert_eq!(covered, expected);
            prop_assert_eq!(report.mapped_count, hdrs.len());
            prop_assert_eq!(report.coverage, 1.0);
        }
    }
}
