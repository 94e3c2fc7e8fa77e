//! Replacement strategies, tried in order of decreasing confidence.
//!
//! Each strategy takes the current text and either returns the edited text
//! or the reason it declined. A strategy only edits when its target is
//! unique; zero or several candidates both decline. Placeholder tokens left
//! by earlier tags are invisible to every strategy.

use std::borrow::Cow;

use common::model::place_holder::ReplacementMethod;
use common::model::tag::Tag;
use regex::{Captures, Regex};

use super::patterns::PatternRegistry;
use crate::engines::generation::render::PLACEHOLDER;
use crate::error::{EngineError, Result};

/// Maximum characters allowed between an anchor and its example.
pub const ANCHOR_GAP: usize = 120;

pub fn confidence_of(method: ReplacementMethod) -> f64 {
    match method {
        ReplacementMethod::Exact => 0.95,
        ReplacementMethod::Anchor => 0.80,
        ReplacementMethod::Pattern => 0.70,
        ReplacementMethod::Manual => 0.0,
    }
}

/// `text` with every placeholder token blanked out by NUL bytes. Tokens are
/// ASCII, so byte offsets into the result are valid offsets into `text`.
pub fn mask_tokens(text: &str) -> Cow<'_, str> {
    PLACEHOLDER.replace_all(text, |caps: &Captures| "\0".repeat(caps[0].len()))
}

fn splice(text: &str, range: std::ops::Range<usize>, token: &str) -> String {
    let mut out = String::with_capacity(text.len() + token.len());
    out.push_str(&text[..range.start]);
    out.push_str(token);
    out.push_str(&text[range.end..]);
    out
}

/// Verbatim match of the example; applies only to a single occurrence.
pub fn exact(text: &str, tag: &Tag, token: &str) -> Result<String> {
    if tag.example.is_empty() {
        return Err(EngineError::NoMatch("example is empty".to_string()));
    }
    let haystack = mask_tokens(text);
    let positions: Vec<usize> = haystack
        .match_indices(&tag.example)
        .map(|(i, _)| i)
        .collect();
    match positions.as_slice() {
        [] => Err(EngineError::NoMatch("no verbatim occurrence".to_string())),
        [start] => Ok(splice(text, *start..*start + tag.example.len(), token)),
        many => Err(EngineError::AmbiguousMatch {
            what: "the example".to_string(),
            count: many.len(),
        }),
    }
}

/// Example found right after the tag's anchor phrase, within one line.
/// Only the example portion is replaced.
pub fn anchor(text: &str, tag: &Tag, token: &str) -> Result<String> {
    let anchor = match tag.anchor.as_deref().map(str::trim) {
        Some(a) if !a.is_empty() => a,
        _ => return Err(EngineError::NoMatch("no anchor provided".to_string())),
    };
    if tag.example.is_empty() {
        return Err(EngineError::NoMatch("example is empty".to_string()));
    }

    let pattern = format!(
        "{}[^\\n]{{0,{}}}?(?P<example>{})",
        regex::escape(anchor),
        ANCHOR_GAP,
        regex::escape(&tag.example)
    );
    let re = Regex::new(&pattern)
        .map_err(|e| EngineError::InvalidInput(format!("anchor pattern: {}", e)))?;

    let haystack = mask_tokens(text);
    let hits: Vec<std::ops::Range<usize>> = re
        .captures_iter(&haystack)
        .filter_map(|caps| caps.name("example").map(|m| m.range()))
        .collect();
    match hits.as_slice() {
        [] if !haystack.contains(anchor) => Err(EngineError::NoMatch("anchor not found".to_string())),
        [] => Err(EngineError::NoMatch(
            "example not found after the anchor".to_string(),
        )),
        [range] => Ok(splice(text, range.clone(), token)),
        many => Err(EngineError::AmbiguousMatch {
            what: "anchor + example".to_string(),
            count: many.len(),
        }),
    }
}

/// Collapses every whitespace run, including non-breaking spaces, to one
/// ASCII space.
pub fn normalize_whitespace(value: &str) -> String {
    value.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Type-specific scan; the single hit must equal the example up to
/// whitespace differences.
pub fn pattern(text: &str, tag: &Tag, token: &str, registry: &PatternRegistry) -> Result<String> {
    let Some(pattern) = registry.get(tag.tag_type) else {
        return Err(EngineError::NoMatch(format!(
            "no pattern for type {}",
            tag.tag_type.as_str()
        )));
    };
    if !pattern.fits(&tag.example) {
        return Err(EngineError::NoMatch(format!(
            "example does not look like {}",
            pattern.name
        )));
    }

    let hits = pattern.scan(&mask_tokens(text));
    match hits.as_slice() {
        [] => Err(EngineError::NoMatch(format!("no {} in text", pattern.name))),
        [range] => {
            let found = &text[range.clone()];
            if normalize_whitespace(found) == normalize_whitespace(&tag.example) {
                Ok(splice(text, range.clone(), token))
            } else {
                Err(EngineError::NoMatch(format!(
                    "only candidate '{}' differs from the example",
                    found
                )))
            }
        }
        many => Err(EngineError::AmbiguousMatch {
            what: pattern.name.clone(),
            count: many.len(),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use common::model::tag::TagType;

    const TOKEN: &str = "{{nom}}";

    fn tag(example: &str) -> Tag {
        Tag::new("Nom", "nom", example, TagType::String)
    }

    #[test]
    fn exact_requires_single_occurrence() {
        assert_eq!(
            exact("Hola Paquita.", &tag("Paquita"), TOKEN).unwrap(),
            "Hola {{nom}}."
        );
        assert!(matches!(
            exact("Hola.", &tag("Paquita"), TOKEN),
            Err(EngineError::NoMatch(_))
        ));
        assert!(matches!(
            exact("Paquita i Paquita", &tag("Paquita"), TOKEN),
            Err(EngineError::AmbiguousMatch { count: 2, .. })
        ));
        assert!(exact("anything", &tag(""), TOKEN).is_err());
    }

    #[test]
    fn anchor_replaces_only_the_example() {
        let text = "Paquita Ferre SL signa.\nSol·licitud sol·licitada per Paquita Ferre SL el dia 3.";
        let t = tag("Paquita Ferre SL").with_anchor("sol·licitada per");
        let out = anchor(text, &t, TOKEN).unwrap();
        assert_eq!(
            out,
            "Paquita Ferre SL signa.\nSol·licitud sol·licitada per {{nom}} el dia 3."
        );
    }

    #[test]
    fn anchor_does_not_cross_lines() {
        let text = "sol·licitada per\nPaquita Ferre SL";
        let t = tag("Paquita Ferre SL").with_anchor("sol·licitada per");
        let err = anchor(text, &t, TOKEN).unwrap_err();
        assert_eq!(err.to_string(), "example not found after the anchor");
    }

    #[test]
    fn anchor_declines_without_anchor_or_on_ambiguity() {
        assert_eq!(
            anchor("x", &tag("x"), TOKEN).unwrap_err().to_string(),
            "no anchor provided"
        );
        assert_eq!(
            anchor("x", &tag("x").with_anchor("per"), TOKEN)
                .unwrap_err()
                .to_string(),
            "anchor not found"
        );
        let t = tag("Anna").with_anchor("per");
        assert!(matches!(
            anchor("per Anna; per Anna", &t, TOKEN),
            Err(EngineError::AmbiguousMatch { count: 2, .. })
        ));
    }

    #[test]
    fn pattern_matches_across_whitespace_variants() {
        let registry = PatternRegistry::with_defaults();
        let t = Tag::new("Pressupost", "pressupost", "683,00 €", TagType::Currency);
        let text = "Pressupost total: 683,00\u{00A0}€.";
        let out = pattern(text, &t, "{{pressupost}}", &registry).unwrap();
        assert_eq!(out, "Pressupost total: {{pressupost}}.");
    }

    #[test]
    fn pattern_declines_on_other_values_or_types() {
        let registry = PatternRegistry::with_defaults();
        let t = Tag::new("Pressupost", "pressupost", "683,00 €", TagType::Currency);
        assert!(pattern("Total: 700,00 €", &t, TOKEN, &registry).is_err());
        assert!(matches!(
            pattern("1,00 € i 2,00 €", &t, TOKEN, &registry),
            Err(EngineError::AmbiguousMatch { count: 2, .. })
        ));

        let s = tag("683,00 €");
        assert_eq!(
            pattern("683,00 €", &s, TOKEN, &registry)
                .unwrap_err()
                .to_string(),
            "no pattern for type string"
        );
    }

    #[test]
    fn tokens_are_not_searched() {
        let t = Tag::new("Referencia", "referencia", "nom", TagType::Id);
        assert!(matches!(
            exact("Client: {{nom}}.", &t, "{{referencia}}"),
            Err(EngineError::NoMatch(_))
        ));
        assert_eq!(
            exact("{{nom}} nom", &t, "{{referencia}}").unwrap(),
            "{{nom}} {{referencia}}"
        );

        let anchored = tag("nom").with_anchor("per");
        assert_eq!(
            anchor("per {{nom}} i nom", &anchored, TOKEN).unwrap(),
            "per {{nom}} i {{nom}}"
        );
        assert_eq!(
            anchor("{{per}} nom", &anchored, TOKEN).unwrap_err().to_string(),
            "anchor not found"
        );

        let mut registry = PatternRegistry::empty();
        registry.register(TagType::Id, "code", r"[a-z]{3}").unwrap();
        let code = Tag::new("Codi", "codi", "abc", TagType::Id);
        assert_eq!(
            pattern("{{nom}} abc", &code, "{{codi}}", &registry).unwrap(),
            "{{nom}} {{codi}}"
        );
    }

    #[test]
    fn masking_keeps_offsets() {
        let masked = mask_tokens("a {{nom}} b");
        assert_eq!(masked.len(), "a {{nom}} b".len());
        assert_eq!(masked, "a \0\0\0\0\0\0\0 b");
        assert!(matches!(mask_tokens("no tokens"), Cow::Borrowed(_)));
    }

    #[test]
    fn whitespace_normalization() {
        assert_eq!(normalize_whitespace(" 683,00\u{00A0}\u{00A0}€ "), "683,00 €");
    }
}
