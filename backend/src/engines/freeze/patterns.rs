//! Type-specific patterns for the third freeze strategy.
//!
//! A pattern has two jobs: decide whether a tag's example has the shape it
//! describes, and scan the document text for values of that shape. The
//! registry is keyed by tag type so new types can be added without touching
//! the freeze control flow.

use std::collections::HashMap;

use common::model::tag::TagType;
use regex::Regex;

use crate::error::{EngineError, Result};

/// Amount plus currency, in either order, with European or English grouping.
pub const CURRENCY_PATTERN: &str = r"(?:[€$£¥][ \u{00A0}\u{202F}]?\d{1,3}(?:[.,' \u{00A0}\u{202F}]?\d{3})*(?:[.,]\d{1,2})?)|(?:\b\d{1,3}(?:[.' \u{00A0}\u{202F}]?\d{3})*(?:[.,]\d{1,2})?[ \u{00A0}\u{202F}]?(?:[€$£¥]|\bEUR\b|\beuros?\b))";

#[derive(Debug, Clone)]
pub struct TypePattern {
    pub name: String,
    scan: Regex,
    shape: Regex,
}

impl TypePattern {
    pub fn new(name: impl Into<String>, pattern: &str) -> Result<Self> {
        let compile = |p: &str| {
            Regex::new(p).map_err(|e| EngineError::InvalidInput(format!("bad pattern: {}", e)))
        };
        Ok(Self {
            name: name.into(),
            scan: compile(pattern)?,
            shape: compile(&format!("^(?:{})$", pattern))?,
        })
    }

    /// Whether `example` as a whole has this pattern's shape.
    pub fn fits(&self, example: &str) -> bool {
        self.shape.is_match(example.trim())
    }

    /// Byte ranges of every match in `text`.
    pub fn scan(&self, text: &str) -> Vec<std::ops::Range<usize>> {
        self.scan.find_iter(text).map(|m| m.range()).collect()
    }
}

#[derive(Debug, Clone, Default)]
pub struct PatternRegistry {
    patterns: HashMap<TagType, TypePattern>,
}

impl PatternRegistry {
    /// A registry with no patterns at all.
    pub fn empty() -> Self {
        Self::default()
    }

    /// The base registry: currency only.
    pub fn with_defaults() -> Self {
        let mut registry = Self::empty();
        registry
            .register(TagType::Currency, "amount + currency", CURRENCY_PATTERN)
            .expect("currency pattern compiles");
        registry
    }

    /// Adds or replaces the pattern for `tag_type`.
    pub fn register(&mut self, tag_type: TagType, name: &str, pattern: &str) -> Result<()> {
        self.patterns.insert(tag_type, TypePattern::new(name, pattern)?);
        Ok(())
    }

    pub fn get(&self, tag_type: TagType) -> Option<&TypePattern> {
        self.patterns.get(&tag_type)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn currency() -> TypePattern {
        PatternRegistry::with_defaults()
            .get(TagType::Currency)
            .cloned()
            .unwrap()
    }

    #[test]
    fn currency_shapes() {
        let p = currency();
        for example in ["683,00 €", "683,00\u{00A0}€", "1.250,50 €", "€ 99", "$1,200.00", "300 EUR", "12 euros"] {
            assert!(p.fits(example), "{example}");
        }
        for example in ["Paquita Ferre SL", "683,00", "15/03/2025", "21%"] {
            assert!(!p.fits(example), "{example}");
        }
    }

    #[test]
    fn scan_finds_whole_amounts() {
        let p = currency();
        let text = "Total 1.250,50 € i bestreta de 300 EUR.";
        let found: Vec<&str> = p.scan(text).into_iter().map(|r| &text[r]).collect();
        assert_eq!(found, vec!["1.250,50 €", "300 EUR"]);
    }

    #[test]
    fn only_currency_is_registered_by_default() {
        let registry = PatternRegistry::with_defaults();
        assert!(registry.get(TagType::Currency).is_some());
        assert!(registry.get(TagType::Date).is_none());
        assert!(PatternRegistry::empty().get(TagType::Currency).is_none());
    }

    #[test]
    fn invalid_pattern_is_rejected() {
        let mut registry = PatternRegistry::empty();
        assert!(registry.register(TagType::Date, "broken", "(").is_err());
    }
}
