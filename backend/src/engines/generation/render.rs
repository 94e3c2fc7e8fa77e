//! Placeholder substitution for frozen templates.
//!
//! A [`RenderContext`] is parsed fresh from the template bytes for every
//! row, so nothing computed for one row can leak into the next.

use std::collections::HashMap;
use std::path::PathBuf;

use common::model::generation::OutputFormat;
use common::model::place_holder::PLACEHOLDER_PATTERN;
use once_cell::sync::Lazy;
use regex::{Captures, Regex};

use super::pdf;
use crate::error::{EngineError, Result};

/// `{{slug}}` with `slug` in `[a-zA-Z_]+`.
pub static PLACEHOLDER: Lazy<Regex> =
    Lazy::new(|| Regex::new(PLACEHOLDER_PATTERN).expect("placeholder regex is valid"));

pub trait TemplateRenderer {
    /// Fills `template` with `values` (slug to text) and returns the output
    /// document bytes.
    fn render(&self, template: &[u8], values: &HashMap<String, String>) -> Result<Vec<u8>>;
}

/// A template checked for well-formed placeholders.
#[derive(Debug)]
pub struct RenderContext<'t> {
    text: &'t str,
}

impl<'t> RenderContext<'t> {
    pub fn parse(template: &'t [u8]) -> Result<Self> {
        let text = std::str::from_utf8(template)
            .map_err(|_| EngineError::RenderFailure("template is not valid UTF-8".to_string()))?;
        let stripped = PLACEHOLDER.replace_all(text, "");
        if let Some(pos) = stripped.find("{{").or_else(|| stripped.find("}}")) {
            let snippet: String = stripped[pos..].chars().take(20).collect();
            return Err(EngineError::RenderFailure(format!(
                "malformed placeholder near '{}'",
                snippet
            )));
        }
        Ok(Self { text })
    }

    /// Slugs referenced by the template, in order of appearance.
    pub fn slugs(&self) -> Vec<&'t str> {
        PLACEHOLDER
            .captures_iter(self.text)
            .filter_map(|c| c.get(1).map(|m| m.as_str()))
            .collect()
    }

    /// Substitutes every placeholder. Unknown slugs become empty text. Only
    /// values the template references are checked for control characters.
    pub fn fill(&self, values: &HashMap<String, String>) -> Result<String> {
        let mut failure = None;
        let filled = PLACEHOLDER.replace_all(self.text, |caps: &Captures| {
            let slug = &caps[1];
            let value = values.get(slug).map(String::as_str).unwrap_or_default();
            if failure.is_none() {
                if let Some(c) = value
                    .chars()
                    .find(|c| c.is_control() && !matches!(c, '\n' | '\r' | '\t'))
                {
                    failure = Some(EngineError::RenderFailure(format!(
                        "value for '{}' contains control character U+{:04X}",
                        slug, c as u32
                    )));
                }
            }
            value.to_string()
        });
        match failure {
            Some(e) => Err(e),
            None => Ok(filled.into_owned()),
        }
    }
}

/// Renders filled templates as plain text or PDF.
#[derive(Debug, Clone)]
pub struct PlaceholderRenderer {
    format: OutputFormat,
    fonts_dir: PathBuf,
}

impl PlaceholderRenderer {
    pub fn new(format: OutputFormat, fonts_dir: impl Into<PathBuf>) -> Self {
        Self {
            format,
            fonts_dir: fonts_dir.into(),
        }
    }

    pub fn text() -> Self {
        Self::new(OutputFormat::Text, "./fonts")
    }
}

impl TemplateRenderer for PlaceholderRenderer {
    fn render(&self, template: &[u8], values: &HashMap<String, String>) -> Result<Vec<u8>> {
        let context = RenderContext::parse(template)?;
        let filled = context.fill(values)?;
        match self.format {
            OutputFormat::Text => Ok(filled.into_bytes()),
            OutputFormat::Pdf => pdf::render_pdf(&filled, &self.fonts_dir),
        }
    }
}
