//! PDF output for filled templates.
//!
//! Lines are laid out one paragraph each. `- ` starts a bullet item, an
//! empty line becomes a vertical break, and `**bold**` / `*italic*` markers
//! are honoured inside a line.

use std::path::Path;

use genpdf::elements::{Break, LinearLayout, Paragraph};
use genpdf::fonts::{FontData, FontFamily};
use genpdf::style::{Style, StyledString};
use genpdf::Document;

use crate::error::{EngineError, Result};

#[derive(Debug, Clone, Copy, PartialEq)]
enum TextStyle {
    Regular,
    Bold,
    Italic,
    BoldItalic,
}

impl TextStyle {
    fn from_flags(bold: bool, italic: bool) -> Self {
        match (bold, italic) {
            (false, false) => TextStyle::Regular,
            (true, false) => TextStyle::Bold,
            (false, true) => TextStyle::Italic,
            (true, true) => TextStyle::BoldItalic,
        }
    }

    fn to_style(self) -> Style {
        match self {
            TextStyle::Regular => Style::new(),
            TextStyle::Bold => Style::new().bold(),
            TextStyle::Italic => Style::new().italic(),
            TextStyle::BoldItalic => Style::new().bold().italic(),
        }
    }
}

#[derive(Debug, PartialEq)]
struct TextSegment {
    text: String,
    style: TextStyle,
}

/// Splits a line on `**` and `*` markers. A marker without a closing
/// partner is kept as literal text.
fn parse_styles(line: &str) -> Vec<TextSegment> {
    let mut segments = Vec::new();
    let mut buffer = String::new();
    let (mut bold, mut italic) = (false, false);
    let mut rest = line;

    while let Some(c) = rest.chars().next() {
        let marker = if rest.starts_with("**") { 2 } else if c == '*' { 1 } else { 0 };
        if marker == 0 {
            buffer.push(c);
            rest = &rest[c.len_utf8()..];
            continue;
        }

        let after = &rest[marker..];
        let open = if marker == 2 { bold } else { italic };
        let closes_later = if marker == 2 {
            after.contains("**")
        } else {
            after.replace("**", "").contains('*')
        };
        if open || closes_later {
            if !buffer.is_empty() {
                segments.push(TextSegment {
                    text: std::mem::take(&mut buffer),
                    style: TextStyle::from_flags(bold, italic),
                });
            }
            if marker == 2 {
                bold = !bold;
            } else {
                italic = !italic;
            }
        } else {
            buffer.push_str(&rest[..marker]);
        }
        rest = after;
    }

    if !buffer.is_empty() {
        segments.push(TextSegment {
            text: buffer,
            style: TextStyle::from_flags(bold, italic),
        });
    }
    segments
}

fn styled_paragraph(prefix: Option<&str>, line: &str) -> Paragraph {
    let mut paragraph = Paragraph::new("");
    if let Some(prefix) = prefix {
        paragraph.push(StyledString::new(prefix.to_string(), Style::new()));
    }
    for segment in parse_styles(line) {
        paragraph.push(StyledString::new(segment.text, segment.style.to_style()));
    }
    paragraph
}

/// Arial if present in `fonts_dir`, LiberationSans otherwise.
fn load_font(fonts_dir: &Path) -> Result<FontFamily<FontData>> {
    if let Ok(family) = genpdf::fonts::from_files(fonts_dir, "Arial", None) {
        return Ok(family);
    }
    genpdf::fonts::from_files(fonts_dir, "LiberationSans", None).map_err(|e| {
        EngineError::RenderFailure(format!(
            "no usable font in {}: {}",
            fonts_dir.display(),
            e
        ))
    })
}

fn configure_document(fonts_dir: &Path) -> Result<Document> {
    let mut doc = Document::new(load_font(fonts_dir)?);
    doc.set_title("Textami document");
    doc.set_font_size(10);
    doc.set_line_spacing(1.0f64);

    let mut decorator = genpdf::SimplePageDecorator::new();
    decorator.set_margins(10);
    doc.set_page_decorator(decorator);
    Ok(doc)
}

/// Lays out `text` and returns the PDF bytes.
pub fn render_pdf(text: &str, fonts_dir: &Path) -> Result<Vec<u8>> {
    let mut doc = configure_document(fonts_dir)?;
    for line in text.lines() {
        if line.trim().is_empty() {
            doc.push(Break::new(1));
        } else if let Some(item) = line.strip_prefix("- ") {
            let mut layout = LinearLayout::vertical();
            layout.push(styled_paragraph(Some("• "), item));
            doc.push(layout);
        } else {
            doc.push(styled_paragraph(None, line));
        }
    }

    let mut out = Vec::new();
    doc.render(&mut out)
        .map_err(|e| EngineError::RenderFailure(format!("PDF layout failed: {}", e)))?;
    Ok(out)
}
