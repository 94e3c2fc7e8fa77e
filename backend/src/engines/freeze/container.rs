//! Document containers for the freeze engine.
//!
//! Freezing edits text only. A container extracts that text from the
//! uploaded bytes and puts the edited text back, leaving everything else as
//! it was.

use crate::error::{EngineError, Result};

/// Access to the text layer of a document container.
///
/// `write_text` must keep every non-text part of `original` untouched and
/// only swap in the edited text.
pub trait DocumentContainer {
    fn read_text(&self, bytes: &[u8]) -> Result<String>;
    fn write_text(&self, original: &[u8], text: &str) -> Result<Vec<u8>>;
}

const UTF8_BOM: &[u8] = b"\xEF\xBB\xBF";

/// UTF-8 text documents. A leading byte-order mark is kept out of the text
/// layer and restored on write.
#[derive(Debug, Clone, Copy, Default)]
pub struct PlainTextContainer;

impl DocumentContainer for PlainTextContainer {
    fn read_text(&self, bytes: &[u8]) -> Result<String> {
        let body = bytes.strip_prefix(UTF8_BOM).unwrap_or(bytes);
        String::from_utf8(body.to_vec())
            .map_err(|e| EngineError::Container(format!("document is not valid UTF-8: {}", e)))
    }

    fn write_text(&self, original: &[u8], text: &str) -> Result<Vec<u8>> {
        let mut out = Vec::with_capacity(text.len() + UTF8_BOM.len());
        if original.starts_with(UTF8_BOM) {
            out.extend_from_slice(UTF8_BOM);
        }
        out.extend_from_slice(text.as_bytes());
        Ok(out)
    }
}
