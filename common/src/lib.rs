//! Data model shared by the Textami engines and the HTTP surface.
//!
//! Everything here is plain serde data: tags detected in a source document,
//! tag-to-header mappings, the freeze report with its placeholder
//! replacements, and the generation batch with its per-row documents and
//! errors. Wire names are camelCase.

pub mod jobs;
pub mod model;
pub mod requests;
