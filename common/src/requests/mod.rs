//! Request payloads of the HTTP API.

use crate::model::generation::{OutputFormat, RowData};
use crate::model::mapping::Mapping;
use crate::model::tag::Tag;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SuggestMappingRequest {
    pub tags: Vec<Tag>,
    pub headers: Vec<String>,
    /// Falls back to the server's configured threshold.
    #[serde(default)]
    pub threshold: Option<f64>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CoverHeadersRequest {
    pub tags: Vec<Tag>,
    pub headers: Vec<String>,
    #[serde(default)]
    pub context: Option<String>,
    /// Raw output of the reasoning step, a JSON array of proposals.
    #[serde(default)]
    pub reasoning_output: Option<String>,
}

/// Inputs for building the reasoning prompt of a header-major mapping.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReasoningPromptRequest {
    pub tags: Vec<Tag>,
    pub headers: Vec<String>,
    #[serde(default)]
    pub context: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FreezeTemplateRequest {
    pub template_id: String,
    /// The source document, base64 encoded.
    pub document_base64: String,
    pub tags: Vec<Tag>,
    pub mappings: Mapping,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StartGenerationRequest {
    pub template_id: String,
    pub rows: Vec<RowData>,
    pub mappings: Mapping,
    #[serde(default)]
    pub batch_size: Option<usize>,
    #[serde(default)]
    pub format: OutputFormat,
}
