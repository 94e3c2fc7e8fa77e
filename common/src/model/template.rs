use crate::model::place_holder::PlaceholderReplacement;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Per-run summary of the freeze step.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FreezeReport {
    pub replacements: Vec<PlaceholderReplacement>,
    pub total: usize,
    pub successful: usize,
    /// Example strings that no strategy could place.
    pub manual_review_required: Vec<String>,
}

/// A document whose example values have been replaced by placeholder tokens.
///
/// Built once by the freeze step and never edited afterwards.
#[derive(Debug, Clone, PartialEq)]
pub struct FrozenTemplate {
    bytes: Vec<u8>,
    report: FreezeReport,
}

impl FrozenTemplate {
    pub fn new(bytes: Vec<u8>, report: FreezeReport) -> Self {
        Self { bytes, report }
    }

    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }

    pub fn report(&self) -> &FreezeReport {
        &self.report
    }
}

/// Metadata of a frozen template as kept by the template store.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StoredTemplate {
    pub template_id: String,
    pub md5: String,
    pub size: usize,
    pub created_at: DateTime<Utc>,
    pub report: FreezeReport,
}
