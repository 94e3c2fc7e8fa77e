//! # Generation Engine
//!
//! Fills a frozen template once per dataset row. Rows run strictly in input
//! order, one render and persist at a time; a failing row is recorded and the
//! batch moves on.

pub mod pdf;
pub mod render;
pub mod store;

use std::collections::HashMap;
use std::time::Instant;

use chrono::Utc;
use common::model::generation::{
    Batch, GeneratedDocument, GenerationError, OutputFormat, RowData,
};
use common::model::mapping::Mapping;
use log::{error, info};
use uuid::Uuid;

use crate::error::{EngineError, Result};
use render::TemplateRenderer;
use store::DocumentStore;

#[derive(Debug, Clone)]
pub struct GenerationOptions {
    /// Maximum rows to process; `None` means the whole dataset.
    pub batch_size: Option<usize>,
    pub format: OutputFormat,
    /// Prefix of generated file names.
    pub file_stem: String,
}

impl Default for GenerationOptions {
    fn default() -> Self {
        Self {
            batch_size: None,
            format: OutputFormat::Text,
            file_stem: "document".to_string(),
        }
    }
}

/// Slug to placeholder text for one row. Mapped columns missing from the
/// row become empty text.
pub fn build_values(row: &RowData, mapping: &Mapping) -> HashMap<String, String> {
    mapping
        .slugs()
        .into_iter()
        .map(|slug| {
            let value = mapping
                .header_for(slug)
                .and_then(|header| row.get(header))
                .map(|cell| cell.to_placeholder_value())
                .unwrap_or_default();
            (slug.to_string(), value)
        })
        .collect()
}

fn sanitize_stem(stem: &str) -> String {
    let cleaned: String = stem
        .trim()
        .chars()
        .map(|c| if c.is_alphanumeric() || c == '-' || c == '_' { c } else { '_' })
        .collect();
    if cleaned.is_empty() {
        "document".to_string()
    } else {
        cleaned
    }
}

pub fn generate(
    template: &[u8],
    rows: &[RowData],
    mapping: &Mapping,
    options: &GenerationOptions,
    renderer: &dyn TemplateRenderer,
    store: &dyn DocumentStore,
) -> Result<Batch> {
    generate_with_progress(template, rows, mapping, options, renderer, store, &mut |_, _| {})
}

/// Same as [`generate`], calling `progress(done, requested)` after each row.
pub fn generate_with_progress(
    template: &[u8],
    rows: &[RowData],
    mapping: &Mapping,
    options: &GenerationOptions,
    renderer: &dyn TemplateRenderer,
    store: &dyn DocumentStore,
    progress: &mut dyn FnMut(usize, usize),
) -> Result<Batch> {
    if template.is_empty() {
        return Err(EngineError::InvalidInput("template is empty".to_string()));
    }
    if rows.is_empty() {
        return Err(EngineError::InvalidInput("no rows to generate".to_string()));
    }
    if mapping.is_empty() {
        return Err(EngineError::InvalidInput("mapping is empty".to_string()));
    }
    if options.batch_size == Some(0) {
        return Err(EngineError::InvalidInput("batch size must be positive".to_string()));
    }

    let started = Instant::now();
    let batch_id = Uuid::new_v4().to_string();
    let requested = options.batch_size.map_or(rows.len(), |cap| cap.min(rows.len()));
    let stem = sanitize_stem(&options.file_stem);
    info!(
        "Batch {}: generating {} of {} rows as {}",
        batch_id,
        requested,
        rows.len(),
        options.format.extension()
    );

    let mut documents = Vec::new();
    let mut errors = Vec::new();
    for (row_index, row) in rows.iter().take(requested).enumerate() {
        let file_name = format!("{}_{}.{}", stem, row_index + 1, options.format.extension());
        let values = build_values(row, mapping);
        let outcome = renderer
            .render(template, &values)
            .and_then(|bytes| store.persist(&file_name, &bytes).map(|url| (url, bytes.len())));

        match outcome {
            Ok((download_url, file_size)) => documents.push(GeneratedDocument {
                document_id: Uuid::new_v4().to_string(),
                file_name,
                download_url,
                row_index,
                row_data: row.clone(),
                file_size,
                generated_at: Utc::now(),
            }),
            Err(e) => {
                error!("Batch {}: row {} failed: {}", batch_id, row_index, e);
                errors.push(GenerationError {
                    row_index,
                    error: e.to_string(),
                    row_data: row.clone(),
                });
            }
        }
        progress(row_index + 1, requested);
    }

    let batch = Batch {
        batch_id,
        total_requested: requested,
        total_generated: documents.len(),
        total_errors: errors.len(),
        documents,
        errors,
        processing_time: started.elapsed().as_millis() as u64,
    };
    info!(
        "Batch {}: {} generated, {} failed in {} ms",
        batch.batch_id, batch.total_generated, batch.total_errors, batch.processing_time
    );
    Ok(batch)
}
