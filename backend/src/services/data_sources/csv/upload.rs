use actix_multipart::Multipart;
use actix_web::{HttpResponse, Responder};
use common::model::csv::Dataset;
use futures_util::StreamExt;
use log::info;
use md5::Context;

use super::verify::parse_dataset;
use crate::error::{EngineError, Result};
use crate::services::error_response;

/// HTTP handler for `POST /api/data_sources/csv/upload`.
///
/// - On success: `200 OK` with the parsed `Dataset`.
/// - On failure: `400 Bad Request` with the error message.
pub async fn process(payload: Multipart) -> impl Responder {
    match upload_dataset(payload).await {
        Ok(dataset) => HttpResponse::Ok().json(dataset),
        Err(e) => error_response(&e),
    }
}

fn bad_upload(err: impl std::fmt::Display) -> EngineError {
    EngineError::InvalidInput(format!("upload: {}", err))
}

/// Reads the `file` field, hashing it while it streams in.
pub async fn upload_dataset(mut payload: Multipart) -> Result<Dataset> {
    let mut md5_hasher = Context::new();
    let mut bytes: Option<Vec<u8>> = None;

    while let Some(item) = payload.next().await {
        let mut field = item.map_err(bad_upload)?;
        let name = field
            .content_disposition()
            .and_then(|cd| cd.get_name().map(|n| n.to_string()));
        if name.as_deref() != Some("file") {
            continue;
        }

        let filename = field
            .content_disposition()
            .and_then(|cd| cd.get_filename().map(|f| f.to_string()))
            .unwrap_or_default();
        if !filename.to_lowercase().ends_with(".csv") {
            return Err(EngineError::InvalidInput(
                "The file must end with .csv".to_string(),
            ));
        }

        let mut buf = Vec::new();
        while let Some(chunk) = field.next().await {
            let chunk = chunk.map_err(bad_upload)?;
            md5_hasher.consume(&chunk);
            buf.extend_from_slice(&chunk);
        }
        bytes = Some(buf);
    }

    let bytes = bytes.ok_or_else(|| EngineError::InvalidInput("Missing file".to_string()))?;
    let md5 = format!("{:x}", md5_hasher.finalize());
    let (headers, columns, rows) = parse_dataset(&bytes)?;
    info!(
        "Dataset {} uploaded: {} columns, {} rows",
        md5,
        headers.len(),
        rows.len()
    );
    Ok(Dataset {
        md5,
        headers,
        columns,
        rows,
    })
}
