//! # HTTP Services
//!
//! Actix scopes for each area of the API. Handlers stay thin: they decode the
//! request, call an engine or the template store, and turn an
//! [`EngineError`] into a status code with a plain-text body.

pub mod data_sources;
pub mod generation;
pub mod mapping;
pub mod templates;

use actix_web::{web, HttpResponse};

use crate::error::EngineError;

/// Registers every API scope on `cfg`.
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(mapping::configure_routes())
        .service(templates::configure_routes())
        .service(data_sources::csv::configure_routes())
        .service(generation::configure_routes());
}

/// Status code for a failed call:
/// 400 for bad input, 404/409 for template store conflicts, 502 when the
/// reasoning step misbehaved, 500 for everything else.
pub(crate) fn error_response(err: &EngineError) -> HttpResponse {
    let mut builder = match err {
        EngineError::InvalidInput(_) | EngineError::Container(_) => HttpResponse::BadRequest(),
        EngineError::TemplateNotFound(_) => HttpResponse::NotFound(),
        EngineError::AlreadyFrozen(_) => HttpResponse::Conflict(),
        EngineError::UpstreamReasoningFailure(_) => HttpResponse::BadGateway(),
        _ => HttpResponse::InternalServerError(),
    };
    builder.body(err.to_string())
}
