use actix_web::{web, HttpResponse, Responder};
use common::requests::CoverHeadersRequest;
use log::info;

use crate::engines::mapping::cover_headers;
use crate::engines::mapping::reasoner::PrecomputedReasoner;
use crate::services::error_response;

/// Handler for `POST /api/mapping/cover`.
///
/// The generative call itself happens outside this service. The client sends
/// the text from `/api/mapping/prompt`, and the raw answer arrives here as
/// `reasoningOutput` to be replayed through [`PrecomputedReasoner`].
pub(crate) async fn process(payload: web::Json<CoverHeadersRequest>) -> impl Responder {
    let req = payload.into_inner();
    let reasoner = PrecomputedReasoner::new(req.reasoning_output);
    match cover_headers(&req.tags, &req.headers, req.context.as_deref(), &reasoner) {
        Ok(report) => {
            info!("Covered {} headers", report.mapped_count);
            HttpResponse::Ok().json(report)
        }
        Err(e) => error_response(&e),
    }
}
