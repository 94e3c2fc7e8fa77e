use actix_web::{web, HttpResponse, Responder};
use common::model::mapping::ReasoningPrompt;
use common::requests::ReasoningPromptRequest;
use log::debug;

use crate::engines::mapping::reasoner::ReasoningRequest;
use crate::error::EngineError;
use crate::services::error_response;

/// Handler for `POST /api/mapping/prompt`.
///
/// Returns the text whose answer the client later passes to
/// `/api/mapping/cover` as `reasoningOutput`.
pub(crate) async fn process(payload: web::Json<ReasoningPromptRequest>) -> impl Responder {
    let req = payload.into_inner();
    if req.tags.is_empty() {
        return error_response(&EngineError::InvalidInput("no tags to map".to_string()));
    }
    if req.headers.is_empty() {
        return error_response(&EngineError::InvalidInput("no headers to cover".to_string()));
    }
    let request = ReasoningRequest {
        tags: &req.tags,
        headers: &req.headers,
        context: req.context.as_deref(),
    };
    let prompt = request.prompt();
    debug!("Built reasoning prompt of {} bytes", prompt.len());
    HttpResponse::Ok().json(ReasoningPrompt { prompt })
}
