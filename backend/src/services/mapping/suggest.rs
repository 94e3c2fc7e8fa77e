use actix_web::{web, HttpResponse, Responder};
use common::requests::SuggestMappingRequest;
use log::info;

use crate::config::AppConfig;
use crate::engines::mapping::suggest_by_tag;
use crate::services::error_response;

/// Handler for `POST /api/mapping/suggest`.
pub(crate) async fn process(
    config: web::Data<AppConfig>,
    payload: web::Json<SuggestMappingRequest>,
) -> impl Responder {
    let req = payload.into_inner();
    let threshold = req.threshold.unwrap_or(config.mapping_threshold);
    match suggest_by_tag(&req.tags, &req.headers, threshold) {
        Ok(report) => {
            info!(
                "Suggested {} of {} tags ({}%)",
                report.mapped_count,
                report.total,
                report.coverage_percent()
            );
            HttpResponse::Ok().json(report)
        }
        Err(e) => error_response(&e),
    }
}
