//! `GET /api/generation/status/{job_id}`: polls a job started by
//! `/api/generation/start`.

use crate::job_controller::state::JobsState;
use actix_web::{web, HttpResponse, Responder};

/// Latest [`JobStatus`](common::jobs::JobStatus) of the job, or `404` for an
/// unknown id. A completed job carries its batch report.
pub(crate) async fn process(
    job_id: web::Path<String>,
    state: web::Data<JobsState>,
) -> impl Responder {
    match state.status(&job_id).await {
        Some(status) => HttpResponse::Ok().json(status),
        None => HttpResponse::NotFound().body("Job ID not found"),
    }
}
