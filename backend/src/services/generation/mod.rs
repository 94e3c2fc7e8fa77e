//! # Generation Service Module
//!
//! Routes under `/api/generation`:
//!
//! *   **`POST /start`**: loads the frozen template, schedules a background
//!     batch over the posted rows and answers with `{"jobId": ...}` at once.
//! *   **`GET /status/{job_id}`**: the job's `JobStatus`. A finished job
//!     carries the full batch report, including per-row errors.

mod get_status;
mod start;

use actix_web::web::{get, post, scope};
use actix_web::Scope;

const API_PATH: &str = "/api/generation";

pub fn configure_routes() -> Scope {
    scope(API_PATH)
        .route("/start", post().to(start::process))
        .route("/status/{job_id}", get().to(get_status::process))
}
