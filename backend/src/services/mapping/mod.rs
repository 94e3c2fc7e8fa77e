//! # Mapping Service Module
//!
//! Routes under `/api/mapping`:
//!
//! *   **`POST /suggest`**: tag-major mapping. Each tag gets its best header
//!     when the score clears the threshold (request value, or the configured
//!     default).
//! *   **`POST /prompt`**: the reasoning prompt for a header-major run, built
//!     from tags, headers and optional document context.
//! *   **`POST /cover`**: header-major mapping. Every header gets a tag. The
//!     client passes the raw reasoning output it obtained; missing headers
//!     are filled by name similarity.

mod cover;
mod prompt;
mod suggest;

use actix_web::web::{post, scope};
use actix_web::Scope;

const API_PATH: &str = "/api/mapping";

pub fn configure_routes() -> Scope {
    scope(API_PATH)
        .route("/suggest", post().to(suggest::process))
        .route("/prompt", post().to(prompt::process))
        .route("/cover", post().to(cover::process))
}
