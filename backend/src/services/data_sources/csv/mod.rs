//! CSV datasets.
//!
//! - `POST /api/data_sources/csv/upload`: multipart/form-data with a `file`
//!   field holding a `.csv`. The upload is hashed, parsed and returned as a
//!   `Dataset` (headers, inferred column types, rows) ready to be mapped and
//!   sent to generation. Nothing is stored server-side.

use actix_web::web::{post, scope};
use actix_web::Scope;

mod upload;
pub mod verify;

const API_PATH: &str = "/api/data_sources/csv";

pub fn configure_routes() -> Scope {
    scope(API_PATH).route("/upload", post().to(upload::process))
}
