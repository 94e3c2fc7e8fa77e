//! # Template Service Module
//!
//! Routes under `/api/templates`.
//!
//! *   **`POST /freeze`**:
//!     - **Handler**: `freeze::process`
//!     - **Description**: Decodes the base64 document, replaces every mapped
//!       tag's example with its `{{slug}}` placeholder and stores the result
//!       under `templateId`. Returns the stored template with its freeze
//!       report. A template id can only be frozen once; a repeat is `409`.
//!
//! *   **`GET /{template_id}`**:
//!     - **Handler**: `get::process`
//!     - **Description**: Returns the metadata and freeze report of a stored
//!       template.

mod freeze;
mod get;

use actix_web::web::{get, post, scope};
use actix_web::Scope;

const API_PATH: &str = "/api/templates";

pub fn configure_routes() -> Scope {
    scope(API_PATH)
        .route("/freeze", post().to(freeze::process))
        .route("/{template_id}", get().to(get::process))
}
