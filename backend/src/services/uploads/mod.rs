//! File storage for `file` fields.
//!
//! - `POST /upload`: accepts a multipart body with a single `file` part,
//!   writes the bytes under the configured upload directory and answers with
//!   `{"success": true, "filePath": "uploads/<name>"}`. The stored name is the
//!   MD5 hex digest of the content followed by the original extension, so
//!   uploading the same file twice yields the same reference.
//!
//! Stored files are read back through `GET /uploads/{name}`, which `main.rs`
//! mounts with `actix-files`. Clients build preview URLs by prefixing the
//! returned `filePath` with the server's base address.

use actix_web::web::{post, scope};
use actix_web::Scope;

mod upload;

pub use upload::UPLOADS_ROUTE;

const API_PATH: &str = "/upload";

/// Configures and returns the Actix scope for the upload route.
pub fn configure_routes() -> Scope {
    scope(API_PATH).route("", post().to(upload::process))
}
