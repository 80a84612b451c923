//! Receives submitted form values.
//!
//! - `POST /submit-form`: takes the JSON object of field values the form hands
//!   over after a successful client-side validation, logs it, and echoes it
//!   back as `{"success": true, "data": ...}`. No server-side validation is
//!   repeated here.

mod submit;

use actix_web::web::{post, scope};
use actix_web::Scope;

const API_PATH: &str = "/submit-form";

pub fn configure_routes() -> Scope {
    scope(API_PATH).route("", post().to(submit::process))
}
