//! HTTP surface of the study backend.
//!
//! - `GET /`: liveness check
//! - `/validate/...`: assign feeds to a participant and record the session start
//! - `POST /submit/`: record a completed response

pub mod health;
pub mod submit;
pub mod validate;

use actix_web::web;

/// Largest JSON body accepted by `/validate/` and `/submit/`.
pub const JSON_LIMIT: usize = 1024 * 1024; // 1 MB

/// Registers every route; shared by `main.rs` and the handler tests.
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(health::configure_routes())
        .service(validate::configure_routes())
        .service(submit::configure_routes());
}
