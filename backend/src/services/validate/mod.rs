//! # Validate Service
//!
//! Entry point of a participant session. A call:
//!
//! 1. draws an assignment (feeds, rotations, proof flag, option orders),
//! 2. loads the feed metadata and signs every image URL,
//! 3. records the session start,
//! 4. only then returns the feed data.
//!
//! Any failure along the way is answered with `{valid: false, message}` and
//! no feed data.
//!
//! ## Routes
//!
//! - `POST /validate/`: Prolific identity as JSON body
//! - `GET /validate/`: Prolific identity as query string
//! - `GET /validate/{participant_id}`: hand-typed participant id, checked
//!   against the allow-list when one is configured

mod legacy;
mod start;

use crate::services::JSON_LIMIT;
use actix_web::error::InternalError;
use actix_web::web::{get, post, scope, JsonConfig, QueryConfig};
use actix_web::{HttpResponse, Scope};
use feeds_common::responses::ValidateResponse;
use log::warn;
use std::fmt::{Debug, Display};

const API_PATH: &str = "/validate";
const MALFORMED_IDENTITY: &str = "Missing or malformed participant identity";

pub fn configure_routes() -> Scope {
    scope(API_PATH)
        .app_data(
            JsonConfig::default()
                .limit(JSON_LIMIT)
                .error_handler(|err, _| malformed(err)),
        )
        .app_data(QueryConfig::default().error_handler(|err, _| malformed(err)))
        .route("/", post().to(start::process_json))
        .route("/", get().to(start::process_query))
        .route("/{participant_id}", get().to(legacy::process))
}

/// Extractor failures still answer with a `ValidateResponse` body.
fn malformed<E: Debug + Display + 'static>(err: E) -> actix_web::Error {
    warn!("Malformed validate request: {err}");
    let body = ValidateResponse::rejected(MALFORMED_IDENTITY);
    InternalError::from_response(err, HttpResponse::BadRequest().json(body)).into()
}
