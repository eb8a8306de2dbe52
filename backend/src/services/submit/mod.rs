mod record;

use crate::services::JSON_LIMIT;
use actix_web::error::{InternalError, JsonPayloadError};
use actix_web::web::{post, scope, JsonConfig};
use actix_web::{HttpResponse, Scope};
use feeds_common::responses::SubmitResponse;
use log::warn;

const API_PATH: &str = "/submit";

/// `POST /submit/` stores the completed response and answers with the
/// completion code matching its attention checks.
pub fn configure_routes() -> Scope {
    scope(API_PATH)
        .app_data(
            JsonConfig::default()
                .limit(JSON_LIMIT)
                .error_handler(|err, _| unreadable(err)),
        )
        .route("/", post().to(record::process))
}

fn unreadable(err: JsonPayloadError) -> actix_web::Error {
    warn!("Unreadable response body: {err}");
    let body = SubmitResponse::Error {
        message: err.to_string(),
    };
    InternalError::from_response(err, HttpResponse::BadRequest().json(body)).into()
}
