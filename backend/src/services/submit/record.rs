use crate::state::AppState;
use crate::study::responses::{ResponseRecorder, SubmitError};
use actix_web::{web, HttpResponse, Responder};
use feeds_common::responses::SubmitResponse;
use log::{error, info, warn};
use serde_json::Value;

pub(crate) async fn process(state: web::Data<AppState>, payload: web::Json<Value>) -> impl Responder {
    let recorder = ResponseRecorder::new(
        state.documents.as_ref(),
        &state.collections,
        &state.completion,
    );

    match recorder.record(payload.into_inner()).await {
        Ok(outcome) => {
            info!(
                "Response {} stored in {} (attention check passed: {})",
                outcome.id, outcome.collection, outcome.passed
            );
            HttpResponse::Ok().json(SubmitResponse::Success {
                completion_code: outcome.completion.code,
                completion_url: outcome.completion.url,
            })
        }
        Err(err) => {
            match &err {
                SubmitError::Store(_) => error!("Failed to store response: {err}"),
                _ => warn!("Rejected response: {err}"),
            }
            HttpResponse::Ok().json(SubmitResponse::Error {
                message: err.to_string(),
            })
        }
    }
}
