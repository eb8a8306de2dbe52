use crate::error::ValidateError;
use crate::services::validate::start::{respond, start_session};
use crate::state::AppState;
use actix_web::{web, Responder};
use chrono::{SecondsFormat, Utc};
use feeds_common::model::session::SessionIdentity;

/// `GET /validate/{participant_id}` for participants joining without Prolific.
pub(crate) async fn process(
    state: web::Data<AppState>,
    participant_id: web::Path<String>,
) -> impl Responder {
    let participant_id = participant_id.into_inner();

    if let Some(allow_list) = &state.allow_list {
        if !allow_list.contains(&participant_id) {
            return respond(Err(ValidateError::UnknownParticipant(participant_id)));
        }
    }

    let identity = SessionIdentity::Legacy {
        participant_id,
        timestamp: Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true),
    };
    respond(start_session(&state, identity, None).await)
}
