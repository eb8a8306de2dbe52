use crate::error::ValidateError;
use crate::state::AppState;
use crate::study::feeds::FeedCatalog;
use crate::study::session::SessionRecorder;
use actix_web::{web, HttpResponse, Responder};
use feeds_common::model::session::SessionIdentity;
use feeds_common::requests::ValidateRequest;
use feeds_common::responses::{FeedPayload, ValidateResponse};
use log::{info, warn};
use rand::rngs::StdRng;
use rand::SeedableRng;

/// `POST /validate/` with the Prolific identity as JSON.
pub(crate) async fn process_json(
    state: web::Data<AppState>,
    payload: web::Json<ValidateRequest>,
) -> impl Responder {
    let (identity, timestamp) = payload.into_inner().into_parts();
    respond(start_session(&state, identity, timestamp).await)
}

/// `GET /validate/?PROLIFIC_PID=..&STUDY_ID=..&SESSION_ID=..`
pub(crate) async fn process_query(
    state: web::Data<AppState>,
    query: web::Query<ValidateRequest>,
) -> impl Responder {
    let (identity, timestamp) = query.into_inner().into_parts();
    respond(start_session(&state, identity, timestamp).await)
}

pub(super) fn respond(result: Result<FeedPayload, ValidateError>) -> HttpResponse {
    match result {
        Ok(payload) => HttpResponse::Ok().json(ValidateResponse::accepted(payload)),
        Err(err) => {
            warn!("Validation rejected: {err}");
            HttpResponse::Ok().json(ValidateResponse::rejected(err.public_message()))
        }
    }
}

/// Assigns, resolves and records a session. The payload is only returned once
/// the session start is stored.
pub(super) async fn start_session(
    state: &AppState,
    identity: SessionIdentity,
    timestamp: Option<String>,
) -> Result<FeedPayload, ValidateError> {
    let assignment = state.assignment.assign(&mut StdRng::from_os_rng());

    let catalog = FeedCatalog::new(state.objects.as_ref());
    let resolved = catalog.resolve(&assignment).await?;
    let payload = catalog.payload(&resolved, &assignment.options).await?;

    let recorded = SessionRecorder::new(state.documents.as_ref(), &state.collections)
        .record(&identity, timestamp, &assignment)
        .await
        .map_err(ValidateError::SessionNotRecorded)?;
    info!(
        "Session {} assigned feeds {:?} (proof: {})",
        recorded.id,
        assignment.feed_ids(),
        assignment.show_proof
    );

    Ok(payload)
}

#[cfg(test)]
mod tests {
    use crate::services;
    use crate::storage::document_store::MockDocumentStore;
    use crate::storage::{DocumentStoreError, SqliteDocumentStore};
    use crate::testing;
    use actix_web::http::StatusCode;
    use actix_web::{test, web, App};
    use serde_json::{json, Value};
    use std::collections::HashSet;
    use std::sync::{Arc, Mutex};

    fn identity(pid: &str) -> Value {
        json!({ "PROLIFIC_PID": pid, "STUDY_ID": "test", "SESSION_ID": "test" })
    }

    #[actix_web::test]
    async fn returns_feed_data_after_recording_the_session() {
        let dir = tempfile::tempdir().unwrap();
        testing::write_bucket(dir.path(), &testing::FEEDS);
        let documents = Arc::new(SqliteDocumentStore::new(dir.path().join("db.sqlite")));
        let state = testing::app_state(
            Arc::new(testing::object_store(dir.path())),
            documents.clone(),
        );
        let app = test::init_service(
            App::new()
                .app_data(web::Data::new(state))
                .configure(services::configure),
        )
        .await;

        let req = test::TestRequest::post()
            .uri("/validate/")
            .set_json(json!({
                "PROLIFIC_PID": "5f0c",
                "STUDY_ID": "study-9",
                "SESSION_ID": "sess-3",
                "timestamp": "2025-03-01T12:00:00Z"
            }))
            .to_request();
        let body: Value = test::call_and_read_body_json(&app, req).await;

        assert_eq!(body["valid"], json!(true));
        let feeds: Vec<String> = serde_json::from_value(body["feeds"].clone()).unwrap();
        assert_eq!(feeds.iter().collect::<HashSet<_>>().len(), 3);
        assert_eq!(body["feedURLs"].as_array().unwrap().len(), 3);
        for feed in &feeds {
            assert!(body["feedData"][feed].is_array());
            assert_eq!(body["postURLs"][feed].as_object().unwrap().len(), 3);
        }
        assert_eq!(body["optionsRandomized"]["likert"].as_array().unwrap().len(), 3);

        let records = documents.documents("session-starts").unwrap();
        assert_eq!(records.len(), 1);
        let recorded: Vec<&str> = records[0]["assignment"]["feeds"]
            .as_array()
            .unwrap()
            .iter()
            .map(|f| f["feed"].as_str().unwrap())
            .collect();
        assert_eq!(recorded, feeds);
        assert_eq!(records[0]["timestamp"], json!("2025-03-01T12:00:00Z"));
        assert_eq!(records[0]["identity"]["SESSION_ID"], json!("sess-3"));
    }

    #[actix_web::test]
    async fn show_proof_is_shared_by_all_feeds() {
        let dir = tempfile::tempdir().unwrap();
        testing::write_bucket(dir.path(), &testing::FEEDS);
        let state = testing::app_state(
            Arc::new(testing::object_store(dir.path())),
            Arc::new(SqliteDocumentStore::new(dir.path().join("db.sqlite"))),
        );
        let app = test::init_service(
            App::new()
                .app_data(web::Data::new(state))
                .configure(services::configure),
        )
        .await;

        for _ in 0..10 {
            let req = test::TestRequest::post()
                .uri("/validate/")
                .set_json(identity("p"))
                .to_request();
            let body: Value = test::call_and_read_body_json(&app, req).await;

            let variants: HashSet<bool> = body["feedURLs"]
                .as_array()
                .unwrap()
                .iter()
                .map(|url| url.as_str().unwrap().contains("/proof-"))
                .collect();
            assert_eq!(variants.len(), 1);
        }
    }

    #[actix_web::test]
    async fn query_string_identity_is_accepted() {
        let dir = tempfile::tempdir().unwrap();
        testing::write_bucket(dir.path(), &testing::FEEDS);
        let seen = Arc::new(Mutex::new(Vec::new()));
        let captured = seen.clone();
        let mut documents = MockDocumentStore::new();
        documents.expect_insert().times(1).returning(move |collection, _| {
            captured.lock().unwrap().push(collection);
            Ok("session-id".to_string())
        });
        let state = testing::app_state(
            Arc::new(testing::object_store(dir.path())),
            Arc::new(documents),
        );
        let app = test::init_service(
            App::new()
                .app_data(web::Data::new(state))
                .configure(services::configure),
        )
        .await;

        let req = test::TestRequest::get()
            .uri("/validate/?PROLIFIC_PID=test&STUDY_ID=test&SESSION_ID=test")
            .to_request();
        let body: Value = test::call_and_read_body_json(&app, req).await;

        assert_eq!(body["valid"], json!(true));
        assert_eq!(*seen.lock().unwrap(), vec!["test-session-starts"]);
    }

    #[actix_web::test]
    async fn failed_session_write_discloses_nothing() {
        let dir = tempfile::tempdir().unwrap();
        testing::write_bucket(dir.path(), &testing::FEEDS);
        let mut documents = MockDocumentStore::new();
        documents
            .expect_insert()
            .times(1)
            .returning(|_, _| Err(DocumentStoreError::Database(rusqlite::Error::InvalidQuery)));
        let state = testing::app_state(
            Arc::new(testing::object_store(dir.path())),
            Arc::new(documents),
        );
        let app = test::init_service(
            App::new()
                .app_data(web::Data::new(state))
                .configure(services::configure),
        )
        .await;

        let req = test::TestRequest::post()
            .uri("/validate/")
            .set_json(identity("p"))
            .to_request();
        let body: Value = test::call_and_read_body_json(&app, req).await;

        assert_eq!(body["valid"], json!(false));
        assert!(body["message"].is_string());
        for key in ["feeds", "feedURLs", "feedData", "postURLs", "optionsRandomized"] {
            assert!(body.get(key).is_none(), "{key} disclosed");
        }
    }

    #[actix_web::test]
    async fn missing_metadata_records_nothing() {
        let dir = tempfile::tempdir().unwrap();
        let mut documents = MockDocumentStore::new();
        documents.expect_insert().never();
        let state = testing::app_state(
            Arc::new(testing::object_store(dir.path())),
            Arc::new(documents),
        );
        let app = test::init_service(
            App::new()
                .app_data(web::Data::new(state))
                .configure(services::configure),
        )
        .await;

        let req = test::TestRequest::post()
            .uri("/validate/")
            .set_json(identity("p"))
            .to_request();
        let body: Value = test::call_and_read_body_json(&app, req).await;

        assert_eq!(body["valid"], json!(false));
        assert!(body.get("feedURLs").is_none());
    }

    #[actix_web::test]
    async fn malformed_identity_gets_a_structured_rejection() {
        let dir = tempfile::tempdir().unwrap();
        let mut documents = MockDocumentStore::new();
        documents.expect_insert().never();
        let state = testing::app_state(
            Arc::new(testing::object_store(dir.path())),
            Arc::new(documents),
        );
        let app = test::init_service(
            App::new()
                .app_data(web::Data::new(state))
                .configure(services::configure),
        )
        .await;

        let requests = [
            test::TestRequest::post()
                .uri("/validate/")
                .set_json(json!({ "PROLIFIC_PID": "p", "STUDY_ID": "s" }))
                .to_request(),
            test::TestRequest::get().uri("/validate/").to_request(),
        ];
        for req in requests {
            let resp = test::call_service(&app, req).await;
            assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

            let body: Value = test::read_body_json(resp).await;
            assert_eq!(
                body,
                json!({ "valid": false, "message": "Missing or malformed participant identity" })
            );
        }
    }
}
