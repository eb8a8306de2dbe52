//! # Response Recorder
//!
//! Stores a submitted response document as is, then scores its attention
//! checks to pick the completion code sent back to the participant.

use crate::storage::{DocumentStore, DocumentStoreError};
use crate::study::attention::{self, AttentionCheckError};
use crate::study::collections::{CollectionResolver, RecordKind};
use chrono::{SecondsFormat, Utc};
use feeds_common::model::session::{ProlificIdentity, SessionIdentity};
use log::info;
use serde_json::{Map, Value};
use thiserror::Error;

const LEGACY_PARTICIPANT_FIELD: &str = "participantID";
const LEGACY_TIMESTAMP_FIELD: &str = "consentTimestamp";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompletionPair {
    pub code: String,
    pub url: String,
}

/// Completion code and redirect for passed and failed submissions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompletionPolicy {
    pub success: CompletionPair,
    pub failure: CompletionPair,
}

impl CompletionPolicy {
    pub fn select(&self, passed: bool) -> &CompletionPair {
        if passed {
            &self.success
        } else {
            &self.failure
        }
    }
}

#[derive(Debug, Error)]
pub enum SubmitError {
    #[error("response must be a JSON object")]
    NotAnObject,

    #[error("response has neither a prolific object nor a participantID")]
    NoIdentity,

    #[error("response is missing prolific.{0}")]
    MissingIdentity(&'static str),

    #[error("prolific.{0} is not a string")]
    InvalidIdentity(&'static str),

    #[error(transparent)]
    Store(#[from] DocumentStoreError),

    #[error("response {id} was stored but its attention checks are malformed: {source}")]
    AttentionChecks {
        id: String,
        #[source]
        source: AttentionCheckError,
    },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompletionOutcome {
    pub id: String,
    pub collection: String,
    pub passed: bool,
    pub completion: CompletionPair,
}

pub struct ResponseRecorder<'a> {
    documents: &'a dyn DocumentStore,
    collections: &'a CollectionResolver,
    completion: &'a CompletionPolicy,
}

impl<'a> ResponseRecorder<'a> {
    pub fn new(
        documents: &'a dyn DocumentStore,
        collections: &'a CollectionResolver,
        completion: &'a CompletionPolicy,
    ) -> Self {
        Self {
            documents,
            collections,
            completion,
        }
    }

    /// Stores `response` verbatim, then scores it. A response with malformed
    /// attention checks stays stored and is reported as an error.
    pub async fn record(&self, response: Value) -> Result<CompletionOutcome, SubmitError> {
        let identity = identity_of(&response)?;
        let collection = self
            .collections
            .resolve(&identity, RecordKind::Response)
            .to_string();

        // The insert takes ownership of the document.
        let scored = attention::passed_attention_check(&response);
        let id = self.documents.insert(collection.clone(), response).await?;
        info!("Recorded response {id} in {collection}");

        let passed = scored.map_err(|source| SubmitError::AttentionChecks {
            id: id.clone(),
            source,
        })?;

        Ok(CompletionOutcome {
            id,
            collection,
            passed,
            completion: self.completion.select(passed).clone(),
        })
    }
}

/// Reads the Prolific triple nested under `prolific`, or the `participantID`
/// sent by participants who entered through `/validate/{participant_id}`.
pub fn identity_of(response: &Value) -> Result<SessionIdentity, SubmitError> {
    let Some(document) = response.as_object() else {
        return Err(SubmitError::NotAnObject);
    };

    let Some(prolific) = document.get("prolific") else {
        return legacy_identity(document);
    };

    let field = |name: &'static str| match prolific.get(name) {
        Some(Value::String(value)) => Ok(value.clone()),
        Some(_) => Err(SubmitError::InvalidIdentity(name)),
        None => Err(SubmitError::MissingIdentity(name)),
    };

    Ok(SessionIdentity::Prolific(ProlificIdentity {
        prolific_pid: field("PROLIFIC_PID")?,
        study_id: field("STUDY_ID")?,
        session_id: field("SESSION_ID")?,
    }))
}

fn legacy_identity(document: &Map<String, Value>) -> Result<SessionIdentity, SubmitError> {
    let participant_id = document
        .get(LEGACY_PARTICIPANT_FIELD)
        .and_then(Value::as_str)
        .filter(|id| !id.trim().is_empty())
        .ok_or(SubmitError::NoIdentity)?;

    let timestamp = match document.get(LEGACY_TIMESTAMP_FIELD).and_then(Value::as_str) {
        Some(timestamp) => timestamp.to_string(),
        None => Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true),
    };

    Ok(SessionIdentity::Legacy {
        participant_id: participant_id.trim().to_string(),
        timestamp,
    })
}
