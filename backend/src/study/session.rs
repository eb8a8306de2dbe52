//! # Session Recorder
//!
//! Writes the session-start record for an assignment. Feed data must never be
//! returned to a client unless this write succeeded, so the provenance of
//! every disclosed assignment is on record even when the participant drops out.

use crate::storage::{DocumentStore, DocumentStoreError};
use crate::study::collections::{CollectionResolver, RecordKind};
use chrono::{SecondsFormat, Utc};
use feeds_common::model::assignment::Assignment;
use feeds_common::model::session::{SessionIdentity, SessionStart};
use log::info;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordedSession {
    pub id: String,
    pub collection: String,
}

pub struct SessionRecorder<'a> {
    documents: &'a dyn DocumentStore,
    collections: &'a CollectionResolver,
}

impl<'a> SessionRecorder<'a> {
    pub fn new(documents: &'a dyn DocumentStore, collections: &'a CollectionResolver) -> Self {
        Self {
            documents,
            collections,
        }
    }

    /// Appends exactly one session-start record.
    pub async fn record(
        &self,
        identity: &SessionIdentity,
        timestamp: Option<String>,
        assignment: &Assignment,
    ) -> Result<RecordedSession, DocumentStoreError> {
        let collection = self
            .collections
            .resolve(identity, RecordKind::SessionStart)
            .to_string();

        let record = SessionStart {
            identity: identity.clone(),
            timestamp,
            assignment: assignment.clone(),
            collection: collection.clone(),
            recorded_at: Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true),
        };

        let id = self
            .documents
            .insert(collection.clone(), serde_json::to_value(&record)?)
            .await?;
        info!("Recorded session start {id} in {collection}");

        Ok(RecordedSession { id, collection })
    }
}
