//! CSV allow-list of participant ids for the `/validate/{participant_id}`
//! entry point.
//!
//! The file needs a header row. The ids are read from the `participant_id`
//! column, or from the only column when there is just one.

use csv::{ReaderBuilder, Trim};
use std::collections::HashSet;
use std::io::Read;
use std::path::Path;
use thiserror::Error;

const PARTICIPANT_COLUMN: &str = "participant_id";

#[derive(Debug, Error)]
pub enum AllowListError {
    #[error("participants file could not be read: {0}")]
    Csv(#[from] csv::Error),

    #[error("participants file has no `participant_id` column")]
    MissingColumn,
}

#[derive(Debug, Clone, Default)]
pub struct AllowList {
    participants: HashSet<String>,
}

impl AllowList {
    pub fn from_path(path: &Path) -> Result<Self, AllowListError> {
        let reader = ReaderBuilder::new().trim(Trim::All).from_path(path)?;
        Self::collect(reader)
    }

    pub fn from_reader<R: Read>(source: R) -> Result<Self, AllowListError> {
        let reader = ReaderBuilder::new().trim(Trim::All).from_reader(source);
        Self::collect(reader)
    }

    fn collect<R: Read>(mut reader: csv::Reader<R>) -> Result<Self, AllowListError> {
        let headers = reader.headers()?.clone();
        let column = match headers.iter().position(|h| h == PARTICIPANT_COLUMN) {
            Some(index) => index,
            None if headers.len() == 1 => 0,
            None => return Err(AllowListError::MissingColumn),
        };

        let mut participants = HashSet::new();
        for record in reader.records() {
            let record = record?;
            if let Some(id) = record.get(column).filter(|id| !id.is_empty()) {
                participants.insert(id.to_string());
            }
        }

        Ok(Self { participants })
    }

    pub fn contains(&self, participant_id: &str) -> bool {
        self.participants.contains(participant_id.trim())
    }

    pub fn len(&self) -> usize {
        self.participants.len()
    }

    pub fn is_empty(&self) -> bool {
        self.participants.is_empty()
    }
}
