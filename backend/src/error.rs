//! Errors surfacing at the edges of the service: at startup and at the
//! handler boundary of `/validate/`.

use crate::config::ConfigError;
use crate::storage::{DocumentStoreError, StoreError};
use crate::study::allow_list::AllowListError;
use crate::study::assignment::AssignmentPolicyError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum StartupError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Assignment(#[from] AssignmentPolicyError),

    #[error(transparent)]
    AllowList(#[from] AllowListError),
}

/// Why a `/validate/` call was answered with `valid: false`.
#[derive(Debug, Error)]
pub enum ValidateError {
    #[error("participant {0} is not on the allow-list")]
    UnknownParticipant(String),

    #[error("feed data unavailable: {0}")]
    Feeds(#[from] StoreError),

    #[error("session start not recorded: {0}")]
    SessionNotRecorded(#[source] DocumentStoreError),
}

impl ValidateError {
    /// Message shown to the participant; internal details stay in the logs.
    pub fn public_message(&self) -> &'static str {
        match self {
            ValidateError::UnknownParticipant(_) => "Participant not found",
            ValidateError::Feeds(_) => "Unable to load the study feeds. Please try again later.",
            ValidateError::SessionNotRecorded(_) => {
                "Unable to start your session. Please try again later."
            }
        }
    }
}
