use crate::model::assignment::Assignment;
use serde::{Deserialize, Serialize};

/// Value used in all three Prolific fields by study staff when trying the
/// study out.
pub const TEST_SENTINEL: &str = "test";

/// Identifiers passed along by Prolific in the study URL.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProlificIdentity {
    #[serde(rename = "PROLIFIC_PID")]
    pub prolific_pid: String,
    #[serde(rename = "STUDY_ID")]
    pub study_id: String,
    #[serde(rename = "SESSION_ID")]
    pub session_id: String,
}

impl ProlificIdentity {
    /// True only for the exact `("test", "test", "test")` triple.
    pub fn is_test_sentinel(&self) -> bool {
        self.prolific_pid == TEST_SENTINEL
            && self.study_id == TEST_SENTINEL
            && self.session_id == TEST_SENTINEL
    }
}

/// Who a session belongs to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum SessionIdentity {
    Prolific(ProlificIdentity),
    /// Participant id typed in by hand, stamped with the server time.
    Legacy {
        participant_id: String,
        timestamp: String,
    },
}

impl SessionIdentity {
    pub fn is_test_sentinel(&self) -> bool {
        match self {
            SessionIdentity::Prolific(prolific) => prolific.is_test_sentinel(),
            SessionIdentity::Legacy { .. } => false,
        }
    }
}

/// Append-only provenance record written before any feed data is disclosed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionStart {
    pub identity: SessionIdentity,
    /// Timestamp reported by the client, if any.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<String>,
    pub assignment: Assignment,
    /// Collection the record was written to.
    pub collection: String,
    /// Server time (RFC 3339) at which the record was built.
    pub recorded_at: String,
}
