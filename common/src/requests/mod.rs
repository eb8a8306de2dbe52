use crate::model::session::{ProlificIdentity, SessionIdentity};
use serde::Deserialize;

/// Body (or query string) of `/validate/`.
#[derive(Debug, Clone, Deserialize)]
pub struct ValidateRequest {
    #[serde(rename = "PROLIFIC_PID")]
    pub prolific_pid: String,
    #[serde(rename = "STUDY_ID")]
    pub study_id: String,
    #[serde(rename = "SESSION_ID")]
    pub session_id: String,
    #[serde(default)]
    pub timestamp: Option<String>,
}

impl ValidateRequest {
    /// Splits the request into the session identity and the client timestamp.
    pub fn into_parts(self) -> (SessionIdentity, Option<String>) {
        let identity = SessionIdentity::Prolific(ProlificIdentity {
            prolific_pid: self.prolific_pid,
            study_id: self.study_id,
            session_id: self.session_id,
        });
        (identity, self.timestamp)
    }
}
