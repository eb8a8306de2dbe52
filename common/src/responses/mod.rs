use crate::model::assignment::OptionOrder;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;

/// Everything the client needs to render the assigned feeds.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeedPayload {
    pub feeds: Vec<String>,
    /// Signed screenshot URLs, in the same order as `feeds`.
    #[serde(rename = "feedURLs")]
    pub feed_urls: Vec<String>,
    /// Feed id to the article bounds of the assigned variant.
    #[serde(rename = "feedData")]
    pub feed_data: BTreeMap<String, Vec<Value>>,
    /// Feed id to post id to signed post image URL.
    #[serde(rename = "postURLs")]
    pub post_urls: BTreeMap<String, BTreeMap<String, String>>,
    #[serde(rename = "optionsRandomized")]
    pub options_randomized: OptionOrder,
}

/// Body returned by `/validate/`.
///
/// Rejections carry only `valid` and `message`, never feed data.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ValidateResponse {
    pub valid: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(flatten, skip_serializing_if = "Option::is_none")]
    pub payload: Option<FeedPayload>,
}

impl ValidateResponse {
    pub fn accepted(payload: FeedPayload) -> Self {
        Self {
            valid: true,
            message: None,
            payload: Some(payload),
        }
    }

    pub fn rejected(message: impl Into<String>) -> Self {
        Self {
            valid: false,
            message: Some(message.into()),
            payload: None,
        }
    }
}

/// Body returned by `/submit/`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "lowercase")]
pub enum SubmitResponse {
    Success {
        #[serde(rename = "completionCode")]
        completion_code: String,
        #[serde(rename = "completionURL")]
        completion_url: String,
    },
    Error {
        message: String,
    },
}
