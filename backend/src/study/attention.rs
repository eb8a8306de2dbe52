//! # Response Validator
//!
//! Scores the embedded attention checks of a submitted response:
//!
//! - `attentionChecks.pre` must be `4`
//! - every value of `attentionChecks.feed` must be `2`
//! - `attentionChecks.post` must be `1`
//!
//! One failure is recorded per category, however many feed ratings were wrong.
//! A submission passes unless two or more categories failed.

use serde_json::{Map, Value};
use thiserror::Error;

pub const EXPECTED_PRE: i64 = 4;
pub const EXPECTED_FEED: i64 = 2;
pub const EXPECTED_POST: i64 = 1;

/// Failed categories a participant may have and still pass.
pub const TOLERATED_FAILURES: usize = 1;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CheckCategory {
    Pre,
    Feed,
    Post,
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum AttentionCheckError {
    #[error("response has no attentionChecks object")]
    MissingChecks,

    #[error("attentionChecks.{0} is missing")]
    MissingField(&'static str),

    #[error("attentionChecks.feed must be an object")]
    FeedNotAnObject,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AttentionReport {
    pub failures: Vec<CheckCategory>,
}

impl AttentionReport {
    pub fn passed(&self) -> bool {
        self.failures.len() <= TOLERATED_FAILURES
    }
}

pub fn evaluate(response: &Value) -> Result<AttentionReport, AttentionCheckError> {
    let checks = response
        .get("attentionChecks")
        .and_then(Value::as_object)
        .ok_or(AttentionCheckError::MissingChecks)?;

    let pre = field(checks, "pre")?;
    let feed = field(checks, "feed")?
        .as_object()
        .ok_or(AttentionCheckError::FeedNotAnObject)?;
    let post = field(checks, "post")?;

    let mut failures = Vec::new();
    if !equals(pre, EXPECTED_PRE) {
        failures.push(CheckCategory::Pre);
    }
    if !feed.values().all(|rating| equals(rating, EXPECTED_FEED)) {
        failures.push(CheckCategory::Feed);
    }
    if !equals(post, EXPECTED_POST) {
        failures.push(CheckCategory::Post);
    }

    Ok(AttentionReport { failures })
}

pub fn passed_attention_check(response: &Value) -> Result<bool, AttentionCheckError> {
    evaluate(response).map(|report| report.passed())
}

fn field<'a>(
    checks: &'a Map<String, Value>,
    name: &'static str,
) -> Result<&'a Value, AttentionCheckError> {
    checks.get(name).ok_or(AttentionCheckError::MissingField(name))
}

/// Numeric equality; `4.0` counts as `4`, `"4"` does not.
fn equals(value: &Value, expected: i64) -> bool {
    value.as_f64() == Some(expected as f64)
}
