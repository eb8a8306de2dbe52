//! Environment driven configuration.
//!
//! Every setting has a default so a bare `cargo run` starts a local instance;
//! fallbacks are logged so a misconfigured deployment shows up in the logs.

use crate::study::assignment::FeedSelection;
use crate::study::collections::Collections;
use crate::study::responses::{CompletionPair, CompletionPolicy};
use log::{info, warn};
use std::{env, fmt::Display, path::PathBuf, str::FromStr, time::Duration};
use thiserror::Error;

/// Feeds used by the study when `FEED_POOL` is not set.
pub const DEFAULT_FEED_POOL: [&str; 3] = [
    "5e95e7a5-6f6e-47a1-8677-8707e1b63e02",
    "ebb00a74-0230-4380-ba31-d4c2593f212a",
    "3992c1e1-17e6-4991-85fa-f9da14f30568",
];

const DEFAULT_COMPLETION_CODE: &str = "XXXXXX";
const DEFAULT_COMPLETION_URL: &str = "https://www.google.com/";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid value for {key}: {message}")]
    Invalid { key: &'static str, message: String },
}

#[derive(Debug, Clone)]
pub struct Config {
    pub host: String,
    pub port: u16,
    pub bucket: String,
    pub object_store_root: PathBuf,
    pub object_store_public_url: String,
    pub url_signing_secret: String,
    pub signed_url_expiry: Duration,
    pub database_path: PathBuf,
    pub production: Collections,
    pub test: Collections,
    pub completion: CompletionPolicy,
    pub feed_pool: Vec<String>,
    pub feed_selection: FeedSelection,
    pub participants_csv: Option<PathBuf>,
}

impl Config {
    pub fn load() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Builds the configuration from an arbitrary key lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let feed_pool: Vec<String> = match lookup("FEED_POOL") {
            Some(raw) => raw
                .split(',')
                .map(str::trim)
                .filter(|feed| !feed.is_empty())
                .map(str::to_string)
                .collect(),
            None => {
                info!("FEED_POOL not set, using the {} default feeds", DEFAULT_FEED_POOL.len());
                DEFAULT_FEED_POOL.iter().map(|f| f.to_string()).collect()
            }
        };

        let feed_selection = match lookup("FEED_SELECTION") {
            Some(raw) => parse("FEED_SELECTION", &raw)?,
            None if feed_pool.len() > 3 => FeedSelection::RandomSample,
            None => FeedSelection::Fixed,
        };

        let url_signing_secret = or_default(&lookup, "URL_SIGNING_SECRET", "");
        if url_signing_secret.is_empty() {
            warn!("URL_SIGNING_SECRET is empty, signed URLs can be forged");
        }

        Ok(Self {
            host: or_default(&lookup, "HOST", "127.0.0.1"),
            port: try_load(&lookup, "PORT", "8080")?,
            bucket: or_default(&lookup, "S3_BUCKET", "trending-feeds"),
            object_store_root: or_default(&lookup, "OBJECT_STORE_ROOT", "./objects").into(),
            object_store_public_url: or_default(
                &lookup,
                "OBJECT_STORE_PUBLIC_URL",
                "http://127.0.0.1:9000",
            ),
            url_signing_secret,
            signed_url_expiry: Duration::from_secs(try_load(
                &lookup,
                "SIGNED_URL_EXPIRY_SECS",
                "3600",
            )?),
            database_path: or_default(&lookup, "DATABASE_PATH", "trending-feeds.sqlite").into(),
            production: Collections {
                session_starts: or_default(&lookup, "SESSION_STARTS_COLLECTION", "session-starts"),
                responses: or_default(&lookup, "RESPONSES_COLLECTION", "responses"),
            },
            test: Collections {
                session_starts: or_default(
                    &lookup,
                    "TEST_SESSION_STARTS_COLLECTION",
                    "test-session-starts",
                ),
                responses: or_default(&lookup, "TEST_RESPONSES_COLLECTION", "test-responses"),
            },
            completion: CompletionPolicy {
                success: CompletionPair {
                    code: or_default(&lookup, "COMPLETION_CODE", DEFAULT_COMPLETION_CODE),
                    url: or_default(&lookup, "COMPLETION_URL", DEFAULT_COMPLETION_URL),
                },
                failure: CompletionPair {
                    code: or_default(&lookup, "FAILED_COMPLETION_CODE", DEFAULT_COMPLETION_CODE),
                    url: or_default(&lookup, "FAILED_COMPLETION_URL", DEFAULT_COMPLETION_URL),
                },
            },
            feed_pool,
            feed_selection,
            participants_csv: lookup("PARTICIPANTS_CSV").map(PathBuf::from),
        })
    }
}

fn or_default<F>(lookup: &F, key: &str, default: &str) -> String
where
    F: Fn(&str) -> Option<String>,
{
    lookup(key).unwrap_or_else(|| {
        info!("{key} not set, using default: {default}");
        default.to_string()
    })
}

fn try_load<F, T>(lookup: &F, key: &'static str, default: &str) -> Result<T, ConfigError>
where
    F: Fn(&str) -> Option<String>,
    T: FromStr,
    T::Err: Display,
{
    parse(key, &or_default(lookup, key, default))
}

fn parse<T>(key: &'static str, raw: &str) -> Result<T, ConfigError>
where
    T: FromStr,
    T::Err: Display,
{
    raw.trim().parse().map_err(|e: T::Err| {
        warn!("Invalid {key} value: {e}");
        ConfigError::Invalid {
            key,
            message: e.to_string(),
        }
    })
}
