//! # Object Store Gateway
//!
//! Screenshots, post images and feed metadata live in a bucket laid out as
//! `public/{feed}/...`. The service never streams images itself: it hands out
//! time-limited signed URLs and only reads the small `meta.json` documents.
//!
//! `FsObjectStore` keeps the bucket on the local filesystem
//! (`{root}/{bucket}/{key}`) and signs URLs for the static server publishing
//! that directory. A URL looks like
//!
//! ```text
//! {public_base}/{bucket}/{key}?Expires={unix}&Signature={b64url(hmac_sha256)}
//! ```
//!
//! where the MAC covers `bucket \n key \n expires`. `verify_signature` is the
//! matching check for whatever serves the files.

use async_trait::async_trait;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine;
use chrono::Utc;
use hmac::{Hmac, Mac};
use regex::Regex;
use serde_json::Value;
use sha2::Sha256;
use std::path::PathBuf;
use std::sync::LazyLock;
use std::time::Duration;
use thiserror::Error;

type HmacSha256 = Hmac<Sha256>;

static KEY_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[A-Za-z0-9._-]+(/[A-Za-z0-9._-]+)*$").expect("object key pattern is valid")
});

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("invalid object key: {0}")]
    InvalidKey(String),

    #[error("object {key} could not be read: {source}")]
    Io {
        key: String,
        #[source]
        source: std::io::Error,
    },

    #[error("object {key} is not valid JSON: {source}")]
    Json {
        key: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("feed {feed} has no rotation {rotation}")]
    MissingRotation { feed: String, rotation: u8 },

    #[error("URL signing key rejected: {0}")]
    Signing(String),
}

/// Read access to the feeds bucket.
#[async_trait]
pub trait ObjectStore: Send + Sync {
    /// Time-limited download URL for `key`.
    async fn signed_url(&self, key: &str) -> Result<String, StoreError>;

    /// Fetches `key` and parses it as JSON.
    async fn fetch_json(&self, key: &str) -> Result<Value, StoreError>;
}

pub struct FsObjectStore {
    root: PathBuf,
    bucket: String,
    public_base_url: String,
    secret: String,
    expiry: Duration,
}

impl FsObjectStore {
    pub fn new(
        root: impl Into<PathBuf>,
        bucket: impl Into<String>,
        public_base_url: &str,
        secret: impl Into<String>,
        expiry: Duration,
    ) -> Self {
        Self {
            root: root.into(),
            bucket: bucket.into(),
            public_base_url: public_base_url.trim_end_matches('/').to_string(),
            secret: secret.into(),
            expiry,
        }
    }

    /// Signs `key` as if the current time were `now` (unix seconds).
    pub fn sign_at(&self, key: &str, now: i64) -> Result<String, StoreError> {
        check_key(key)?;
        let expires = now + self.expiry.as_secs() as i64;
        let signature = URL_SAFE_NO_PAD.encode(self.mac(key, expires)?.finalize().into_bytes());

        Ok(format!(
            "{}/{}/{}?Expires={}&Signature={}",
            self.public_base_url, self.bucket, key, expires, signature
        ))
    }

    /// Checks a signature produced by [`FsObjectStore::sign_at`].
    pub fn verify_signature(&self, key: &str, expires: i64, signature: &str, now: i64) -> bool {
        if now > expires {
            return false;
        }
        let Ok(raw) = URL_SAFE_NO_PAD.decode(signature) else {
            return false;
        };
        match self.mac(key, expires) {
            Ok(mac) => mac.verify_slice(&raw).is_ok(),
            Err(_) => false,
        }
    }

    fn mac(&self, key: &str, expires: i64) -> Result<HmacSha256, StoreError> {
        let mut mac = HmacSha256::new_from_slice(self.secret.as_bytes())
            .map_err(|e| StoreError::Signing(e.to_string()))?;
        mac.update(self.bucket.as_bytes());
        mac.update(b"\n");
        mac.update(key.as_bytes());
        mac.update(b"\n");
        mac.update(expires.to_string().as_bytes());
        Ok(mac)
    }

    fn object_path(&self, key: &str) -> Result<PathBuf, StoreError> {
        check_key(key)?;
        Ok(self.root.join(&self.bucket).join(key))
    }
}

#[async_trait]
impl ObjectStore for FsObjectStore {
    async fn signed_url(&self, key: &str) -> Result<String, StoreError> {
        self.sign_at(key, Utc::now().timestamp())
    }

    async fn fetch_json(&self, key: &str) -> Result<Value, StoreError> {
        let path = self.object_path(key)?;
        let bytes = tokio::fs::read(&path).await.map_err(|source| StoreError::Io {
            key: key.to_string(),
            source,
        })?;

        serde_json::from_slice(&bytes).map_err(|source| StoreError::Json {
            key: key.to_string(),
            source,
        })
    }
}

/// Keys are relative, slash separated and free of `.`/`..` segments.
fn check_key(key: &str) -> Result<(), StoreError> {
    let traverses = key.split('/').any(|segment| segment == "." || segment == "..");
    if traverses || !KEY_RE.is_match(key) {
        return Err(StoreError::InvalidKey(key.to_string()));
    }
    Ok(())
}
