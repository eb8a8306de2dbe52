//! # Document Store
//!
//! Append-only storage for session starts and participant responses.
//!
//! `SqliteDocumentStore` keeps one table per collection, each row holding a
//! generated id, the JSON document verbatim and the insertion time. A
//! connection is opened for every insert on a blocking thread and dropped when
//! the insert finishes, whatever the outcome. Nothing is deduplicated: two
//! identical documents become two rows.

use async_trait::async_trait;
use chrono::Utc;
use regex::Regex;
use rusqlite::{params, Connection};
use serde_json::Value;
use std::path::{Path, PathBuf};
use std::sync::LazyLock;
use thiserror::Error;
use uuid::Uuid;

static COLLECTION_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[A-Za-z0-9_-]{1,64}$").expect("collection pattern is valid")
});

#[derive(Debug, Error)]
pub enum DocumentStoreError {
    #[error("invalid collection name: {0:?}")]
    InvalidCollection(String),

    #[error("database error: {0}")]
    Database(#[from] rusqlite::Error),

    #[error("document could not be encoded: {0}")]
    Encode(#[from] serde_json::Error),

    #[error("database task failed: {0}")]
    Join(#[from] tokio::task::JoinError),
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait DocumentStore: Send + Sync {
    /// Appends `document` to `collection` and returns the generated id.
    async fn insert(&self, collection: String, document: Value)
        -> Result<String, DocumentStoreError>;
}

pub struct SqliteDocumentStore {
    path: PathBuf,
}

impl SqliteDocumentStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// All documents of `collection` in insertion order.
    #[cfg(test)]
    pub fn documents(&self, collection: &str) -> Result<Vec<Value>, DocumentStoreError> {
        check_collection(collection)?;
        let conn = Connection::open(&self.path)?;
        let mut stmt =
            conn.prepare(&format!("SELECT document FROM \"{collection}\" ORDER BY rowid"))?;
        let rows = stmt.query_map([], |row| row.get::<_, String>(0))?;

        let mut documents = Vec::new();
        for row in rows {
            documents.push(serde_json::from_str(&row?)?);
        }
        Ok(documents)
    }
}

#[async_trait]
impl DocumentStore for SqliteDocumentStore {
    async fn insert(
        &self,
        collection: String,
        document: Value,
    ) -> Result<String, DocumentStoreError> {
        check_collection(&collection)?;
        let body = serde_json::to_string(&document)?;
        let path = self.path.clone();

        tokio::task::spawn_blocking(move || insert_blocking(&path, &collection, &body)).await?
    }
}

fn insert_blocking(path: &Path, collection: &str, body: &str) -> Result<String, DocumentStoreError> {
    let conn = Connection::open(path)?;
    // Collection names are validated, so quoting them is enough.
    conn.execute_batch(&format!(
        "CREATE TABLE IF NOT EXISTS \"{collection}\" (
            id TEXT PRIMARY KEY,
            document TEXT NOT NULL,
            inserted_at TEXT NOT NULL
        )"
    ))?;

    let id = Uuid::new_v4().to_string();
    conn.execute(
        &format!("INSERT INTO \"{collection}\" (id, document, inserted_at) VALUES (?1, ?2, ?3)"),
        params![id, body, Utc::now().to_rfc3339()],
    )?;

    Ok(id)
}

fn check_collection(collection: &str) -> Result<(), DocumentStoreError> {
    if COLLECTION_RE.is_match(collection) {
        Ok(())
    } else {
        Err(DocumentStoreError::InvalidCollection(collection.to_string()))
    }
}
