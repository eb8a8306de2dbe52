//! Collaborators shared by every request.
//!
//! Built once in `main.rs` from the `Config` and handed to actix as
//! `web::Data<AppState>`. Handlers only borrow from it; nothing in here is
//! mutated after startup.

use crate::config::Config;
use crate::error::StartupError;
use crate::storage::{DocumentStore, FsObjectStore, ObjectStore, SqliteDocumentStore};
use crate::study::allow_list::AllowList;
use crate::study::assignment::AssignmentPolicy;
use crate::study::collections::CollectionResolver;
use crate::study::responses::CompletionPolicy;
use log::info;
use std::sync::Arc;

pub struct AppState {
    pub objects: Arc<dyn ObjectStore>,
    pub documents: Arc<dyn DocumentStore>,
    pub assignment: Arc<AssignmentPolicy>,
    pub collections: CollectionResolver,
    pub completion: CompletionPolicy,
    /// Only consulted by `/validate/{participant_id}`.
    pub allow_list: Option<Arc<AllowList>>,
}

impl AppState {
    pub fn from_config(config: &Config) -> Result<Self, StartupError> {
        let objects = FsObjectStore::new(
            &config.object_store_root,
            &config.bucket,
            &config.object_store_public_url,
            &config.url_signing_secret,
            config.signed_url_expiry,
        );
        let documents = SqliteDocumentStore::new(&config.database_path);
        let assignment = AssignmentPolicy::new(config.feed_pool.clone(), config.feed_selection)?;
        info!(
            "Assigning from {} feeds ({:?})",
            assignment.pool().len(),
            config.feed_selection
        );

        let allow_list = match &config.participants_csv {
            Some(path) => {
                let list = AllowList::from_path(path)?;
                info!("Loaded {} participants from {}", list.len(), path.display());
                Some(Arc::new(list))
            }
            None => None,
        };

        Ok(Self {
            objects: Arc::new(objects),
            documents: Arc::new(documents),
            assignment: Arc::new(assignment),
            collections: CollectionResolver::new(config.production.clone(), config.test.clone()),
            completion: config.completion.clone(),
            allow_list,
        })
    }
}
