//! Turns an assignment into the feed data handed to the client.
//!
//! Bucket layout for every feed:
//!
//! - `public/{feed}/meta.json`: rotations and their proof / noProof variants
//! - `public/{feed}/{variant.feedUUID}.jpg`: rendered feed screenshot
//! - `public/{feed}/{post}.jpg`: single post image

use crate::storage::{ObjectStore, StoreError};
use feeds_common::model::assignment::{Assignment, OptionOrder};
use feeds_common::model::feed::{FeedMeta, FeedVariant};
use feeds_common::responses::FeedPayload;
use futures_util::future::try_join_all;
use std::collections::BTreeMap;

pub fn meta_key(feed: &str) -> String {
    format!("public/{feed}/meta.json")
}

pub fn feed_image_key(feed: &str, variant: &FeedVariant) -> String {
    format!("public/{feed}/{}.jpg", variant.feed_uuid)
}

pub fn post_image_key(feed: &str, post: &str) -> String {
    format!("public/{feed}/{post}.jpg")
}

/// A feed of the assignment with the variant the participant will see.
#[derive(Debug, Clone, PartialEq)]
pub struct AssignedFeed {
    pub feed: String,
    pub rotation: u8,
    pub variant: FeedVariant,
}

pub struct FeedCatalog<'a> {
    store: &'a dyn ObjectStore,
}

impl<'a> FeedCatalog<'a> {
    pub fn new(store: &'a dyn ObjectStore) -> Self {
        Self { store }
    }

    pub async fn load_meta(&self, feed: &str) -> Result<FeedMeta, StoreError> {
        let key = meta_key(feed);
        let raw = self.store.fetch_json(&key).await?;
        serde_json::from_value(raw).map_err(|source| StoreError::Json { key, source })
    }

    /// Loads the metadata of every assigned feed; any failure fails the whole
    /// assignment.
    pub async fn resolve(&self, assignment: &Assignment) -> Result<Vec<AssignedFeed>, StoreError> {
        let metas = try_join_all(assignment.feeds.iter().map(|f| self.load_meta(&f.feed))).await?;

        assignment
            .feeds
            .iter()
            .zip(metas)
            .map(|(assigned, meta)| -> Result<AssignedFeed, StoreError> {
                let rotation = meta.rotation(assigned.rotation).ok_or_else(|| {
                    StoreError::MissingRotation {
                        feed: assigned.feed.clone(),
                        rotation: assigned.rotation,
                    }
                })?;

                Ok(AssignedFeed {
                    feed: assigned.feed.clone(),
                    rotation: assigned.rotation,
                    variant: rotation.variant(assignment.show_proof).clone(),
                })
            })
            .collect()
    }

    /// Signs every screenshot and post image of the resolved feeds.
    pub async fn payload(
        &self,
        resolved: &[AssignedFeed],
        options: &OptionOrder,
    ) -> Result<FeedPayload, StoreError> {
        let mut feed_urls = Vec::with_capacity(resolved.len());
        let mut feed_data = BTreeMap::new();
        let mut post_urls = BTreeMap::new();

        for assigned in resolved {
            let feed = &assigned.feed;
            feed_urls.push(
                self.store
                    .signed_url(&feed_image_key(feed, &assigned.variant))
                    .await?,
            );
            feed_data.insert(feed.clone(), assigned.variant.article_bounds.clone());

            let mut posts = BTreeMap::new();
            for post in &assigned.variant.posts {
                let url = self.store.signed_url(&post_image_key(feed, post)).await?;
                posts.insert(post.clone(), url);
            }
            post_urls.insert(feed.clone(), posts);
        }

        Ok(FeedPayload {
            feeds: resolved.iter().map(|a| a.feed.clone()).collect(),
            feed_urls,
            feed_data,
            post_urls,
            options_randomized: options.clone(),
        })
    }
}
