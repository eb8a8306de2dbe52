//! Fixtures shared by the unit tests.

use crate::state::AppState;
use crate::storage::{DocumentStore, FsObjectStore, ObjectStore};
use crate::study::assignment::{AssignmentPolicy, FeedSelection};
use crate::study::collections::{CollectionResolver, Collections};
use crate::study::responses::{CompletionPair, CompletionPolicy};
use feeds_common::model::assignment::{Assignment, FeedAssignment, OptionOrder};
use feeds_common::model::feed::{FeedMeta, FeedVariant, Rotation, ROTATION_COUNT};
use feeds_common::model::session::{ProlificIdentity, SessionIdentity};
use serde_json::{json, Value};
use std::collections::BTreeMap;
use std::fs;
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

pub const BUCKET: &str = "trending-feeds";
pub const FEEDS: [&str; 4] = ["feed-a", "feed-b", "feed-c", "feed-d"];

pub fn variant(feed: &str, rotation: u8, show_proof: bool) -> FeedVariant {
    let kind = if show_proof { "proof" } else { "noProof" };
    let posts: Vec<String> = (0..3)
        .map(|i| format!("{feed}-{kind}-{rotation}-post{i}"))
        .collect();
    let article_bounds = posts
        .iter()
        .enumerate()
        .map(|(i, uuid)| {
            json!({ "uuid": uuid, "x": 0.0, "y": 120.0 * i as f64, "width": 640.0, "height": 110.0 })
        })
        .collect();

    FeedVariant {
        feed_uuid: format!("{kind}-{rotation}"),
        posts,
        article_bounds,
    }
}

pub fn feed_meta(feed: &str) -> FeedMeta {
    let feeds: BTreeMap<String, Rotation> = (0..ROTATION_COUNT)
        .map(|rotation| {
            (
                rotation.to_string(),
                Rotation {
                    proof: variant(feed, rotation, true),
                    no_proof: variant(feed, rotation, false),
                },
            )
        })
        .collect();
    FeedMeta { feeds }
}

/// Writes `meta.json` for every feed under `{root}/{BUCKET}/public/{feed}`.
pub fn write_bucket(root: &Path, feeds: &[&str]) {
    for feed in feeds {
        let folder = root.join(BUCKET).join("public").join(feed);
        fs::create_dir_all(&folder).unwrap();
        fs::write(
            folder.join("meta.json"),
            serde_json::to_vec(&feed_meta(feed)).unwrap(),
        )
        .unwrap();
    }
}

pub fn object_store(root: &Path) -> FsObjectStore {
    FsObjectStore::new(
        root,
        BUCKET,
        "https://cdn.example.org",
        "test-secret",
        Duration::from_secs(3600),
    )
}

pub fn option_order() -> OptionOrder {
    OptionOrder {
        likert: vec!["relevance".into(), "content_quality".into(), "trustworthiness".into()],
        selection_multiple_choice: vec!["title".into(), "image".into()],
        selected_multiple_choice: vec!["popular".into()],
        non_selected_multiple_choice: vec!["offensive".into()],
    }
}

pub fn assignment() -> Assignment {
    Assignment {
        feeds: ["feed-a", "feed-b", "feed-c"]
            .iter()
            .zip([2u8, 5, 9])
            .map(|(feed, rotation)| FeedAssignment {
                feed: feed.to_string(),
                rotation,
            })
            .collect(),
        show_proof: true,
        options: option_order(),
    }
}

pub fn collection_resolver() -> CollectionResolver {
    CollectionResolver::new(
        Collections {
            session_starts: "session-starts".into(),
            responses: "responses".into(),
        },
        Collections {
            session_starts: "test-session-starts".into(),
            responses: "test-responses".into(),
        },
    )
}

pub fn completion_policy() -> CompletionPolicy {
    CompletionPolicy {
        success: CompletionPair {
            code: "XXXXXX".into(),
            url: "https://www.google.com/".into(),
        },
        failure: CompletionPair {
            code: "FAILED".into(),
            url: "https://www.google.com/failed".into(),
        },
    }
}

pub fn prolific(pid: &str) -> SessionIdentity {
    SessionIdentity::Prolific(ProlificIdentity {
        prolific_pid: pid.into(),
        study_id: "study-1".into(),
        session_id: "session-1".into(),
    })
}

/// The `("test", "test", "test")` identity staff use to try the study out.
pub fn sentinel() -> SessionIdentity {
    SessionIdentity::Prolific(ProlificIdentity {
        prolific_pid: "test".into(),
        study_id: "test".into(),
        session_id: "test".into(),
    })
}

/// A submitted response whose feed ratings are all correct.
pub fn response(pid: &str, study: &str, session: &str, pre: i64, post: i64) -> Value {
    json!({
        "prolific": { "PROLIFIC_PID": pid, "STUDY_ID": study, "SESSION_ID": session },
        "attentionChecks": { "pre": pre, "feed": { "feed-a": 2, "feed-b": 2 }, "post": post },
        "answers": { "feed-a": { "selectedPosts": ["p1"] } }
    })
}

/// Application state over the given collaborators, drawing from `FEEDS`.
pub fn app_state(objects: Arc<dyn ObjectStore>, documents: Arc<dyn DocumentStore>) -> AppState {
    AppState {
        objects,
        documents,
        assignment: Arc::new(
            AssignmentPolicy::new(
                FEEDS.iter().map(|f| f.to_string()).collect(),
                FeedSelection::RandomSample,
            )
            .unwrap(),
        ),
        collections: collection_resolver(),
        completion: completion_policy(),
        allow_list: None,
    }
}
