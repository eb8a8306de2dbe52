use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;

/// Number of pre-rendered rotations stored for every feed (`"0"`..`"9"`).
pub const ROTATION_COUNT: u8 = 10;

/// One presentation of a rotation: the screenshot, the posts it shows and
/// their layout.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeedVariant {
    /// Name (without `.jpg`) of the rendered screenshot inside the feed folder.
    #[serde(rename = "feedUUID")]
    pub feed_uuid: String,
    pub posts: Vec<String>,
    /// Position of every post inside the screenshot, as written by the
    /// renderer. Handed to the client untouched.
    #[serde(rename = "articleBounds")]
    pub article_bounds: Vec<Value>,
}

/// The two counterbalanced presentations of one rotation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Rotation {
    pub proof: FeedVariant,
    #[serde(rename = "noProof")]
    pub no_proof: FeedVariant,
}

impl Rotation {
    pub fn variant(&self, show_proof: bool) -> &FeedVariant {
        if show_proof {
            &self.proof
        } else {
            &self.no_proof
        }
    }
}

/// Contents of `public/{feed}/meta.json` in the feeds bucket.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeedMeta {
    /// Rotations keyed by their index rendered as a string.
    pub feeds: BTreeMap<String, Rotation>,
}

impl FeedMeta {
    pub fn rotation(&self, index: u8) -> Option<&Rotation> {
        self.feeds.get(&index.to_string())
    }
}
