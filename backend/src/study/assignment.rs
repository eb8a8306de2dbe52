//! # Assignment Engine
//!
//! Decides what a participant sees: three feeds, a rotation per feed, whether
//! the proof variant is shown and the order of every questionnaire option
//! list. Everything here is a pure function of the candidate pool and the
//! random source handed in, so a seeded `StdRng` reproduces an assignment.

use feeds_common::model::assignment::{Assignment, FeedAssignment, OptionOrder};
use feeds_common::model::feed::ROTATION_COUNT;
use rand::seq::{IndexedRandom, SliceRandom};
use rand::Rng;
use std::str::FromStr;
use thiserror::Error;

/// Feeds shown per session.
pub const FEEDS_PER_SESSION: usize = 3;

pub const LIKERT_DIMENSIONS: [&str; 3] = ["relevance", "content_quality", "trustworthiness"];

/// Attributes offered when asking why a post caught the participant's eye.
pub const SELECTION_ATTRIBUTES: [&str; 7] = [
    "position_in_feed",
    "title",
    "image",
    "subreddit",
    "upvotes",
    "comments",
    "topic",
];

pub const SELECTED_ATTRIBUTES: [&str; 7] = [
    "interesting_topic",
    "relevant_to_me",
    "trustworthy_source",
    "high_quality",
    "popular",
    "entertaining",
    "informative",
];

pub const NON_SELECTED_ATTRIBUTES: [&str; 7] = [
    "uninteresting_topic",
    "not_relevant",
    "untrustworthy_source",
    "low_quality",
    "unpopular",
    "offensive",
    "already_seen",
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FeedSelection {
    /// The first three feeds of the pool, in pool order.
    Fixed,
    /// Three feeds sampled without replacement, then shuffled.
    RandomSample,
}

impl FromStr for FeedSelection {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "fixed" => Ok(FeedSelection::Fixed),
            "random" => Ok(FeedSelection::RandomSample),
            other => Err(format!("expected `fixed` or `random`, got `{other}`")),
        }
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum AssignmentPolicyError {
    #[error("feed pool needs at least {min} distinct feeds, got {0}", min = FEEDS_PER_SESSION)]
    PoolTooSmall(usize),
}

/// Candidate pool and selection mode, validated once at startup.
#[derive(Debug, Clone)]
pub struct AssignmentPolicy {
    pool: Vec<String>,
    selection: FeedSelection,
}

impl AssignmentPolicy {
    /// Duplicate pool entries are dropped, keeping the first occurrence.
    pub fn new(pool: Vec<String>, selection: FeedSelection) -> Result<Self, AssignmentPolicyError> {
        let mut distinct: Vec<String> = Vec::with_capacity(pool.len());
        for feed in pool {
            if !distinct.contains(&feed) {
                distinct.push(feed);
            }
        }

        if distinct.len() < FEEDS_PER_SESSION {
            return Err(AssignmentPolicyError::PoolTooSmall(distinct.len()));
        }

        Ok(Self {
            pool: distinct,
            selection,
        })
    }

    pub fn pool(&self) -> &[String] {
        &self.pool
    }

    pub fn assign<R: Rng + ?Sized>(&self, rng: &mut R) -> Assignment {
        let feeds = select_feeds(&self.pool, self.selection, rng)
            .into_iter()
            .map(|feed| FeedAssignment {
                feed,
                rotation: pick_rotation(rng),
            })
            .collect();

        Assignment {
            feeds,
            // One draw for the whole session, never per feed.
            show_proof: rng.random_bool(0.5),
            options: randomize_options(rng),
        }
    }
}

pub fn select_feeds<R: Rng + ?Sized>(
    pool: &[String],
    selection: FeedSelection,
    rng: &mut R,
) -> Vec<String> {
    match selection {
        FeedSelection::Fixed => pool.iter().take(FEEDS_PER_SESSION).cloned().collect(),
        FeedSelection::RandomSample => {
            let mut picked: Vec<String> = pool
                .choose_multiple(rng, FEEDS_PER_SESSION)
                .cloned()
                .collect();
            picked.shuffle(rng);
            picked
        }
    }
}

pub fn pick_rotation<R: Rng + ?Sized>(rng: &mut R) -> u8 {
    rng.random_range(0..ROTATION_COUNT)
}

pub fn randomize_options<R: Rng + ?Sized>(rng: &mut R) -> OptionOrder {
    OptionOrder {
        likert: shuffled(&LIKERT_DIMENSIONS, rng),
        selection_multiple_choice: shuffled(&SELECTION_ATTRIBUTES, rng),
        selected_multiple_choice: shuffled(&SELECTED_ATTRIBUTES, rng),
        non_selected_multiple_choice: shuffled(&NON_SELECTED_ATTRIBUTES, rng),
    }
}

fn shuffled<R: Rng + ?Sized>(labels: &[&str], rng: &mut R) -> Vec<String> {
    let mut out: Vec<String> = labels.iter().map(|l| l.to_string()).collect();
    out.shuffle(rng);
    out
}
