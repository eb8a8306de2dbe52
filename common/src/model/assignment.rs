use serde::{Deserialize, Serialize};

/// A feed picked for a session together with the rotation it is shown in.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeedAssignment {
    pub feed: String,
    pub rotation: u8,
}

/// Randomized order of the questionnaire options for one session.
///
/// Every list is a permutation of a fixed label set; the field names are the
/// keys the frontend reads from `optionsRandomized`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OptionOrder {
    pub likert: Vec<String>,
    pub selection_multiple_choice: Vec<String>,
    pub selected_multiple_choice: Vec<String>,
    pub non_selected_multiple_choice: Vec<String>,
}

/// The stimulus decision made for one participant session.
///
/// Created once per validation call and never changed afterwards. A single
/// `show_proof` flag applies to every feed of the assignment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Assignment {
    pub feeds: Vec<FeedAssignment>,
    pub show_proof: bool,
    pub options: OptionOrder,
}

impl Assignment {
    /// Feed ids in presentation order.
    pub fn feed_ids(&self) -> Vec<String> {
        self.feeds.iter().map(|f| f.feed.clone()).collect()
    }
}
