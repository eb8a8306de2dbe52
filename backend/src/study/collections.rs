//! Decides which collection a record lands in.
//!
//! Staff test the study with the Prolific triple `("test", "test", "test")`;
//! those records go to separate test collections so they never mix with
//! participant data.

use feeds_common::model::session::SessionIdentity;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Collections {
    pub session_starts: String,
    pub responses: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecordKind {
    SessionStart,
    Response,
}

#[derive(Debug, Clone)]
pub struct CollectionResolver {
    production: Collections,
    test: Collections,
}

impl CollectionResolver {
    pub fn new(production: Collections, test: Collections) -> Self {
        Self { production, test }
    }

    pub fn resolve(&self, identity: &SessionIdentity, kind: RecordKind) -> &str {
        let collections = if identity.is_test_sentinel() {
            &self.test
        } else {
            &self.production
        };

        match kind {
            RecordKind::SessionStart => &collections.session_starts,
            RecordKind::Response => &collections.responses,
        }
    }
}
