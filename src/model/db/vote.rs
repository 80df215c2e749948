use std::ops::{Deref, DerefMut};

use mongodb::bson::DateTime;
use serde::{Deserialize, Serialize};

use crate::model::mongodb::Id;

/// Core vote data.
///
/// At most one vote may exist per `(poll_id, voter)` pair; the unique index
/// created in `ensure_indexes_exist` enforces this.
#[derive(Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct VoteCore {
    /// The poll being voted on (a reference, not ownership).
    pub poll_id: Id,
    /// The identity that cast the vote.
    pub voter: Id,
    /// Zero-based index into the poll's options at insertion time.
    pub option: u32,
    /// When the vote was cast.
    pub cast_at: DateTime,
}

impl VoteCore {
    /// Record a vote cast now.
    pub fn new(poll_id: Id, voter: Id, option: u32) -> Self {
        Self {
            poll_id,
            voter,
            option,
            cast_at: DateTime::now(),
        }
    }
}

/// A vote without an ID.
pub type NewVote = VoteCore;

/// A vote from the database, with its unique ID.
#[derive(Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Vote {
    #[serde(rename = "_id")]
    pub id: Id,
    #[serde(flatten)]
    pub vote: VoteCore,
}

impl Deref for Vote {
    type Target = VoteCore;

    fn deref(&self) -> &Self::Target {
        &self.vote
    }
}

impl DerefMut for Vote {
    fn deref_mut(&mut self) -> &mut Self::Target {
        &mut self.vote
    }
}
