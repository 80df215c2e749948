use std::ops::{Deref, DerefMut};

use mongodb::bson::DateTime;
use serde::{Deserialize, Serialize};

use crate::model::mongodb::Id;

/// Core poll data.
///
/// `options` is index-stable: votes refer to options by position, so the list
/// may not change once any vote exists (enforced at the update operation).
#[derive(Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PollCore {
    /// The identity that created the poll; sole holder of mutation rights.
    pub owner: Id,
    /// The question being asked.
    pub question: String,
    /// The possible answers, in the order votes index into them.
    pub options: Vec<String>,
    /// When the poll was created.
    pub created_at: DateTime,
}

impl PollCore {
    /// Create a new poll owned by the given identity, created now.
    pub fn new(owner: Id, question: String, options: Vec<String>) -> Self {
        Self {
            owner,
            question,
            options,
            created_at: DateTime::now(),
        }
    }
}

/// A poll without an ID.
pub type NewPoll = PollCore;

/// A poll from the database, with its unique ID.
#[derive(Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Poll {
    #[serde(rename = "_id")]
    pub id: Id,
    #[serde(flatten)]
    pub poll: PollCore,
}

impl Deref for Poll {
    type Target = PollCore;

    fn deref(&self) -> &Self::Target {
        &self.poll
    }
}

impl DerefMut for Poll {
    fn deref_mut(&mut self) -> &mut Self::Target {
        &mut self.poll
    }
}

/// Example data for tests.
#[cfg(test)]
mod examples {
    use super::*;

    impl PollCore {
        pub fn example(owner: Id) -> Self {
            Self::new(
                owner,
                "Cats or dogs?".to_string(),
                vec!["Cats".to_string(), "Dogs".to_string()],
            )
        }
    }

    impl Poll {
        pub fn example(owner: Id) -> Self {
            Self {
                id: Id::new(),
                poll: PollCore::example(owner),
            }
        }
    }
}
