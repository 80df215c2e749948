use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::model::{
    db::{Poll, PollCore},
    mongodb::Id,
};

/// A poll as submitted by a client, with the mirrored anti-forgery token.
#[derive(Debug, Serialize, Deserialize)]
pub struct PollSpec {
    /// The question being asked.
    pub question: String,
    /// The possible answers, in order.
    pub options: Vec<String>,
    /// Double-submit copy of the `csrfToken` cookie.
    #[serde(rename = "csrfToken")]
    pub csrf_token: Option<String>,
}

impl PollSpec {
    /// Check the input bounds: a non-blank question and at least two
    /// non-blank options.
    pub fn validate(&self) -> Result<()> {
        if self.question.trim().is_empty() {
            return Err(Error::Validation {
                field: "question",
                reason: "must not be empty",
            });
        }
        if self.options.len() < 2 {
            return Err(Error::Validation {
                field: "options",
                reason: "at least two options are required",
            });
        }
        if self.options.iter().any(|option| option.trim().is_empty()) {
            return Err(Error::Validation {
                field: "options",
                reason: "options must not be empty",
            });
        }
        Ok(())
    }

    /// Convert this spec into a poll owned by the given identity.
    /// Call [`Self::validate`] first.
    pub fn into_poll(self, owner: Id) -> PollCore {
        PollCore::new(owner, self.question, self.options)
    }
}

/// A poll as described to its owner.
#[derive(Debug, Serialize, Deserialize)]
pub struct PollDescription {
    pub id: Id,
    pub question: String,
    pub options: Vec<String>,
    pub created_at: DateTime<Utc>,
}

impl From<Poll> for PollDescription {
    fn from(poll: Poll) -> Self {
        Self {
            id: poll.id,
            question: poll.poll.question,
            options: poll.poll.options,
            created_at: poll.poll.created_at.to_chrono(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn spec(question: &str, options: &[&str]) -> PollSpec {
        PollSpec {
            question: question.to_string(),
            options: options.iter().map(|s| s.to_string()).collect(),
            csrf_token: None,
        }
    }

    #[test]
    fn valid_spec_passes() {
        assert!(spec("Cats or dogs?", &["Cats", "Dogs"]).validate().is_ok());
    }

    #[test]
    fn empty_question_is_rejected() {
        assert!(matches!(
            spec("", &["Cats", "Dogs"]).validate(),
            Err(Error::Validation {
                field: "question",
                ..
            })
        ));
        // Whitespace does not count as a question.
        assert!(spec("   ", &["Cats", "Dogs"]).validate().is_err());
    }

    #[test]
    fn single_option_is_rejected() {
        assert!(matches!(
            spec("Cats or dogs?", &["only one"]).validate(),
            Err(Error::Validation { field: "options", .. })
        ));
        assert!(spec("Cats or dogs?", &[]).validate().is_err());
    }

    #[test]
    fn blank_option_is_rejected() {
        assert!(matches!(
            spec("Cats or dogs?", &["Cats", " "]).validate(),
            Err(Error::Validation { field: "options", .. })
        ));
    }

    #[test]
    fn into_poll_records_the_owner() {
        let owner = Id::new();
        let poll = spec("Cats or dogs?", &["Cats", "Dogs"]).into_poll(owner);
        assert_eq!(owner, poll.owner);
        assert_eq!(vec!["Cats".to_string(), "Dogs".to_string()], poll.options);
    }
}
