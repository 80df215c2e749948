//! The ownership rule, stated once.
//!
//! Every operation that touches a poll goes through this module, either via
//! [`can_access`] after a fetch or via the [`owner_scoped`] write predicate.
//! Handlers never restate the rule, so there is no second copy to drift out
//! of sync.

use mongodb::bson::{doc, Document};

use crate::model::auth::AuthToken;
use crate::model::db::Poll;
use crate::model::mongodb::Id;

/// The operations a caller can request against a poll.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    Create,
    Read,
    Update,
    Delete,
    Vote,
}

impl Operation {
    /// Does this operation require the caller to own the poll?
    pub fn requires_ownership(self) -> bool {
        matches!(self, Self::Read | Self::Update | Self::Delete)
    }
}

/// May the authenticated caller perform `operation` on `poll`?
///
/// Authentication itself is expressed by possession of an [`AuthToken`];
/// callers without one never reach this check. `Create` and `Vote` need
/// nothing beyond that. Everything else is owner-only.
pub fn can_access(token: &AuthToken, operation: Operation, poll: &Poll) -> bool {
    if operation.requires_ownership() {
        token.id() == poll.owner
    } else {
        true
    }
}

/// The atomic write predicate for owner-scoped mutations: matches the poll
/// iff it exists AND belongs to the caller, in a single storage trip. A write
/// that matches zero documents is reported as not-found, regardless of which
/// half of the predicate failed.
pub fn owner_scoped(poll_id: Id, token: &AuthToken) -> Document {
    doc! {
        "_id": *poll_id,
        "owner": *token.id(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn owner_has_full_access() {
        let owner = Id::new();
        let poll = Poll::example(owner);
        let token = AuthToken::new(owner);

        for op in [
            Operation::Create,
            Operation::Read,
            Operation::Update,
            Operation::Delete,
            Operation::Vote,
        ] {
            assert!(can_access(&token, op, &poll), "{op:?} denied to owner");
        }
    }

    #[test]
    fn non_owner_can_only_vote_and_create() {
        let poll = Poll::example(Id::new());
        let stranger = AuthToken::new(Id::new());

        assert!(can_access(&stranger, Operation::Create, &poll));
        assert!(can_access(&stranger, Operation::Vote, &poll));
        assert!(!can_access(&stranger, Operation::Read, &poll));
        assert!(!can_access(&stranger, Operation::Update, &poll));
        assert!(!can_access(&stranger, Operation::Delete, &poll));
    }

    #[test]
    fn write_predicate_includes_both_id_and_owner() {
        let owner = Id::new();
        let poll_id = Id::new();
        let filter = owner_scoped(poll_id, &AuthToken::new(owner));

        assert_eq!(*poll_id, filter.get_object_id("_id").unwrap());
        assert_eq!(*owner, filter.get_object_id("owner").unwrap());
        assert_eq!(2, filter.len());
    }
}
