//! DB-compatible (e.g. de/serialisable) types.
//!
//! The types in this module are serialised in a DB-friendly way, e.g. IDs and
//! datetimes are serialised in MongoDB's own format.

mod poll;
pub use poll::{NewPoll, Poll, PollCore};

mod vote;
pub use vote::{NewVote, Vote, VoteCore};
