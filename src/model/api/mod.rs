//! API-compatible types: what clients send and receive, with validation.

mod poll;
pub use poll::{PollDescription, PollSpec};

mod vote;
pub use vote::VoteSpec;
