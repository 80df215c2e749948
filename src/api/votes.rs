use mongodb::{
    bson::doc,
    error::{Error as DbError, ErrorKind, WriteFailure},
};
use rocket::{serde::json::Json, Route};

use crate::error::{Error, Result};
use crate::model::{
    api::VoteSpec,
    auth::{AuthToken, CsrfGuard},
    db::{NewVote, Poll, Vote},
    mongodb::{Coll, Id},
    policy::{self, Operation},
};

use super::common::poll_by_id;

pub fn routes() -> Vec<Route> {
    routes![submit_vote]
}

#[post("/polls/<poll_id>/votes", data = "<spec>", format = "json")]
async fn submit_vote(
    csrf: CsrfGuard,
    token: Option<AuthToken>,
    poll_id: Id,
    spec: Json<VoteSpec>,
    polls: Coll<Poll>,
    votes: Coll<Vote>,
    new_votes: Coll<NewVote>,
) -> Result<()> {
    // Votes mutate state like every other write, so the anti-forgery check
    // applies here too.
    csrf.verify(spec.csrf_token.as_deref())?;
    let token = token.ok_or(Error::Unauthenticated)?;

    let poll = poll_by_id(poll_id, &polls).await?;
    if !policy::can_access(&token, Operation::Vote, &poll) {
        return Err(Error::not_found(format!(
            "Poll with ID '{poll_id}' for this caller"
        )));
    }

    let option = spec.checked_option(poll.options.len())?;

    // Best-effort early check for a friendly error; two concurrent votes can
    // both pass it, and the unique index below is what actually decides.
    let existing = votes
        .find_one(doc! { "poll_id": *poll_id, "voter": *token.id() }, None)
        .await?;
    if existing.is_some() {
        return Err(Error::DuplicateVote);
    }

    let vote = NewVote::new(poll_id, token.id(), option);
    match new_votes.insert_one(&vote, None).await {
        Ok(_) => Ok(()),
        Err(err) if is_duplicate_key(&err) => Err(Error::DuplicateVote),
        Err(err) => Err(err.into()),
    }
}

/// Did this write fail the unique `(poll_id, voter)` index?
fn is_duplicate_key(err: &DbError) -> bool {
    match *err.kind {
        ErrorKind::Write(WriteFailure::WriteError(ref write_err)) => write_err.code == 11000,
        _ => false,
    }
}
