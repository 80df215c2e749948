use mongodb::{bson::doc, options::FindOptions};
use rocket::{futures::TryStreamExt, serde::json::Json, Route, State};
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::listing::ListingNotifier;
use crate::model::{
    api::{PollDescription, PollSpec},
    auth::{AuthToken, CsrfGuard},
    db::{NewPoll, Poll, Vote},
    mongodb::{Coll, Id},
    policy::{self, Operation},
};

pub fn routes() -> Vec<Route> {
    routes![create_poll, get_poll, list_polls, update_poll, delete_poll]
}

#[post("/polls", data = "<spec>", format = "json")]
async fn create_poll(
    csrf: CsrfGuard,
    token: Option<AuthToken>,
    spec: Json<PollSpec>,
    new_polls: Coll<NewPoll>,
    notifier: &State<ListingNotifier>,
) -> Result<Json<PollDescription>> {
    csrf.verify(spec.csrf_token.as_deref())?;
    let token = token.ok_or(Error::Unauthenticated)?;
    spec.validate()?;

    let poll = spec.0.into_poll(token.id());
    let id: Id = new_polls
        .insert_one(&poll, None)
        .await?
        .inserted_id
        .as_object_id()
        .unwrap() // Valid because `inserted_id` came from the DB.
        .into();

    notifier.poll_created(id);
    Ok(Json(Poll { id, poll }.into()))
}

#[get("/polls/<poll_id>")]
async fn get_poll(
    token: Option<AuthToken>,
    poll_id: Id,
    polls: Coll<Poll>,
) -> Result<Json<PollDescription>> {
    // A poll that exists but belongs to someone else is reported exactly
    // like a poll that does not exist.
    let poll = polls
        .find_one(doc! { "_id": *poll_id }, None)
        .await?
        .filter(|poll| {
            token
                .as_ref()
                .map_or(false, |token| policy::can_access(token, Operation::Read, poll))
        })
        .ok_or_else(|| Error::not_found(format!("Poll with ID '{poll_id}' for this caller")))?;
    Ok(Json(poll.into()))
}

#[get("/polls")]
async fn list_polls(
    token: Option<AuthToken>,
    polls: Coll<Poll>,
) -> Result<Json<Vec<PollDescription>>> {
    let token = match token {
        Some(token) => token,
        None => return Ok(Json(Vec::new())),
    };

    let newest_first = FindOptions::builder().sort(doc! { "created_at": -1 }).build();
    let owned: Vec<Poll> = polls
        .find(doc! { "owner": *token.id() }, newest_first)
        .await?
        .try_collect()
        .await?;
    Ok(Json(owned.into_iter().map(Into::into).collect()))
}

#[put("/polls/<poll_id>", data = "<spec>", format = "json")]
async fn update_poll(
    csrf: CsrfGuard,
    token: Option<AuthToken>,
    poll_id: Id,
    spec: Json<PollSpec>,
    polls: Coll<Poll>,
    votes: Coll<Vote>,
) -> Result<()> {
    csrf.verify(spec.csrf_token.as_deref())?;
    let token = token.ok_or(Error::Unauthenticated)?;
    spec.validate()?;

    // Owner-scoped fetch; a foreign poll looks missing.
    let poll = polls
        .find_one(policy::owner_scoped(poll_id, &token), None)
        .await?
        .ok_or_else(|| Error::not_found(format!("Poll with ID '{poll_id}' for this caller")))?;

    // Votes index into the option list, so it is frozen once any vote exists.
    if spec.options != poll.options {
        let votes_cast = votes
            .count_documents(doc! { "poll_id": *poll_id }, None)
            .await?;
        if votes_cast > 0 {
            return Err(Error::OptionsLocked);
        }
    }

    // The write itself re-checks id AND owner in one atomic predicate.
    let update = doc! {
        "$set": {
            "question": spec.question.clone(),
            "options": spec.options.clone(),
        }
    };
    let result = polls
        .update_one(policy::owner_scoped(poll_id, &token), update, None)
        .await?;
    if result.matched_count == 0 {
        return Err(Error::not_found(format!(
            "Poll with ID '{poll_id}' for this caller"
        )));
    }
    Ok(())
}

#[delete("/polls/<poll_id>", data = "<request>", format = "json")]
async fn delete_poll(
    csrf: CsrfGuard,
    token: Option<AuthToken>,
    poll_id: Id,
    request: Json<DeleteRequest>,
    polls: Coll<Poll>,
    votes: Coll<Vote>,
    notifier: &State<ListingNotifier>,
) -> Result<()> {
    csrf.verify(request.csrf_token.as_deref())?;
    let token = token.ok_or(Error::Unauthenticated)?;

    let result = polls
        .delete_one(policy::owner_scoped(poll_id, &token), None)
        .await?;
    if result.deleted_count == 0 {
        return Err(Error::not_found(format!(
            "Poll with ID '{poll_id}' for this caller"
        )));
    }

    // The poll is gone; its votes are unreachable and can be cleaned up.
    votes.delete_many(doc! { "poll_id": *poll_id }, None).await?;

    notifier.poll_deleted(poll_id);
    Ok(())
}

/// Delete confirmation payload: just the mirrored anti-forgery token.
#[derive(Debug, Serialize, Deserialize)]
struct DeleteRequest {
    #[serde(rename = "csrfToken")]
    csrf_token: Option<String>,
}
