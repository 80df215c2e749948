use mongodb::bson::doc;

use crate::error::{Error, Result};
use crate::model::{
    db::Poll,
    mongodb::{Coll, Id},
};

/// Look up a poll by ID alone (no ownership scope).
pub async fn poll_by_id(poll_id: Id, polls: &Coll<Poll>) -> Result<Poll> {
    polls
        .find_one(doc! { "_id": *poll_id }, None)
        .await?
        .ok_or_else(|| Error::not_found(format!("Poll with ID '{poll_id}'")))
}
