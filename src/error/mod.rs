use std::io::Cursor;

use mongodb::error::Error as DbError;
use rocket::{http::Status, response::Responder, Response};
use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

/// Everything that can go wrong while handling a request.
///
/// `NotFound` deliberately covers both "no such resource" and "resource owned
/// by someone else"; callers must not be able to distinguish the two.
#[derive(Debug, Error)]
pub enum Error {
    #[error(transparent)]
    Db(#[from] DbError),
    #[error("Not found: {0}")]
    NotFound(String),
    #[error("Authentication required")]
    Unauthenticated,
    #[error("Cross-site request forgery check failed")]
    Csrf,
    #[error("Invalid {field}: {reason}")]
    Validation {
        field: &'static str,
        reason: &'static str,
    },
    #[error("Option index out of range")]
    InvalidOption,
    #[error("Already voted on this poll")]
    DuplicateVote,
    #[error("Poll options are locked once votes have been cast")]
    OptionsLocked,
}

impl Error {
    /// Shorthand for a `NotFound` error, where the given description of the
    /// missing resource is logged but never sent to the caller.
    pub fn not_found(what: String) -> Self {
        Self::NotFound(what)
    }

    /// The HTTP status this error maps to.
    pub fn status(&self) -> Status {
        match self {
            Self::Db(_) => Status::InternalServerError,
            Self::NotFound(_) => Status::NotFound,
            Self::Unauthenticated => Status::Unauthorized,
            Self::Csrf => Status::Forbidden,
            Self::Validation { .. } => Status::UnprocessableEntity,
            Self::InvalidOption => Status::BadRequest,
            Self::DuplicateVote | Self::OptionsLocked => Status::Conflict,
        }
    }

    /// The response body, if this error kind is safe to describe to the
    /// caller. Infrastructure errors and not-found details stay internal.
    fn public_message(&self) -> Option<String> {
        match self {
            Self::Db(_) | Self::NotFound(_) | Self::Csrf => None,
            _ => Some(self.to_string()),
        }
    }
}

impl<'r, 'o: 'r> Responder<'r, 'o> for Error {
    fn respond_to(self, _: &'r rocket::Request<'_>) -> rocket::response::Result<'o> {
        let status = self.status();
        match status.class() {
            rocket::http::StatusClass::ServerError => error!("{self}"),
            _ => warn!("{self}"),
        }
        match self.public_message() {
            Some(msg) => Response::build()
                .status(status)
                .sized_body(msg.len(), Cursor::new(msg))
                .ok(),
            None => Err(status),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn statuses() {
        assert_eq!(
            Status::NotFound,
            Error::not_found("poll 123".to_string()).status()
        );
        assert_eq!(Status::Unauthorized, Error::Unauthenticated.status());
        assert_eq!(Status::Forbidden, Error::Csrf.status());
        assert_eq!(
            Status::UnprocessableEntity,
            Error::Validation {
                field: "question",
                reason: "must not be empty",
            }
            .status()
        );
        assert_eq!(Status::BadRequest, Error::InvalidOption.status());
        assert_eq!(Status::Conflict, Error::DuplicateVote.status());
        assert_eq!(Status::Conflict, Error::OptionsLocked.status());
    }

    #[test]
    fn sensitive_kinds_have_no_public_message() {
        // Anti-enumeration: the not-found detail is for logs only.
        assert_eq!(
            None,
            Error::not_found("poll owned by someone else".to_string()).public_message()
        );
        // Token internals are never described to the caller.
        assert_eq!(None, Error::Csrf.public_message());
    }

    #[test]
    fn validation_reason_is_surfaced() {
        let err = Error::Validation {
            field: "options",
            reason: "at least two options are required",
        };
        assert_eq!(
            Some("Invalid options: at least two options are required".to_string()),
            err.public_message()
        );
    }
}
