use chrono::{serde::ts_seconds, DateTime, Utc};
use jsonwebtoken::{
    errors::Error as JwtError, DecodingKey, EncodingKey, Header, TokenData, Validation,
};
use rocket::{
    http::{Cookie, SameSite},
    request::{self, FromRequest},
    Request, State,
};
use serde::{Deserialize, Serialize};
use time;

use crate::model::mongodb::Id;
use crate::Config;

pub const SESSION_COOKIE: &str = "session";

/// The authenticated identity behind a request, resolved from the session
/// cookie. Issued by the external identity provider, which signs it with the
/// shared JWT secret.
///
/// Use `Option<AuthToken>` as a request guard to resolve the caller: a
/// missing, malformed, or expired cookie yields `None` rather than an error.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct AuthToken {
    #[serde(rename = "sub")]
    id: Id,
}

impl AuthToken {
    /// Create a new token for the given user ID.
    pub fn new(id: Id) -> Self {
        Self { id }
    }

    /// Get the user ID.
    pub fn id(&self) -> Id {
        self.id
    }

    /// Serialize this token into a session cookie.
    pub fn into_cookie(self, config: &Config) -> Cookie<'static> {
        let claims = Claims {
            token: self,
            expire_at: Utc::now() + config.auth_ttl(),
        };

        let token = jsonwebtoken::encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(config.jwt_secret()),
        )
        .unwrap(); // Infallible.

        Cookie::build(SESSION_COOKIE, token)
            .max_age(time::Duration::seconds(config.auth_ttl().num_seconds()))
            .same_site(SameSite::Strict)
            .secure(true)
            .finish()
    }

    /// Deserialize a token from a session cookie.
    pub fn from_cookie(cookie: &Cookie<'_>, config: &Config) -> Result<Self, JwtError> {
        jsonwebtoken::decode(
            cookie.value(),
            &DecodingKey::from_secret(config.jwt_secret()),
            &Validation::default(),
        )
        .map(|claims: TokenData<Claims>| claims.claims.token)
    }
}

/// Cookie claims: the token itself plus an expiry datetime.
#[derive(Serialize, Deserialize)]
struct Claims {
    #[serde(flatten)]
    token: AuthToken,
    #[serde(rename = "exp", with = "ts_seconds")]
    expire_at: DateTime<Utc>,
}

#[rocket::async_trait]
impl<'r> FromRequest<'r> for AuthToken {
    type Error = ();

    /// Resolve the caller from the session cookie. An absent or invalid
    /// cookie forwards, so `Option<AuthToken>` resolves to `None` for
    /// anonymous callers instead of failing the request.
    async fn from_request(req: &'r Request<'_>) -> request::Outcome<Self, Self::Error> {
        let config = req.guard::<&State<Config>>().await.unwrap(); // Valid as `Config` is always managed

        let cookie = match req.cookies().get(SESSION_COOKIE) {
            Some(cookie) => cookie,
            None => return request::Outcome::Forward(()),
        };
        match Self::from_cookie(cookie, config) {
            Ok(token) => request::Outcome::Success(token),
            Err(err) => {
                warn!("Rejected session cookie: {err}");
                request::Outcome::Forward(())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cookie_round_trip() {
        let config = Config::for_tests();
        let id = Id::new();

        let cookie = AuthToken::new(id).into_cookie(&config);
        assert_eq!(SESSION_COOKIE, cookie.name());
        assert_eq!(Some(SameSite::Strict), cookie.same_site());
        assert_eq!(Some(true), cookie.secure());

        let token = AuthToken::from_cookie(&cookie, &config).unwrap();
        assert_eq!(id, token.id());
    }

    #[test]
    fn expired_token_is_rejected() {
        let config = Config::for_tests();
        let claims = Claims {
            token: AuthToken::new(Id::new()),
            expire_at: Utc::now() - chrono::Duration::hours(2),
        };
        let value = jsonwebtoken::encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(config.jwt_secret()),
        )
        .unwrap();
        let cookie = Cookie::new(SESSION_COOKIE, value);

        assert!(AuthToken::from_cookie(&cookie, &config).is_err());
    }

    #[test]
    fn tampered_token_is_rejected() {
        let config = Config::for_tests();
        let cookie = AuthToken::new(Id::new()).into_cookie(&config);
        let mut value = cookie.value().to_string();
        value.push('x');
        let forged = Cookie::new(SESSION_COOKIE, value);

        assert!(AuthToken::from_cookie(&forged, &config).is_err());
    }
}
