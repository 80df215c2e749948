use data_encoding::BASE64URL_NOPAD;
use rand::RngCore;
use rocket::{
    http::{Cookie, CookieJar, SameSite},
    request::{self, FromRequest},
    Request,
};

use crate::error::{Error, Result};

pub const CSRF_COOKIE: &str = "csrfToken";

/// Number of random bytes behind each token.
const TOKEN_BYTES: usize = 32;

/// Double-submit-cookie guard against cross-site request forgery.
///
/// The token lives in a cookie the client can read and must be mirrored into
/// the `csrfToken` field of every mutating request's payload. Extraction never
/// fails; verification fails closed on any missing or mismatched value, before
/// any authorization or storage work.
pub struct CsrfGuard {
    cookie_value: Option<String>,
}

impl CsrfGuard {
    /// Check the mirrored payload field against the cookie. Both must be
    /// present and equal; the comparison is constant-time.
    pub fn verify(&self, field: Option<&str>) -> Result<()> {
        match (self.cookie_value.as_deref(), field) {
            (Some(cookie), Some(field)) if constant_time_eq(cookie.as_bytes(), field.as_bytes()) => {
                Ok(())
            }
            _ => Err(Error::Csrf),
        }
    }

    /// Issue a token for this session, setting the cookie if not already set.
    /// Idempotent: an existing token is returned unchanged.
    pub fn issue(cookies: &CookieJar<'_>) -> String {
        if let Some(cookie) = cookies.get(CSRF_COOKIE) {
            return cookie.value().to_string();
        }

        let token = generate_token();
        // Not HttpOnly: the client must read it back to mirror it.
        cookies.add(
            Cookie::build(CSRF_COOKIE, token.clone())
                .same_site(SameSite::Lax)
                .secure(true)
                .http_only(false)
                .finish(),
        );
        token
    }
}

#[rocket::async_trait]
impl<'r> FromRequest<'r> for CsrfGuard {
    type Error = ();

    async fn from_request(req: &'r Request<'_>) -> request::Outcome<Self, Self::Error> {
        let cookie_value = req
            .cookies()
            .get(CSRF_COOKIE)
            .map(|cookie| cookie.value().to_string());
        request::Outcome::Success(CsrfGuard { cookie_value })
    }
}

/// Generate a fresh URL-safe token.
fn generate_token() -> String {
    let mut bytes = [0u8; TOKEN_BYTES];
    rand::thread_rng().fill_bytes(&mut bytes);
    BASE64URL_NOPAD.encode(&bytes)
}

/// Compare two byte strings without short-circuiting on the first difference.
fn constant_time_eq(a: &[u8], b: &[u8]) -> bool {
    if a.len() != b.len() {
        return false;
    }
    a.iter().zip(b).fold(0u8, |acc, (x, y)| acc | (x ^ y)) == 0
}

#[cfg(test)]
mod tests {
    use super::*;

    fn guard(cookie: Option<&str>) -> CsrfGuard {
        CsrfGuard {
            cookie_value: cookie.map(str::to_string),
        }
    }

    #[test]
    fn matching_token_passes() {
        assert!(guard(Some("token123")).verify(Some("token123")).is_ok());
    }

    #[test]
    fn missing_cookie_fails_closed() {
        assert!(matches!(
            guard(None).verify(Some("token123")),
            Err(Error::Csrf)
        ));
    }

    #[test]
    fn missing_field_fails_closed() {
        assert!(matches!(guard(Some("token123")).verify(None), Err(Error::Csrf)));
    }

    #[test]
    fn mismatched_token_fails() {
        assert!(matches!(
            guard(Some("token123")).verify(Some("token124")),
            Err(Error::Csrf)
        ));
        // Prefixes are not good enough either.
        assert!(matches!(
            guard(Some("token123")).verify(Some("token")),
            Err(Error::Csrf)
        ));
    }

    #[test]
    fn generated_tokens_are_unique_and_url_safe() {
        let first = generate_token();
        let second = generate_token();
        assert_ne!(first, second);
        assert!(BASE64URL_NOPAD.decode(first.as_bytes()).is_ok());
        assert_eq!(TOKEN_BYTES, BASE64URL_NOPAD.decode(first.as_bytes()).unwrap().len());
    }

    #[test]
    fn constant_time_eq_basics() {
        assert!(constant_time_eq(b"abc", b"abc"));
        assert!(!constant_time_eq(b"abc", b"abd"));
        assert!(!constant_time_eq(b"abc", b"ab"));
        assert!(constant_time_eq(b"", b""));
    }
}
