use rocket::{
    http::{Cookie, CookieJar, Status},
    serde::json::Json,
    Route,
};
use serde::{Deserialize, Serialize};

use crate::model::auth::{CsrfGuard, SESSION_COOKIE};

pub fn routes() -> Vec<Route> {
    routes![csrf_token, logout]
}

/// Issue (or re-read) the session's anti-forgery token. The value is also
/// returned in the body so clients can mirror it into mutating payloads.
#[get("/session/csrf")]
fn csrf_token(cookies: &CookieJar<'_>) -> Json<CsrfTokenResponse> {
    Json(CsrfTokenResponse {
        csrf_token: CsrfGuard::issue(cookies),
    })
}

#[post("/session/logout")]
fn logout(cookies: &CookieJar<'_>) -> Status {
    cookies.remove(Cookie::named(SESSION_COOKIE));
    Status::Ok
}

#[derive(Debug, Serialize, Deserialize)]
struct CsrfTokenResponse {
    #[serde(rename = "csrfToken")]
    csrf_token: String,
}
