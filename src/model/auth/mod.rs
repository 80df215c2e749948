mod csrf;
mod token;

pub use csrf::{CsrfGuard, CSRF_COOKIE};
pub use token::{AuthToken, SESSION_COOKIE};
