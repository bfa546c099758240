// handlers/public/auth/mod.rs - Session acquisition and release
//
// Login trades credentials for a provider session stored in an HttpOnly cookie,
// which is what the page gate and the API guards read afterwards.

use axum_extra::extract::cookie::{Cookie, SameSite};

use crate::config::AppConfig;

pub mod login;  // POST /api/auth/login
pub mod logout; // POST /api/auth/logout

pub use login::login;
pub use logout::logout;

/// Session cookie carrying the provider access token
pub(crate) fn session_cookie(config: &AppConfig, access_token: String) -> Cookie<'static> {
    Cookie::build((config.auth.session_cookie.clone(), access_token))
        .path("/")
        .http_only(true)
        .same_site(SameSite::Lax)
        .secure(config.security.secure_cookies)
        .build()
}

/// Removal cookie (empty, Max-Age=0); path must match the one the session cookie was set with
pub(crate) fn expired_session_cookie(config: &AppConfig) -> Cookie<'static> {
    let mut cookie = Cookie::build((config.auth.session_cookie.clone(), ""))
        .path("/")
        .http_only(true)
        .build();
    cookie.make_removal();
    cookie
}
