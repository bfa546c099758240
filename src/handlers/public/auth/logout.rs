// handlers/public/auth/logout.rs - POST /api/auth/logout handler

use axum::{extract::State, http::HeaderMap};
use axum_extra::extract::CookieJar;

use super::expired_session_cookie;
use crate::app::AppState;
use crate::middleware::{session_token, ApiResponse};

/// POST /api/auth/logout - Ends the provider session (best effort) and clears the cookie.
///
/// Always 204: a caller without a session is already logged out.
pub async fn logout(
    State(state): State<AppState>,
    jar: CookieJar,
    headers: HeaderMap,
) -> (CookieJar, ApiResponse<()>) {
    if let Some(token) = session_token(&jar, &headers, &state.config.auth.session_cookie) {
        if let Err(e) = state.identity.sign_out(&token).await {
            tracing::warn!("Provider sign-out failed: {}", e);
        }
    }

    // jar.remove only emits a removal for cookies the request itself carried
    let jar = jar.add(expired_session_cookie(&state.config));
    (jar, ApiResponse::no_content())
}
