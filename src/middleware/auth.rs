use axum::{
    extract::{Request, State},
    http::HeaderMap,
    middleware::Next,
    response::Response,
};
use axum_extra::extract::CookieJar;

use crate::app::AppState;
use crate::auth::Principal;

/// Principal resolved for the current request, if the provider accepted its token
#[derive(Clone, Debug)]
pub struct CurrentUser(pub Option<Principal>);

/// Access token for the current request: the session cookie first, then a Bearer header
pub fn session_token(jar: &CookieJar, headers: &HeaderMap, cookie_name: &str) -> Option<String> {
    if let Some(cookie) = jar.get(cookie_name) {
        let value = cookie.value().trim();
        if !value.is_empty() {
            return Some(value.to_string());
        }
    }

    headers
        .get("authorization")
        .and_then(|value| value.to_str().ok())
        .and_then(|value| extract_bearer_token(value).ok())
}

/// Extract Bearer token from Authorization header
fn extract_bearer_token(auth_header: &str) -> Result<String, String> {
    const BEARER_PREFIX: &str = "Bearer ";

    let Some(token) = auth_header.strip_prefix(BEARER_PREFIX) else {
        return Err("Authorization header must start with 'Bearer '".to_string());
    };

    let token = token.trim();
    if token.is_empty() {
        return Err("Bearer token is empty".to_string());
    }

    Ok(token.to_string())
}

/// Asks the identity provider who the caller is and injects `CurrentUser`.
///
/// Never rejects on its own: a missing, rejected or unverifiable token simply
/// resolves to no principal, and the route-level guards decide what that means.
pub async fn resolve_principal_middleware(
    State(state): State<AppState>,
    jar: CookieJar,
    mut request: Request,
    next: Next,
) -> Response {
    let token = session_token(&jar, request.headers(), &state.config.auth.session_cookie);

    let principal = match token {
        Some(token) => match state.identity.get_user(&token).await {
            Ok(Some(principal)) => {
                tracing::debug!("Resolved principal {} ({:?})", principal.id, principal.email);
                Some(principal)
            }
            Ok(None) => {
                tracing::warn!("Session token rejected by identity provider");
                None
            }
            Err(e) => {
                tracing::warn!("Identity lookup failed: {}", e);
                None
            }
        },
        None => None,
    };

    request.extensions_mut().insert(CurrentUser(principal));
    next.run(request).await
}
