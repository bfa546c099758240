use axum::{
    extract::{Request, State},
    middleware::Next,
    response::Response,
};

use crate::app::AppState;
use crate::auth::Principal;
use crate::error::ApiError;
use super::auth::CurrentUser;

/// Principal of a request that passed `require_user_middleware`
#[derive(Clone, Debug)]
pub struct AuthUser(pub Principal);

/// Principal of a request that passed `require_admin_middleware`
#[derive(Clone, Debug)]
pub struct AdminUser(pub Principal);

fn current_user(request: &Request) -> Option<Principal> {
    request
        .extensions()
        .get::<CurrentUser>()
        .and_then(|CurrentUser(principal)| principal.clone())
}

/// Session routes: no resolved principal means 401
pub async fn require_user_middleware(mut request: Request, next: Next) -> Result<Response, ApiError> {
    let principal = current_user(&request)
        .ok_or_else(|| ApiError::unauthorized("Session expired or missing, please sign in again"))?;

    request.extensions_mut().insert(AuthUser(principal));
    Ok(next.run(request).await)
}

/// Admin routes: anything but an administrator gets 403, before any store access
pub async fn require_admin_middleware(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let principal = current_user(&request);

    if !state.admins.is_admin(principal.as_ref()) {
        tracing::warn!(
            "Admin access denied for {}",
            principal
                .as_ref()
                .and_then(|p| p.email.as_deref())
                .unwrap_or("anonymous request")
        );
        return Err(ApiError::forbidden("Forbidden: administrator access required"));
    }

    // is_admin(None) is false, so a principal is present here
    if let Some(principal) = principal {
        tracing::debug!("Admin access granted to {}", principal.id);
        request.extensions_mut().insert(AdminUser(principal));
    }

    Ok(next.run(request).await)
}
