// handlers/protected/auth/whoami.rs - GET /api/auth/whoami handler

use axum::extract::{Extension, State};
use serde::Serialize;

use crate::app::AppState;
use crate::middleware::{ApiResponse, ApiResult, AuthUser};

#[derive(Debug, Serialize)]
pub struct WhoAmI {
    pub id: String,
    pub email: Option<String>,
    pub role: Option<String>,
    /// Lets the UI decide whether to offer the admin page
    pub is_admin: bool,
}

/// GET /api/auth/whoami - The caller's principal as the identity provider sees it
pub async fn whoami(
    State(state): State<AppState>,
    Extension(AuthUser(principal)): Extension<AuthUser>,
) -> ApiResult<WhoAmI> {
    let is_admin = state.admins.is_admin(Some(&principal));

    Ok(ApiResponse::success(WhoAmI {
        id: principal.id,
        email: principal.email,
        role: principal.role,
        is_admin,
    }))
}
