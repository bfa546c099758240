// handlers/public/auth/login.rs - POST /api/auth/login handler

use std::collections::BTreeMap;

use axum::{body::Bytes, extract::State};
use axum_extra::extract::CookieJar;
use serde::{Deserialize, Serialize};

use super::session_cookie;
use crate::app::AppState;
use crate::auth::Principal;
use crate::error::ApiError;
use crate::middleware::ApiResponse;

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub password: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct LoginResponse {
    pub user: Principal,
    pub is_admin: bool,
    pub expires_in: i64,
}

/**
 * POST /api/auth/login - Password sign-in through the identity provider
 *
 * Expected Input:
 * ```json
 * {
 *   "email": "string",    // Required
 *   "password": "string"  // Required
 * }
 * ```
 *
 * On success the provider access token is stored in the session cookie
 * (HttpOnly, SameSite=Lax) and the body describes the signed-in user.
 * Wrong credentials yield 401 without saying which half was wrong.
 */
pub async fn login(
    State(state): State<AppState>,
    jar: CookieJar,
    body: Bytes,
) -> Result<(CookieJar, ApiResponse<LoginResponse>), ApiError> {
    let request: LoginRequest = serde_json::from_slice(&body)
        .map_err(|e| ApiError::invalid_json(format!("Invalid login payload: {}", e)))?;

    let email = request.email.as_deref().map(str::trim).unwrap_or_default();
    let password = request.password.as_deref().unwrap_or_default();

    let mut field_errors = BTreeMap::new();
    if email.is_empty() {
        field_errors.insert("email".to_string(), "is required".to_string());
    }
    if password.is_empty() {
        field_errors.insert("password".to_string(), "is required".to_string());
    }
    if !field_errors.is_empty() {
        return Err(ApiError::unprocessable_entity("Email and password are required", field_errors));
    }

    let signed_in = state.identity.sign_in(email, password).await?;
    tracing::info!("User {} signed in", signed_in.principal.id);

    let is_admin = state.admins.is_admin(Some(&signed_in.principal));
    let jar = jar.add(session_cookie(&state.config, signed_in.access_token));

    Ok((
        jar,
        ApiResponse::success(LoginResponse {
            user: signed_in.principal,
            is_admin,
            expires_in: signed_in.expires_in,
        }),
    ))
}
