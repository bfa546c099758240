// handlers/protected/search.rs - GET /api/search handler

use axum::extract::{rejection::QueryRejection, Extension, Query, State};
use serde::Deserialize;

use crate::app::AppState;
use crate::database::models::technician::normalize_code;
use crate::database::TechnicianContact;
use crate::error::ApiError;
use crate::middleware::{ApiResponse, ApiResult, AuthUser};

/// Upper bound on contacts returned by one search
pub const SEARCH_RESULT_CAP: usize = 50;

#[derive(Debug, Deserialize)]
pub struct SearchQuery {
    pub code: Option<String>,
}

/**
 * GET /api/search?code=<code> - Contacts for a technician code
 *
 * The code is trimmed and upper-cased before an exact match, so " ab12 "
 * finds "AB12". Results carry contact fields only (no id, no code), at most
 * SEARCH_RESULT_CAP rows; an unknown code is an empty list, not a 404.
 *
 * Expected Output:
 * ```json
 * [
 *   {
 *     "name": "Jane Doe",
 *     "region": "North",
 *     "email": "jane@example.com",
 *     "phone": "0600000000",
 *     "tech_manager_email": null,
 *     "tech_manager_phone": "NA",
 *     "ops_manager_email": "ops@example.com",
 *     "ops_manager_phone": null
 *   }
 * ]
 * ```
 */
pub async fn search(
    State(state): State<AppState>,
    Extension(AuthUser(user)): Extension<AuthUser>,
    query: Result<Query<SearchQuery>, QueryRejection>,
) -> ApiResult<Vec<TechnicianContact>> {
    let Query(query) = query.map_err(|e| ApiError::bad_request(e.body_text()))?;
    let code = query
        .code
        .as_deref()
        .map(normalize_code)
        .filter(|code| !code.is_empty())
        .ok_or_else(|| ApiError::bad_request("Query parameter 'code' is required"))?;

    let mut contacts = state.directory.find_contacts(&code, SEARCH_RESULT_CAP).await?;
    contacts.truncate(SEARCH_RESULT_CAP);

    tracing::debug!("Search '{}' by {} matched {} contacts", code, user.id, contacts.len());
    Ok(ApiResponse::success(contacts))
}
