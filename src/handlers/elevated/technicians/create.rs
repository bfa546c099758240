// handlers/elevated/technicians/create.rs - POST /api/admin/techniciens handler

use axum::{
    body::Bytes,
    extract::{Extension, State},
};

use super::utils::parse_json_body;
use crate::app::AppState;
use crate::database::record::new_technician_from_json;
use crate::database::Technician;
use crate::middleware::{AdminUser, ApiResponse, ApiResult};

/**
 * POST /api/admin/techniciens - Add a technician to the roster
 *
 * Expected Input:
 * ```json
 * {
 *   "code": "string",               // Required: stored trimmed and upper-cased
 *   "name": "string",               // Required: stored trimmed
 *   "region": "string",             // Optional, may be null
 *   "email": "string",              // Optional, may be null
 *   "phone": "string",              // Optional, may be null
 *   "tech_manager_email": "string", // Optional, may be null
 *   "tech_manager_phone": "string", // Optional, may be null
 *   "ops_manager_email": "string",  // Optional, may be null
 *   "ops_manager_phone": "string"   // Optional, may be null
 * }
 * ```
 *
 * Any other key is rejected with 422 and a per-field message; `id` is
 * assigned by the store and ignored if sent.
 *
 * @returns 201 with the stored row, including its id
 */
pub async fn technician_create(
    State(state): State<AppState>,
    Extension(AdminUser(admin)): Extension<AdminUser>,
    body: Bytes,
) -> ApiResult<Technician> {
    let record = new_technician_from_json(parse_json_body(&body)?)?;
    let created = state.technicians.insert(&record).await?;

    tracing::info!(
        "Technician {} ({}) created by {}",
        created.id,
        created.code,
        admin.email.as_deref().unwrap_or(&admin.id)
    );
    Ok(ApiResponse::created(created))
}
