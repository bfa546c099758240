// handlers/elevated/technicians/update.rs - PUT /api/admin/techniciens/:id handler

use axum::{
    body::Bytes,
    extract::{Extension, Path, State},
};

use super::utils::{parse_id, parse_json_body};
use crate::app::AppState;
use crate::database::record::technician_patch_from_json;
use crate::database::Technician;
use crate::middleware::{AdminUser, ApiResponse, ApiResult};

/**
 * PUT /api/admin/techniciens/:id - Partial update of one technician
 *
 * Accepts any subset of the create payload's fields. Only keys present in
 * the body are written; optional fields may be set to null. `code` and
 * `name` cannot be cleared.
 *
 * Expected Input:
 * ```json
 * {
 *   "phone": "0611223344",
 *   "tech_manager_email": null
 * }
 * ```
 *
 * @returns 200 with the updated row, 404 when the id does not exist
 */
pub async fn technician_update(
    State(state): State<AppState>,
    Extension(AdminUser(admin)): Extension<AdminUser>,
    Path(id): Path<String>,
    body: Bytes,
) -> ApiResult<Technician> {
    let id = parse_id(&id)?;
    let patch = technician_patch_from_json(parse_json_body(&body)?)?;
    let updated = state.technicians.update(id, &patch).await?;

    tracing::info!(
        "Technician {} updated by {}",
        updated.id,
        admin.email.as_deref().unwrap_or(&admin.id)
    );
    Ok(ApiResponse::success(updated))
}
