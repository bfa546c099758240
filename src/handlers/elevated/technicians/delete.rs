// handlers/elevated/technicians/delete.rs - DELETE /api/admin/techniciens/:id handler

use axum::extract::{Extension, Path, State};

use super::utils::parse_id;
use crate::app::AppState;
use crate::middleware::{AdminUser, ApiResponse, ApiResult};

/// DELETE /api/admin/techniciens/:id - Hard delete; 204 on success, 404 if already gone
pub async fn technician_delete(
    State(state): State<AppState>,
    Extension(AdminUser(admin)): Extension<AdminUser>,
    Path(id): Path<String>,
) -> ApiResult<()> {
    let id = parse_id(&id)?;
    state.technicians.delete(id).await?;

    tracing::info!("Technician {} deleted by {}", id, admin.email.as_deref().unwrap_or(&admin.id));
    Ok(ApiResponse::no_content())
}
