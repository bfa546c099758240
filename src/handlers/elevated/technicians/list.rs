// handlers/elevated/technicians/list.rs - GET /api/admin/techniciens handler

use axum::extract::{Extension, State};

use crate::app::AppState;
use crate::database::Technician;
use crate::middleware::{AdminUser, ApiResponse, ApiResult};

/// GET /api/admin/techniciens - Full roster, every column, ordered by code
pub async fn technician_list(
    State(state): State<AppState>,
    Extension(AdminUser(admin)): Extension<AdminUser>,
) -> ApiResult<Vec<Technician>> {
    let technicians = state.technicians.list().await?;
    tracing::debug!("Admin {} listed {} technicians", admin.id, technicians.len());
    Ok(ApiResponse::success(technicians))
}
