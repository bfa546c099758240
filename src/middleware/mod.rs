pub mod auth;
pub mod require_user;
pub mod response;
pub mod session_gate;

pub use auth::{resolve_principal_middleware, session_token, CurrentUser};
pub use require_user::{require_admin_middleware, require_user_middleware, AdminUser, AuthUser};
pub use response::{ApiResponse, ApiResult};
pub use session_gate::{session_gate_middleware, GateDecision};
