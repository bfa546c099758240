// handlers/protected/mod.rs - Endpoints that require a resolved session
//
// Guarded by resolve_principal_middleware + require_user_middleware; every
// handler here receives an AuthUser extension.

pub mod auth;   // GET /api/auth/whoami
pub mod search; // GET /api/search?code=...

pub use search::search;
