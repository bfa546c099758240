// handlers/elevated/mod.rs - Administrator-only endpoints
//
// Guarded by resolve_principal_middleware + require_admin_middleware. Writes go
// through the service-credential store, which bypasses row-level security, so
// nothing reaches these handlers without an AdminUser extension.

pub mod technicians; // /api/admin/techniciens/*
