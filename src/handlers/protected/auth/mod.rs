// handlers/protected/auth/mod.rs - Session introspection

pub mod whoami; // GET /api/auth/whoami

pub use whoami::whoami;
