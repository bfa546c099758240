// handlers/public/mod.rs - Endpoints reachable without a session

pub mod auth;   // POST /api/auth/login, POST /api/auth/logout
pub mod health; // GET /api/health

pub use health::health;
