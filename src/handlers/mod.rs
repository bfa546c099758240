// handlers/mod.rs - 3-Tier Handler Architecture
//
// Public (no session) → Protected (session required) → Elevated (administrator required)
//
// The tier only decides which guards app::router stacks in front of a handler;
// handlers themselves trust the AuthUser / AdminUser extension they receive.
pub mod public;    // Tier 1: /api/health, /api/auth/login, /api/auth/logout
pub mod protected; // Tier 2: /api/search, /api/auth/whoami
pub mod elevated;  // Tier 3: /api/admin/techniciens/*
