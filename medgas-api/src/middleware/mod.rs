/// Middleware modules for the API server
///
/// - `security`: Security response headers
/// - `auth`: Session cookie authentication for the API and the pages
/// - `role_gate`: Per-route role allow-lists

pub mod auth;
pub mod role_gate;
pub mod security;
