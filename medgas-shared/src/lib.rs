//! # MedGas Shared Library
//!
//! Domain types, persistence and authentication used by the MedGas API
//! server.
//!
//! ## Module Organization
//!
//! - `models`: Row types and the SQL that reads and writes them
//! - `store`: The persistence gateway handlers talk to
//! - `db`: Connection pool and reference migrations
//! - `auth`: Passwords, session tokens and role allow-lists

pub mod auth;
pub mod db;
pub mod models;
pub mod store;

/// Current version of the MedGas shared library
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
