//! # MedGas API Server Library
//!
//! HTTP surface of the cylinder tracking system: the JSON API under `/api`
//! and the server-rendered pages.
//!
//! ## Modules
//!
//! - `app`: Application state and router builder
//! - `config`: Configuration management
//! - `envelope`: Response envelopes shared by the handlers
//! - `error`: Error handling and HTTP response mapping
//! - `middleware`: Session, role gate and response headers
//! - `pages`: HTML pages
//! - `revalidate`: Stale-page announcements after writes
//! - `routes`: API route handlers

pub mod app;
pub mod config;
pub mod envelope;
pub mod error;
pub mod middleware;
pub mod pages;
pub mod revalidate;
pub mod routes;
