//! leaflet-server: HTTP API for Leaflet workspaces and pages.
//!
//! This crate provides:
//! - REST endpoints for accounts, workspaces, members, pages and favorites
//! - Token authentication and password hashing
//! - The use cases behind those endpoints, written against the repositories
//!   of `leaflet-store`
//!
//! # Architecture
//!
//! Handlers parse the request, call one use case and map its result. Use
//! cases enforce workspace membership and coordinate writes across the
//! user, workspace and page documents. The binary wires the router with:
//! - Request tracing and logging
//! - CORS handling
//! - Request ID generation
//! - JSON error responses

pub mod auth;
pub mod config;
pub mod error;
pub mod middleware;
pub mod routes;
pub mod state;
pub mod usecases;

// Re-exports for convenience
pub use config::{ConfigError, ServerConfig};
pub use error::{ApiError, ApiResult};
pub use state::AppState;
pub use usecases::{UseCaseError, UseCaseResult};

// Re-export dependent crates
pub use leaflet_core;
pub use leaflet_store;
