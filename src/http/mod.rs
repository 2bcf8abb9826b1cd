//! HTTP server module
//!
//! This module handles HTTP request routing and handling:
//! - Axum router with the health and transcript endpoints
//! - Request handlers and JSON bodies
//! - Origin allow-list and CORS middleware
//! - Request logging

pub mod handlers;
pub mod middleware;
pub mod origin;
pub mod routes;

pub use routes::create_router;
