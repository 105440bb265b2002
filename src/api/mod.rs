//! API module for ADR Desk
//!
//! Routing, request handlers and the session extractor.

pub mod handlers;
pub mod middleware;
pub mod routes;

pub use routes::configure;
