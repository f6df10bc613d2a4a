//! API Module
//!
//! HTTP handlers and routing for the cache admin API.
//!
//! # Endpoints
//! - `PUT /cache/*key` - Write an entry
//! - `GET /cache/*key` - Look up an entry
//! - `DELETE /cache/*key` - Purge an entry
//! - `GET /stats` - Store statistics
//! - `GET /health` - Health check endpoint

pub mod handlers;
pub mod routes;

pub use handlers::*;
pub use routes::create_router;
