//! API Module
//!
//! HTTP handlers and routing for the catalog REST API.
//!
//! # Endpoints
//! - `GET /pokemon`, `GET /pokemon/all`, `GET /pokemon/:key`
//! - `PUT /filters`, `DELETE /filters`, `GET /filters/options`
//! - `PUT /page/:page`, `PUT /last-page`
//! - `GET /recent`, `DELETE /recent`
//! - `GET /stats`, `GET /health`

pub mod handlers;
pub mod routes;

pub use handlers::*;
pub use routes::create_router;
