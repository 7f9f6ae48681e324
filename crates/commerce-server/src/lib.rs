//! # commerce-server
//!
//! HTTP surface for the commerce backend. Thin actix-web handlers over
//! the storage engine: request validation, permission checks, and the
//! error → status mapping. No business logic lives here beyond that.

pub mod auth;
pub mod errors;
pub mod handlers;
pub mod identity;
pub mod models;

use actix_web::web;

/// Register every route on the app.
pub fn configure(cfg: &mut web::ServiceConfig) {
    handlers::auth_handlers::configure(cfg);
    handlers::category_handlers::configure(cfg);
    handlers::product_handlers::configure(cfg);
    handlers::order_handlers::configure(cfg);
}
