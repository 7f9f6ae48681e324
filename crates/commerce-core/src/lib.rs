//! # commerce-core
//!
//! Foundation crate for the commerce backend.
//! Defines domain row types, storage traits, errors, and config.
//! Every other crate in the workspace depends on this.

pub mod config;
pub mod errors;
pub mod traits;

// Re-export the most commonly used types at the crate root.
pub use config::ServerConfig;
pub use errors::StorageError;
