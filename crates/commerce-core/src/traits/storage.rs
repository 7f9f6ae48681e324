//! Storage trait surface, one trait per concern.
//!
//! `commerce-storage` provides the single concrete implementation
//! (`CommerceStorageEngine`); callers go through these traits.

pub mod catalog;
pub mod identity;
pub mod orders;

pub use catalog::ICatalogStore;
pub use identity::IIdentityStore;
pub use orders::IOrderStore;
