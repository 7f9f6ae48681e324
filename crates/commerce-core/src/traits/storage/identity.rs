//! `IIdentityStore` trait — users and bearer tokens.
//!
//! Maps to `commerce-storage/src/queries/users.rs` + `queries/tokens.rs`.
//! Password hashing happens above this layer; the store only ever sees
//! hash + salt strings.

use serde::Serialize;

use crate::errors::StorageError;

// ─── Row Types ──────────────────────────────────────────────────────

/// A user record.
#[derive(Debug, Clone, Serialize)]
pub struct UserRow {
    pub id: i64,
    pub username: String,
    pub email: String,
    #[serde(skip_serializing)]
    pub password_hash: String,
    #[serde(skip_serializing)]
    pub password_salt: String,
    pub is_staff: bool,
    pub is_superuser: bool,
    pub created_at: String,
}

/// Fields for a new user row.
#[derive(Debug, Clone)]
pub struct NewUser {
    pub username: String,
    pub email: String,
    pub password_hash: String,
    pub password_salt: String,
    pub is_staff: bool,
    pub is_superuser: bool,
}

/// A bearer token record.
#[derive(Debug, Clone)]
pub struct TokenRow {
    pub key: String,
    pub user_id: i64,
}

// ─── Trait ───────────────────────────────────────────────────────────

/// User and token storage operations.
///
/// Covers: `users` table + `tokens` table.
pub trait IIdentityStore: Send + Sync {
    /// Insert a user. `Conflict` if the username is taken.
    fn create_user(&self, user: &NewUser) -> Result<UserRow, StorageError>;

    /// Get a user by id.
    fn get_user(&self, id: i64) -> Result<Option<UserRow>, StorageError>;

    /// Get a user by username.
    fn get_user_by_username(&self, username: &str) -> Result<Option<UserRow>, StorageError>;

    /// Get the user's token, issuing one with the given key if none
    /// exists yet. An existing token is returned unchanged, so the key
    /// handed out at registration is stable across logins.
    fn get_or_create_token(&self, user_id: i64, new_key: &str) -> Result<TokenRow, StorageError>;

    /// Resolve a token key to its owning user. `None` for unknown keys.
    fn resolve_token(&self, key: &str) -> Result<Option<UserRow>, StorageError>;
}
