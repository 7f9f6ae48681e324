//! Password hashing and token key generation.
//!
//! Passwords are stored as salted BLAKE3 hashes (hex). Token keys are
//! opaque 32-hex-char strings; the store guarantees one per user.

use uuid::Uuid;

/// Hash a password with its salt.
pub fn hash_password(password: &str, salt: &str) -> String {
    let mut hasher = blake3::Hasher::new();
    hasher.update(salt.as_bytes());
    hasher.update(password.as_bytes());
    hasher.finalize().to_hex().to_string()
}

/// Verify a password against a stored hash + salt.
pub fn verify_password(password: &str, salt: &str, expected_hash: &str) -> bool {
    hash_password(password, salt) == expected_hash
}

/// Fresh random salt.
pub fn new_salt() -> String {
    Uuid::new_v4().simple().to_string()
}

/// Fresh opaque token key.
pub fn new_token_key() -> String {
    Uuid::new_v4().simple().to_string()
}
