//! tokens table queries.

use commerce_core::errors::StorageError;
use commerce_core::traits::storage::identity::{TokenRow, UserRow};
use rusqlite::{params, Connection, OptionalExtension};

use super::sqe;

/// Get a user's token, if one has been issued.
pub fn get_token_by_user(conn: &Connection, user_id: i64) -> Result<Option<TokenRow>, StorageError> {
    let mut stmt = conn
        .prepare_cached("SELECT key, user_id FROM tokens WHERE user_id = ?1")
        .map_err(sqe)?;
    stmt.query_row(params![user_id], map_token_row)
        .optional()
        .map_err(sqe)
}

/// Get the user's token, inserting one with the given key if absent.
/// An existing token wins — the key handed out at registration stays
/// stable across logins.
pub fn get_or_create_token(
    conn: &Connection,
    user_id: i64,
    new_key: &str,
) -> Result<TokenRow, StorageError> {
    if let Some(token) = get_token_by_user(conn, user_id)? {
        return Ok(token);
    }

    conn.execute(
        "INSERT INTO tokens (key, user_id) VALUES (?1, ?2)",
        params![new_key, user_id],
    )
    .map_err(sqe)?;

    Ok(TokenRow {
        key: new_key.to_string(),
        user_id,
    })
}

/// Resolve a token key to its owning user.
pub fn resolve_token(conn: &Connection, key: &str) -> Result<Option<UserRow>, StorageError> {
    let mut stmt = conn
        .prepare_cached(
            "SELECT u.id, u.username, u.email, u.password_hash, u.password_salt,
                    u.is_staff, u.is_superuser, u.created_at
             FROM tokens t JOIN users u ON u.id = t.user_id
             WHERE t.key = ?1",
        )
        .map_err(sqe)?;

    stmt.query_row(params![key], |row| {
        Ok(UserRow {
            id: row.get(0)?,
            username: row.get(1)?,
            email: row.get(2)?,
            password_hash: row.get(3)?,
            password_salt: row.get(4)?,
            is_staff: row.get(5)?,
            is_superuser: row.get(6)?,
            created_at: row.get(7)?,
        })
    })
    .optional()
    .map_err(sqe)
}

/// Shared row mapper for token queries.
fn map_token_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<TokenRow> {
    Ok(TokenRow {
        key: row.get(0)?,
        user_id: row.get(1)?,
    })
}
