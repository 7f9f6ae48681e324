//! users table queries.

use commerce_core::errors::StorageError;
use commerce_core::traits::storage::identity::{NewUser, UserRow};
use rusqlite::{params, Connection, OptionalExtension};

use super::sqe;

const USER_COLUMNS: &str =
    "id, username, email, password_hash, password_salt, is_staff, is_superuser, created_at";

/// Insert a user. The UNIQUE index on username surfaces as `Conflict`.
pub fn insert_user(conn: &Connection, user: &NewUser) -> Result<UserRow, StorageError> {
    let inserted = conn.execute(
        "INSERT INTO users (username, email, password_hash, password_salt, is_staff, is_superuser)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
        params![
            user.username,
            user.email,
            user.password_hash,
            user.password_salt,
            user.is_staff as i64,
            user.is_superuser as i64,
        ],
    );

    match inserted {
        Ok(_) => {
            let id = conn.last_insert_rowid();
            get_user(conn, id)?.ok_or_else(|| StorageError::not_found("user", id))
        }
        Err(rusqlite::Error::SqliteFailure(e, _))
            if e.code == rusqlite::ErrorCode::ConstraintViolation =>
        {
            Err(StorageError::Conflict {
                message: format!("username already exists: {}", user.username),
            })
        }
        Err(e) => Err(sqe(e)),
    }
}

/// Get a user by id.
pub fn get_user(conn: &Connection, id: i64) -> Result<Option<UserRow>, StorageError> {
    let sql = format!("SELECT {USER_COLUMNS} FROM users WHERE id = ?1");
    let mut stmt = conn.prepare_cached(&sql).map_err(sqe)?;
    stmt.query_row(params![id], map_user_row)
        .optional()
        .map_err(sqe)
}

/// Get a user by username.
pub fn get_user_by_username(
    conn: &Connection,
    username: &str,
) -> Result<Option<UserRow>, StorageError> {
    let sql = format!("SELECT {USER_COLUMNS} FROM users WHERE username = ?1");
    let mut stmt = conn.prepare_cached(&sql).map_err(sqe)?;
    stmt.query_row(params![username], map_user_row)
        .optional()
        .map_err(sqe)
}

/// Shared row mapper for user queries.
fn map_user_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<UserRow> {
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
}
