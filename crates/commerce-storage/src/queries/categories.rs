//! categories table queries.

use commerce_core::errors::StorageError;
use commerce_core::traits::storage::catalog::{CategoryRow, ListFilter};
use rusqlite::{params, Connection, OptionalExtension};

use super::sqe;

/// List categories, optionally filtered by name substring.
pub fn list_categories(
    conn: &Connection,
    filter: &ListFilter,
) -> Result<Vec<CategoryRow>, StorageError> {
    let mut result = Vec::new();

    match &filter.search {
        Some(search) => {
            let like = format!("%{search}%");
            let mut stmt = conn
                .prepare_cached(
                    "SELECT id, name, created_at, updated_at FROM categories
                     WHERE name LIKE ?1 ORDER BY id",
                )
                .map_err(sqe)?;
            let rows = stmt.query_map(params![like], map_category_row).map_err(sqe)?;
            for row in rows {
                result.push(row.map_err(sqe)?);
            }
        }
        None => {
            let mut stmt = conn
                .prepare_cached("SELECT id, name, created_at, updated_at FROM categories ORDER BY id")
                .map_err(sqe)?;
            let rows = stmt.query_map([], map_category_row).map_err(sqe)?;
            for row in rows {
                result.push(row.map_err(sqe)?);
            }
        }
    }

    Ok(result)
}

/// Get a category by id.
pub fn get_category(conn: &Connection, id: i64) -> Result<Option<CategoryRow>, StorageError> {
    let mut stmt = conn
        .prepare_cached("SELECT id, name, created_at, updated_at FROM categories WHERE id = ?1")
        .map_err(sqe)?;
    stmt.query_row(params![id], map_category_row)
        .optional()
        .map_err(sqe)
}

/// Insert a category and return the persisted row.
pub fn insert_category(conn: &Connection, name: &str) -> Result<CategoryRow, StorageError> {
    conn.execute("INSERT INTO categories (name) VALUES (?1)", params![name])
        .map_err(sqe)?;
    let id = conn.last_insert_rowid();
    get_category(conn, id)?.ok_or_else(|| StorageError::not_found("category", id))
}

/// Rename a category.
pub fn update_category(conn: &Connection, id: i64, name: &str) -> Result<CategoryRow, StorageError> {
    let changed = conn
        .execute(
            "UPDATE categories SET name = ?1, updated_at = datetime('now') WHERE id = ?2",
            params![name, id],
        )
        .map_err(sqe)?;
    if changed == 0 {
        return Err(StorageError::not_found("category", id));
    }
    get_category(conn, id)?.ok_or_else(|| StorageError::not_found("category", id))
}

/// Delete a category.
pub fn delete_category(conn: &Connection, id: i64) -> Result<(), StorageError> {
    let changed = conn
        .execute("DELETE FROM categories WHERE id = ?1", params![id])
        .map_err(sqe)?;
    if changed == 0 {
        return Err(StorageError::not_found("category", id));
    }
    Ok(())
}

/// Shared row mapper for category queries.
fn map_category_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<CategoryRow> {
    Ok(CategoryRow {
        id: row.get(0)?,
        name: row.get(1)?,
        created_at: row.get(2)?,
        updated_at: row.get(3)?,
    })
}
