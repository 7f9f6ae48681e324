//! products table queries.

use commerce_core::errors::StorageError;
use commerce_core::traits::storage::catalog::{ListFilter, NewProduct, ProductPatch, ProductRow};
use rusqlite::{params, Connection, OptionalExtension};

use super::{decimal_col, sqe};

const PRODUCT_COLUMNS: &str =
    "id, name, description, price, stock, image, category_id, created_by, created_at, updated_at";

/// List products with substring search over name + description and
/// whitelisted ordering over price / stock.
pub fn list_products(
    conn: &Connection,
    filter: &ListFilter,
) -> Result<Vec<ProductRow>, StorageError> {
    let order = order_clause(filter.ordering.as_deref());
    let mut result = Vec::new();

    match &filter.search {
        Some(search) => {
            let like = format!("%{search}%");
            let sql = format!(
                "SELECT {PRODUCT_COLUMNS} FROM products
                 WHERE name LIKE ?1 OR description LIKE ?1 {order}"
            );
            let mut stmt = conn.prepare_cached(&sql).map_err(sqe)?;
            let rows = stmt.query_map(params![like], map_product_row).map_err(sqe)?;
            for row in rows {
                result.push(row.map_err(sqe)?);
            }
        }
        None => {
            let sql = format!("SELECT {PRODUCT_COLUMNS} FROM products {order}");
            let mut stmt = conn.prepare_cached(&sql).map_err(sqe)?;
            let rows = stmt.query_map([], map_product_row).map_err(sqe)?;
            for row in rows {
                result.push(row.map_err(sqe)?);
            }
        }
    }

    Ok(result)
}

/// Get a product by id.
pub fn get_product(conn: &Connection, id: i64) -> Result<Option<ProductRow>, StorageError> {
    let sql = format!("SELECT {PRODUCT_COLUMNS} FROM products WHERE id = ?1");
    let mut stmt = conn.prepare_cached(&sql).map_err(sqe)?;
    stmt.query_row(params![id], map_product_row)
        .optional()
        .map_err(sqe)
}

/// Insert a product and return the persisted row.
pub fn insert_product(conn: &Connection, product: &NewProduct) -> Result<ProductRow, StorageError> {
    if let Some(category_id) = product.category {
        let exists: Option<i64> = conn
            .query_row(
                "SELECT id FROM categories WHERE id = ?1",
                params![category_id],
                |row| row.get(0),
            )
            .optional()
            .map_err(sqe)?;
        if exists.is_none() {
            return Err(StorageError::not_found("category", category_id));
        }
    }

    conn.execute(
        "INSERT INTO products (name, description, price, stock, image, category_id, created_by)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
        params![
            product.name,
            product.description,
            product.price.to_string(),
            product.stock,
            product.image,
            product.category,
            product.created_by,
        ],
    )
    .map_err(sqe)?;

    let id = conn.last_insert_rowid();
    get_product(conn, id)?.ok_or_else(|| StorageError::not_found("product", id))
}

/// Apply a partial update. Unset patch fields keep their current value.
pub fn update_product(
    conn: &Connection,
    id: i64,
    patch: &ProductPatch,
) -> Result<ProductRow, StorageError> {
    let Some(current) = get_product(conn, id)? else {
        return Err(StorageError::not_found("product", id));
    };

    let name = patch.name.clone().unwrap_or(current.name);
    let description = patch.description.clone().unwrap_or(current.description);
    let price = patch.price.unwrap_or(current.price);
    let stock = patch.stock.unwrap_or(current.stock);
    let image = patch.image.clone().unwrap_or(current.image);
    let category = patch.category.unwrap_or(current.category);

    if let Some(category_id) = category {
        let exists: Option<i64> = conn
            .query_row(
                "SELECT id FROM categories WHERE id = ?1",
                params![category_id],
                |row| row.get(0),
            )
            .optional()
            .map_err(sqe)?;
        if exists.is_none() {
            return Err(StorageError::not_found("category", category_id));
        }
    }

    conn.execute(
        "UPDATE products
         SET name = ?1, description = ?2, price = ?3, stock = ?4, image = ?5,
             category_id = ?6, updated_at = datetime('now')
         WHERE id = ?7",
        params![
            name,
            description,
            price.to_string(),
            stock,
            image,
            category,
            id,
        ],
    )
    .map_err(sqe)?;

    get_product(conn, id)?.ok_or_else(|| StorageError::not_found("product", id))
}

/// Delete a product.
pub fn delete_product(conn: &Connection, id: i64) -> Result<(), StorageError> {
    let changed = conn
        .execute("DELETE FROM products WHERE id = ?1", params![id])
        .map_err(sqe)?;
    if changed == 0 {
        return Err(StorageError::not_found("product", id));
    }
    Ok(())
}

/// Whitelisted ORDER BY clauses. Unknown values fall back to id order,
/// matching the original API's silently-ignored ordering params.
fn order_clause(ordering: Option<&str>) -> &'static str {
    match ordering {
        Some("price") => "ORDER BY CAST(price AS REAL) ASC, id",
        Some("-price") => "ORDER BY CAST(price AS REAL) DESC, id",
        Some("stock") => "ORDER BY stock ASC, id",
        Some("-stock") => "ORDER BY stock DESC, id",
        _ => "ORDER BY id",
    }
}

/// Shared row mapper for product queries.
fn map_product_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<ProductRow> {
    Ok(ProductRow {
        id: row.get(0)?,
        name: row.get(1)?,
        description: row.get(2)?,
        price: decimal_col(row, 3)?,
        stock: row.get(4)?,
        image: row.get(5)?,
        category: row.get(6)?,
        created_by: row.get(7)?,
        created_at: row.get(8)?,
        updated_at: row.get(9)?,
    })
}
