//! orders table + order_products association queries.
//!
//! The multi-statement write paths here (insert + pair replacement) are
//! always called inside a transaction by the engine — never directly.

use commerce_core::errors::StorageError;
use commerce_core::traits::storage::catalog::ListFilter;
use commerce_core::traits::storage::orders::OrderRow;
use rusqlite::{params, Connection, OptionalExtension};
use rust_decimal::Decimal;

use super::{decimal_col, sqe};

/// Bare order row before the product set is attached.
struct OrderHeader {
    id: i64,
    user: i64,
    total_price: Decimal,
    created_at: String,
}

/// List orders. Search matches the owning username or any associated
/// product name; ordering is whitelisted over total_price / created_at.
pub fn list_orders(conn: &Connection, filter: &ListFilter) -> Result<Vec<OrderRow>, StorageError> {
    let order = order_clause(filter.ordering.as_deref());
    let mut headers = Vec::new();

    match &filter.search {
        Some(search) => {
            let like = format!("%{search}%");
            let sql = format!(
                "SELECT DISTINCT o.id, o.user_id, o.total_price, o.created_at
                 FROM orders o
                 JOIN users u ON u.id = o.user_id
                 LEFT JOIN order_products op ON op.order_id = o.id
                 LEFT JOIN products p ON p.id = op.product_id
                 WHERE u.username LIKE ?1 OR p.name LIKE ?1 {order}"
            );
            let mut stmt = conn.prepare_cached(&sql).map_err(sqe)?;
            let rows = stmt.query_map(params![like], map_order_header).map_err(sqe)?;
            for row in rows {
                headers.push(row.map_err(sqe)?);
            }
        }
        None => {
            let sql = format!(
                "SELECT o.id, o.user_id, o.total_price, o.created_at FROM orders o {order}"
            );
            let mut stmt = conn.prepare_cached(&sql).map_err(sqe)?;
            let rows = stmt.query_map([], map_order_header).map_err(sqe)?;
            for row in rows {
                headers.push(row.map_err(sqe)?);
            }
        }
    }

    let mut result = Vec::with_capacity(headers.len());
    for header in headers {
        let products = get_order_product_ids(conn, header.id)?;
        result.push(attach_products(header, products));
    }
    Ok(result)
}

/// Get an order by id, with its product-id set.
pub fn get_order(conn: &Connection, id: i64) -> Result<Option<OrderRow>, StorageError> {
    let mut stmt = conn
        .prepare_cached(
            "SELECT o.id, o.user_id, o.total_price, o.created_at FROM orders o WHERE o.id = ?1",
        )
        .map_err(sqe)?;
    let header = stmt
        .query_row(params![id], map_order_header)
        .optional()
        .map_err(sqe)?;

    match header {
        Some(header) => {
            let products = get_order_product_ids(conn, header.id)?;
            Ok(Some(attach_products(header, products)))
        }
        None => Ok(None),
    }
}

/// Verify every product id resolves. Fails on the first miss so the
/// enclosing transaction rolls back with nothing persisted.
pub fn ensure_products_exist(conn: &Connection, product_ids: &[i64]) -> Result<(), StorageError> {
    let mut stmt = conn
        .prepare_cached("SELECT id FROM products WHERE id = ?1")
        .map_err(sqe)?;
    for &product_id in product_ids {
        let found: Option<i64> = stmt
            .query_row(params![product_id], |row| row.get(0))
            .optional()
            .map_err(sqe)?;
        if found.is_none() {
            return Err(StorageError::not_found("product", product_id));
        }
    }
    Ok(())
}

/// Insert the bare order row, returning its id.
pub fn insert_order(
    conn: &Connection,
    user_id: i64,
    total_price: Decimal,
) -> Result<i64, StorageError> {
    conn.execute(
        "INSERT INTO orders (user_id, total_price) VALUES (?1, ?2)",
        params![user_id, total_price.to_string()],
    )
    .map_err(sqe)?;
    Ok(conn.last_insert_rowid())
}

/// Update the bare order row's user and total.
pub fn update_order_header(
    conn: &Connection,
    id: i64,
    user_id: i64,
    total_price: Decimal,
) -> Result<(), StorageError> {
    let changed = conn
        .execute(
            "UPDATE orders SET user_id = ?1, total_price = ?2 WHERE id = ?3",
            params![user_id, total_price.to_string(), id],
        )
        .map_err(sqe)?;
    if changed == 0 {
        return Err(StorageError::not_found("order", id));
    }
    Ok(())
}

/// Replace the association set with exactly the given product ids.
pub fn replace_order_products(
    conn: &Connection,
    order_id: i64,
    product_ids: &[i64],
) -> Result<(), StorageError> {
    conn.execute(
        "DELETE FROM order_products WHERE order_id = ?1",
        params![order_id],
    )
    .map_err(sqe)?;

    let mut stmt = conn
        .prepare_cached("INSERT OR IGNORE INTO order_products (order_id, product_id) VALUES (?1, ?2)")
        .map_err(sqe)?;
    for &product_id in product_ids {
        stmt.execute(params![order_id, product_id]).map_err(sqe)?;
    }
    Ok(())
}

/// Product ids associated with an order, ascending.
pub fn get_order_product_ids(conn: &Connection, order_id: i64) -> Result<Vec<i64>, StorageError> {
    let mut stmt = conn
        .prepare_cached(
            "SELECT product_id FROM order_products WHERE order_id = ?1 ORDER BY product_id",
        )
        .map_err(sqe)?;
    let rows = stmt
        .query_map(params![order_id], |row| row.get(0))
        .map_err(sqe)?;

    let mut result = Vec::new();
    for row in rows {
        result.push(row.map_err(sqe)?);
    }
    Ok(result)
}

/// Delete an order; association pairs cascade.
pub fn delete_order(conn: &Connection, id: i64) -> Result<(), StorageError> {
    let changed = conn
        .execute("DELETE FROM orders WHERE id = ?1", params![id])
        .map_err(sqe)?;
    if changed == 0 {
        return Err(StorageError::not_found("order", id));
    }
    Ok(())
}

/// Whitelisted ORDER BY clauses. Unknown values fall back to id order.
fn order_clause(ordering: Option<&str>) -> &'static str {
    match ordering {
        Some("total_price") => "ORDER BY CAST(o.total_price AS REAL) ASC, o.id",
        Some("-total_price") => "ORDER BY CAST(o.total_price AS REAL) DESC, o.id",
        Some("created_at") => "ORDER BY o.created_at ASC, o.id",
        Some("-created_at") => "ORDER BY o.created_at DESC, o.id",
        _ => "ORDER BY o.id",
    }
}

fn map_order_header(row: &rusqlite::Row<'_>) -> rusqlite::Result<OrderHeader> {
    Ok(OrderHeader {
        id: row.get(0)?,
        user: row.get(1)?,
        total_price: decimal_col(row, 2)?,
        created_at: row.get(3)?,
    })
}

fn attach_products(header: OrderHeader, products: Vec<i64>) -> OrderRow {
    OrderRow {
        id: header.id,
        user: header.user,
        products,
        total_price: header.total_price,
        created_at: header.created_at,
    }
}
