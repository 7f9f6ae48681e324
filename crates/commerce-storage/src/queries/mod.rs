//! Per-table query modules.
//!
//! Each module owns the SQL for one table (plus the association table
//! for orders). All functions take `&Connection` so they compose under
//! a `Transaction`, which derefs to one.

pub mod categories;
pub mod orders;
pub mod products;
pub mod tokens;
pub mod users;

use commerce_core::errors::StorageError;
use rust_decimal::Decimal;

/// StorageError from anything displayable at the sqlite layer.
pub(crate) fn sqe(e: impl std::fmt::Display) -> StorageError {
    StorageError::SqliteError {
        message: e.to_string(),
    }
}

/// Read a decimal column stored as canonical TEXT.
pub(crate) fn decimal_col(row: &rusqlite::Row<'_>, idx: usize) -> rusqlite::Result<Decimal> {
    let text: String = row.get(idx)?;
    text.parse::<Decimal>().map_err(|e| {
        rusqlite::Error::FromSqlConversionFailure(idx, rusqlite::types::Type::Text, Box::new(e))
    })
}
