//! `ICatalogStore` trait — category and product CRUD operations.
//!
//! Maps to `commerce-storage/src/queries/categories.rs` + `queries/products.rs`.

use rust_decimal::Decimal;
use serde::Serialize;

use crate::errors::StorageError;

// ─── Row Types ──────────────────────────────────────────────────────

/// A category record.
#[derive(Debug, Clone, Serialize)]
pub struct CategoryRow {
    pub id: i64,
    pub name: String,
    pub created_at: String,
    pub updated_at: String,
}

/// A product record.
#[derive(Debug, Clone, Serialize)]
pub struct ProductRow {
    pub id: i64,
    pub name: String,
    pub description: String,
    pub price: Decimal,
    pub stock: i64,
    pub image: Option<String>,
    pub category: Option<i64>,
    pub created_by: i64,
    pub created_at: String,
    pub updated_at: String,
}

/// Fields for a new product row.
#[derive(Debug, Clone)]
pub struct NewProduct {
    pub name: String,
    pub description: String,
    pub price: Decimal,
    pub stock: i64,
    pub image: Option<String>,
    pub category: Option<i64>,
    pub created_by: i64,
}

/// Partial update of a product row. `None` fields are left untouched.
#[derive(Debug, Clone, Default)]
pub struct ProductPatch {
    pub name: Option<String>,
    pub description: Option<String>,
    pub price: Option<Decimal>,
    pub stock: Option<i64>,
    pub image: Option<Option<String>>,
    pub category: Option<Option<i64>>,
}

/// Listing filter: substring search plus a whitelisted ordering column
/// (leading `-` for descending).
#[derive(Debug, Clone, Default)]
pub struct ListFilter {
    pub search: Option<String>,
    pub ordering: Option<String>,
}

// ─── Trait ───────────────────────────────────────────────────────────

/// Category and product storage operations.
///
/// Covers: `categories` table + `products` table.
pub trait ICatalogStore: Send + Sync {
    // ── categories ──

    /// List categories, optionally filtered by name substring.
    fn list_categories(&self, filter: &ListFilter) -> Result<Vec<CategoryRow>, StorageError>;

    /// Get a category by id.
    fn get_category(&self, id: i64) -> Result<Option<CategoryRow>, StorageError>;

    /// Insert a category and return the persisted row.
    fn insert_category(&self, name: &str) -> Result<CategoryRow, StorageError>;

    /// Rename a category. `NotFound` if the id does not exist.
    fn update_category(&self, id: i64, name: &str) -> Result<CategoryRow, StorageError>;

    /// Delete a category. `NotFound` if the id does not exist.
    fn delete_category(&self, id: i64) -> Result<(), StorageError>;

    // ── products ──

    /// List products with search over name + description and ordering
    /// over price / stock.
    fn list_products(&self, filter: &ListFilter) -> Result<Vec<ProductRow>, StorageError>;

    /// Get a product by id.
    fn get_product(&self, id: i64) -> Result<Option<ProductRow>, StorageError>;

    /// Insert a product and return the persisted row. `NotFound` if the
    /// referenced category or creator does not exist.
    fn insert_product(&self, product: &NewProduct) -> Result<ProductRow, StorageError>;

    /// Apply a partial update. `NotFound` if the id does not exist.
    fn update_product(&self, id: i64, patch: &ProductPatch) -> Result<ProductRow, StorageError>;

    /// Delete a product. `NotFound` if the id does not exist.
    fn delete_product(&self, id: i64) -> Result<(), StorageError>;
}
