//! `IOrderStore` trait — order rows plus their product associations.
//!
//! Maps to `commerce-storage/src/queries/orders.rs`. The create and
//! update operations are the only multi-statement writes in the system
//! and must commit the order row and its `order_products` pairs as one
//! transaction.

use rust_decimal::Decimal;
use serde::Serialize;

use crate::errors::StorageError;

use super::catalog::ListFilter;

// ─── Row Types ──────────────────────────────────────────────────────

/// An order record with its resolved product-id set.
#[derive(Debug, Clone, Serialize)]
pub struct OrderRow {
    pub id: i64,
    pub user: i64,
    pub products: Vec<i64>,
    pub total_price: Decimal,
    pub created_at: String,
}

/// Partial update of an order. `None` fields are left untouched.
/// A `Some(products)` replaces the association set wholesale.
#[derive(Debug, Clone, Default)]
pub struct OrderPatch {
    pub user: Option<i64>,
    pub products: Option<Vec<i64>>,
    pub total_price: Option<Decimal>,
}

// ─── Trait ───────────────────────────────────────────────────────────

/// Order storage operations.
///
/// Covers: `orders` table + `order_products` association table.
pub trait IOrderStore: Send + Sync {
    /// List orders with search over the owning username and associated
    /// product names, ordering over total_price / created_at.
    fn list_orders(&self, filter: &ListFilter) -> Result<Vec<OrderRow>, StorageError>;

    /// Get an order by id.
    fn get_order(&self, id: i64) -> Result<Option<OrderRow>, StorageError>;

    /// Create an order for `user_id` over the given product set.
    ///
    /// Every product id must resolve; duplicates collapse. The order
    /// row and its association pairs commit atomically — on any
    /// failure nothing is persisted. `total_price` is taken as given
    /// and never recomputed from the products.
    fn create_order(
        &self,
        user_id: i64,
        product_ids: &[i64],
        total_price: Decimal,
    ) -> Result<OrderRow, StorageError>;

    /// Apply a partial update; a product set in the patch replaces the
    /// existing association atomically. `NotFound` if the id does not
    /// exist.
    fn update_order(&self, id: i64, patch: &OrderPatch) -> Result<OrderRow, StorageError>;

    /// Delete an order and its association pairs. `NotFound` if the id
    /// does not exist.
    fn delete_order(&self, id: i64) -> Result<(), StorageError>;
}
