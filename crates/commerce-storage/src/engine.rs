//! `CommerceStorageEngine` — unified storage engine implementing the
//! three commerce storage traits.
//!
//! Wraps `DatabaseManager` (read/write routing). All reads go through
//! `with_reader()`, all writes through `with_writer()`. This is the
//! single owner of both — no code outside this module should touch a
//! raw `&Connection` for commerce.db operations.

use std::path::Path;

use rust_decimal::Decimal;
use tracing::debug;

use commerce_core::errors::StorageError;
use commerce_core::traits::storage::catalog::{
    CategoryRow, ICatalogStore, ListFilter, NewProduct, ProductPatch, ProductRow,
};
use commerce_core::traits::storage::identity::{IIdentityStore, NewUser, TokenRow, UserRow};
use commerce_core::traits::storage::orders::{IOrderStore, OrderPatch, OrderRow};

use crate::connection::DatabaseManager;
use crate::queries;
use crate::queries::sqe;

/// The unified commerce storage engine.
///
/// Owns `DatabaseManager` (single write connection + read-on-demand)
/// and implements the storage traits from `commerce-core`.
pub struct CommerceStorageEngine {
    db: DatabaseManager,
}

impl CommerceStorageEngine {
    /// Open a file-backed storage engine at the given path.
    /// Runs migrations and applies pragmas.
    pub fn open(path: &Path) -> Result<Self, StorageError> {
        let db = DatabaseManager::open(path)?;
        Ok(Self { db })
    }

    /// Open an in-memory storage engine (for testing).
    pub fn open_in_memory() -> Result<Self, StorageError> {
        let db = DatabaseManager::open_in_memory()?;
        Ok(Self { db })
    }

    /// Database file path (None for in-memory).
    pub fn path(&self) -> Option<&Path> {
        self.db.path()
    }

    /// Dedupe a client-supplied product-id list into set form.
    /// Empty sets are rejected — an order must reference at least one
    /// product.
    fn product_id_set(product_ids: &[i64]) -> Result<Vec<i64>, StorageError> {
        let mut ids: Vec<i64> = product_ids.to_vec();
        ids.sort_unstable();
        ids.dedup();
        if ids.is_empty() {
            return Err(StorageError::InvalidValue {
                field: "products",
                message: "at least one product is required".to_string(),
            });
        }
        Ok(ids)
    }
}

// ─── ICatalogStore ──────────────────────────────────────────────────

impl ICatalogStore for CommerceStorageEngine {
    fn list_categories(&self, filter: &ListFilter) -> Result<Vec<CategoryRow>, StorageError> {
        self.db
            .with_reader(|conn| queries::categories::list_categories(conn, filter))
    }

    fn get_category(&self, id: i64) -> Result<Option<CategoryRow>, StorageError> {
        self.db
            .with_reader(|conn| queries::categories::get_category(conn, id))
    }

    fn insert_category(&self, name: &str) -> Result<CategoryRow, StorageError> {
        self.db
            .with_writer(|conn| queries::categories::insert_category(conn, name))
    }

    fn update_category(&self, id: i64, name: &str) -> Result<CategoryRow, StorageError> {
        self.db
            .with_writer(|conn| queries::categories::update_category(conn, id, name))
    }

    fn delete_category(&self, id: i64) -> Result<(), StorageError> {
        self.db
            .with_writer(|conn| queries::categories::delete_category(conn, id))
    }

    fn list_products(&self, filter: &ListFilter) -> Result<Vec<ProductRow>, StorageError> {
        self.db
            .with_reader(|conn| queries::products::list_products(conn, filter))
    }

    fn get_product(&self, id: i64) -> Result<Option<ProductRow>, StorageError> {
        self.db
            .with_reader(|conn| queries::products::get_product(conn, id))
    }

    fn insert_product(&self, product: &NewProduct) -> Result<ProductRow, StorageError> {
        self.db
            .with_writer(|conn| queries::products::insert_product(conn, product))
    }

    fn update_product(&self, id: i64, patch: &ProductPatch) -> Result<ProductRow, StorageError> {
        self.db
            .with_writer(|conn| queries::products::update_product(conn, id, patch))
    }

    fn delete_product(&self, id: i64) -> Result<(), StorageError> {
        self.db
            .with_writer(|conn| queries::products::delete_product(conn, id))
    }
}

// ─── IOrderStore ────────────────────────────────────────────────────

impl IOrderStore for CommerceStorageEngine {
    fn list_orders(&self, filter: &ListFilter) -> Result<Vec<OrderRow>, StorageError> {
        self.db
            .with_reader(|conn| queries::orders::list_orders(conn, filter))
    }

    fn get_order(&self, id: i64) -> Result<Option<OrderRow>, StorageError> {
        self.db
            .with_reader(|conn| queries::orders::get_order(conn, id))
    }

    fn create_order(
        &self,
        user_id: i64,
        product_ids: &[i64],
        total_price: Decimal,
    ) -> Result<OrderRow, StorageError> {
        let ids = Self::product_id_set(product_ids)?;

        self.db.with_writer(|conn| {
            let tx = conn.transaction().map_err(sqe)?;

            if queries::users::get_user(&tx, user_id)?.is_none() {
                return Err(StorageError::not_found("user", user_id));
            }
            queries::orders::ensure_products_exist(&tx, &ids)?;

            let order_id = queries::orders::insert_order(&tx, user_id, total_price)?;
            queries::orders::replace_order_products(&tx, order_id, &ids)?;
            let order = queries::orders::get_order(&tx, order_id)?
                .ok_or_else(|| StorageError::not_found("order", order_id))?;

            tx.commit().map_err(sqe)?;
            debug!(order_id, user_id, products = ids.len(), "order created");
            Ok(order)
        })
    }

    fn update_order(&self, id: i64, patch: &OrderPatch) -> Result<OrderRow, StorageError> {
        let ids = match &patch.products {
            Some(product_ids) => Some(Self::product_id_set(product_ids)?),
            None => None,
        };

        self.db.with_writer(|conn| {
            let tx = conn.transaction().map_err(sqe)?;

            let current = queries::orders::get_order(&tx, id)?
                .ok_or_else(|| StorageError::not_found("order", id))?;

            let user_id = patch.user.unwrap_or(current.user);
            if queries::users::get_user(&tx, user_id)?.is_none() {
                return Err(StorageError::not_found("user", user_id));
            }
            let total_price = patch.total_price.unwrap_or(current.total_price);

            queries::orders::update_order_header(&tx, id, user_id, total_price)?;
            if let Some(ids) = &ids {
                queries::orders::ensure_products_exist(&tx, ids)?;
                queries::orders::replace_order_products(&tx, id, ids)?;
            }
            let order = queries::orders::get_order(&tx, id)?
                .ok_or_else(|| StorageError::not_found("order", id))?;

            tx.commit().map_err(sqe)?;
            debug!(order_id = id, "order updated");
            Ok(order)
        })
    }

    fn delete_order(&self, id: i64) -> Result<(), StorageError> {
        self.db
            .with_writer(|conn| queries::orders::delete_order(conn, id))
    }
}

// ─── IIdentityStore ─────────────────────────────────────────────────

impl IIdentityStore for CommerceStorageEngine {
    fn create_user(&self, user: &NewUser) -> Result<UserRow, StorageError> {
        self.db
            .with_writer(|conn| queries::users::insert_user(conn, user))
    }

    fn get_user(&self, id: i64) -> Result<Option<UserRow>, StorageError> {
        self.db.with_reader(|conn| queries::users::get_user(conn, id))
    }

    fn get_user_by_username(&self, username: &str) -> Result<Option<UserRow>, StorageError> {
        self.db
            .with_reader(|conn| queries::users::get_user_by_username(conn, username))
    }

    fn get_or_create_token(&self, user_id: i64, new_key: &str) -> Result<TokenRow, StorageError> {
        // Goes through the writer so the check-then-insert is serialized.
        self.db
            .with_writer(|conn| queries::tokens::get_or_create_token(conn, user_id, new_key))
    }

    fn resolve_token(&self, key: &str) -> Result<Option<UserRow>, StorageError> {
        self.db
            .with_reader(|conn| queries::tokens::resolve_token(conn, key))
    }
}
