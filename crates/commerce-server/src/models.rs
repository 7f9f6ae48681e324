//! Request DTOs.
//!
//! Responses serialize the storage row types directly; only inbound
//! shapes live here. Update requests carry all-optional fields so PUT
//! and PATCH share one deserialization path.

use rust_decimal::Decimal;
use serde::Deserialize;

/// Create category request.
#[derive(Debug, Deserialize)]
pub struct CreateCategoryRequest {
    pub name: String,
}

/// Update category request.
#[derive(Debug, Deserialize)]
pub struct UpdateCategoryRequest {
    pub name: Option<String>,
}

/// Create product request. `created_by` comes from the authenticated
/// caller, not the body.
#[derive(Debug, Deserialize)]
pub struct CreateProductRequest {
    pub name: String,
    #[serde(default)]
    pub description: String,
    pub price: Decimal,
    pub stock: i64,
    pub image: Option<String>,
    pub category: Option<i64>,
}

/// Update product request.
#[derive(Debug, Deserialize)]
pub struct UpdateProductRequest {
    pub name: Option<String>,
    pub description: Option<String>,
    pub price: Option<Decimal>,
    pub stock: Option<i64>,
    pub image: Option<String>,
    pub category: Option<i64>,
}

/// Create order request: `{user, products: [id,...], total_price}`.
#[derive(Debug, Deserialize)]
pub struct CreateOrderRequest {
    pub user: i64,
    pub products: Vec<i64>,
    pub total_price: Decimal,
}

/// Update order request.
#[derive(Debug, Deserialize)]
pub struct UpdateOrderRequest {
    pub user: Option<i64>,
    pub products: Option<Vec<i64>>,
    pub total_price: Option<Decimal>,
}

/// Registration request.
#[derive(Debug, Deserialize)]
pub struct RegisterRequest {
    pub username: String,
    #[serde(default)]
    pub email: String,
    pub password: String,
}

/// Login request.
#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

/// Token issuance response body.
#[derive(Debug, serde::Serialize)]
pub struct TokenResponse {
    pub token: String,
}

/// List query parameters shared by the collection endpoints.
#[derive(Debug, Deserialize)]
pub struct ListQuery {
    pub search: Option<String>,
    pub ordering: Option<String>,
}

impl ListQuery {
    /// Convert to the storage-layer filter.
    pub fn to_filter(&self) -> commerce_core::traits::storage::catalog::ListFilter {
        commerce_core::traits::storage::catalog::ListFilter {
            search: self.search.clone(),
            ordering: self.ordering.clone(),
        }
    }
}
