//! Product HTTP handlers.
//!
//! Read access is open; writes require a staff identity. `created_by`
//! always comes from the authenticated caller.

use actix_web::{delete, get, patch, post, put, web, HttpResponse};
use rust_decimal::Decimal;

use commerce_core::traits::storage::catalog::{NewProduct, ProductPatch};
use commerce_core::traits::storage::ICatalogStore;
use commerce_core::StorageError;
use commerce_storage::CommerceStorageEngine;

use crate::auth::AuthenticatedUser;
use crate::errors::{ApiError, ApiResult};
use crate::models::{CreateProductRequest, ListQuery, UpdateProductRequest};

/// Configure product routes.
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/products")
            .service(list_products)
            .service(create_product)
            .service(get_product)
            .service(put_product)
            .service(patch_product)
            .service(delete_product),
    );
}

/// List products. Supports `search` over name + description and
/// `ordering` over price / stock.
#[get("/")]
async fn list_products(
    store: web::Data<CommerceStorageEngine>,
    query: web::Query<ListQuery>,
) -> ApiResult<HttpResponse> {
    let products = store.list_products(&query.to_filter())?;
    Ok(HttpResponse::Ok().json(products))
}

/// Create a product.
#[post("/")]
async fn create_product(
    store: web::Data<CommerceStorageEngine>,
    user: AuthenticatedUser,
    body: web::Json<CreateProductRequest>,
) -> ApiResult<HttpResponse> {
    user.require_staff()?;
    validate_fields(Some(&body.name), Some(body.price), Some(body.stock))?;

    let product = store.insert_product(&NewProduct {
        name: body.name.clone(),
        description: body.description.clone(),
        price: body.price,
        stock: body.stock,
        image: body.image.clone(),
        category: body.category,
        created_by: user.id,
    })?;
    Ok(HttpResponse::Created().json(product))
}

/// Get a product by id.
#[get("/{id}/")]
async fn get_product(
    store: web::Data<CommerceStorageEngine>,
    path: web::Path<i64>,
) -> ApiResult<HttpResponse> {
    let id = path.into_inner();
    let product = store.get_product(id)?.ok_or(ApiError::ProductNotFound(id))?;
    Ok(HttpResponse::Ok().json(product))
}

#[put("/{id}/")]
async fn put_product(
    store: web::Data<CommerceStorageEngine>,
    user: AuthenticatedUser,
    path: web::Path<i64>,
    body: web::Json<UpdateProductRequest>,
) -> ApiResult<HttpResponse> {
    update_product(store, user, path.into_inner(), body).await
}

#[patch("/{id}/")]
async fn patch_product(
    store: web::Data<CommerceStorageEngine>,
    user: AuthenticatedUser,
    path: web::Path<i64>,
    body: web::Json<UpdateProductRequest>,
) -> ApiResult<HttpResponse> {
    update_product(store, user, path.into_inner(), body).await
}

/// Shared update path for PUT and PATCH.
async fn update_product(
    store: web::Data<CommerceStorageEngine>,
    user: AuthenticatedUser,
    id: i64,
    body: web::Json<UpdateProductRequest>,
) -> ApiResult<HttpResponse> {
    user.require_staff()?;
    if store.get_product(id)?.is_none() {
        return Err(ApiError::ProductNotFound(id));
    }

    validate_fields(body.name.as_deref(), body.price, body.stock)?;

    let patch = ProductPatch {
        name: body.name.clone(),
        description: body.description.clone(),
        price: body.price,
        stock: body.stock,
        image: body.image.clone().map(Some),
        category: body.category.map(Some),
    };
    let updated = store.update_product(id, &patch)?;
    Ok(HttpResponse::Ok().json(updated))
}

/// Delete a product.
#[delete("/{id}/")]
async fn delete_product(
    store: web::Data<CommerceStorageEngine>,
    user: AuthenticatedUser,
    path: web::Path<i64>,
) -> ApiResult<HttpResponse> {
    user.require_staff()?;
    let id = path.into_inner();
    store.delete_product(id).map_err(|e| match e {
        StorageError::NotFound { .. } => ApiError::ProductNotFound(id),
        other => ApiError::Storage(other),
    })?;
    Ok(HttpResponse::NoContent().finish())
}

/// Field validation shared by create and update. `None` means the
/// field was not supplied (legal for updates).
fn validate_fields(
    name: Option<&str>,
    price: Option<Decimal>,
    stock: Option<i64>,
) -> Result<(), ApiError> {
    if let Some(name) = name {
        if name.trim().is_empty() {
            return Err(ApiError::ValidationError("name is required".to_string()));
        }
    }
    if let Some(price) = price {
        if price.is_sign_negative() {
            return Err(ApiError::ValidationError(
                "price must be non-negative".to_string(),
            ));
        }
    }
    if let Some(stock) = stock {
        if stock < 0 {
            return Err(ApiError::ValidationError(
                "stock must be non-negative".to_string(),
            ));
        }
    }
    Ok(())
}
