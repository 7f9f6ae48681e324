//! Order HTTP handlers.
//!
//! Read access is open. Creating an order requires any authenticated
//! user; update and delete require staff. The original API shipped
//! conflicting permission variants here — this is the restrictive one.

use actix_web::{delete, get, patch, post, put, web, HttpResponse};

use commerce_core::traits::storage::orders::OrderPatch;
use commerce_core::traits::storage::IOrderStore;
use commerce_core::StorageError;
use commerce_storage::CommerceStorageEngine;

use crate::auth::AuthenticatedUser;
use crate::errors::{ApiError, ApiResult};
use crate::models::{CreateOrderRequest, ListQuery, UpdateOrderRequest};

/// Configure order routes.
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/orders")
            .service(list_orders)
            .service(create_order)
            .service(get_order)
            .service(put_order)
            .service(patch_order)
            .service(delete_order),
    );
}

/// List orders. Supports `search` over the owning username and
/// associated product names, `ordering` over total_price / created_at.
#[get("/")]
async fn list_orders(
    store: web::Data<CommerceStorageEngine>,
    query: web::Query<ListQuery>,
) -> ApiResult<HttpResponse> {
    let orders = store.list_orders(&query.to_filter())?;
    Ok(HttpResponse::Ok().json(orders))
}

/// Create an order. The order row and its product associations commit
/// atomically; an unknown product or user id persists nothing.
#[post("/")]
async fn create_order(
    store: web::Data<CommerceStorageEngine>,
    // any authenticated identity may create; extraction enforces 401
    _user: AuthenticatedUser,
    body: web::Json<CreateOrderRequest>,
) -> ApiResult<HttpResponse> {
    let order = store.create_order(body.user, &body.products, body.total_price)?;
    Ok(HttpResponse::Created().json(order))
}

/// Get an order by id.
#[get("/{id}/")]
async fn get_order(
    store: web::Data<CommerceStorageEngine>,
    path: web::Path<i64>,
) -> ApiResult<HttpResponse> {
    let id = path.into_inner();
    let order = store.get_order(id)?.ok_or(ApiError::OrderNotFound(id))?;
    Ok(HttpResponse::Ok().json(order))
}

#[put("/{id}/")]
async fn put_order(
    store: web::Data<CommerceStorageEngine>,
    user: AuthenticatedUser,
    path: web::Path<i64>,
    body: web::Json<UpdateOrderRequest>,
) -> ApiResult<HttpResponse> {
    update_order(store, user, path.into_inner(), body).await
}

#[patch("/{id}/")]
async fn patch_order(
    store: web::Data<CommerceStorageEngine>,
    user: AuthenticatedUser,
    path: web::Path<i64>,
    body: web::Json<UpdateOrderRequest>,
) -> ApiResult<HttpResponse> {
    update_order(store, user, path.into_inner(), body).await
}

/// Shared update path for PUT and PATCH. A supplied product list
/// replaces the association set atomically.
async fn update_order(
    store: web::Data<CommerceStorageEngine>,
    user: AuthenticatedUser,
    id: i64,
    body: web::Json<UpdateOrderRequest>,
) -> ApiResult<HttpResponse> {
    user.require_staff()?;
    if store.get_order(id)?.is_none() {
        return Err(ApiError::OrderNotFound(id));
    }

    let patch = OrderPatch {
        user: body.user,
        products: body.products.clone(),
        total_price: body.total_price,
    };
    let updated = store.update_order(id, &patch)?;
    Ok(HttpResponse::Ok().json(updated))
}

/// Delete an order.
#[delete("/{id}/")]
async fn delete_order(
    store: web::Data<CommerceStorageEngine>,
    user: AuthenticatedUser,
    path: web::Path<i64>,
) -> ApiResult<HttpResponse> {
    user.require_staff()?;
    let id = path.into_inner();
    store.delete_order(id).map_err(|e| match e {
        StorageError::NotFound { .. } => ApiError::OrderNotFound(id),
        other => ApiError::Storage(other),
    })?;
    Ok(HttpResponse::NoContent().finish())
}
