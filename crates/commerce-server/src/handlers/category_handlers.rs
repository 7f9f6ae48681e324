//! Category HTTP handlers.
//!
//! Read access is open; writes require a staff identity.

use actix_web::{delete, get, patch, post, put, web, HttpResponse};

use commerce_core::traits::storage::ICatalogStore;
use commerce_core::StorageError;
use commerce_storage::CommerceStorageEngine;

use crate::auth::AuthenticatedUser;
use crate::errors::{ApiError, ApiResult};
use crate::models::{CreateCategoryRequest, ListQuery, UpdateCategoryRequest};

/// Configure category routes.
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/categories")
            .service(list_categories)
            .service(create_category)
            .service(get_category)
            .service(put_category)
            .service(patch_category)
            .service(delete_category),
    );
}

/// List categories, with optional name search.
#[get("/")]
async fn list_categories(
    store: web::Data<CommerceStorageEngine>,
    query: web::Query<ListQuery>,
) -> ApiResult<HttpResponse> {
    let categories = store.list_categories(&query.to_filter())?;
    Ok(HttpResponse::Ok().json(categories))
}

/// Create a category.
#[post("/")]
async fn create_category(
    store: web::Data<CommerceStorageEngine>,
    user: AuthenticatedUser,
    body: web::Json<CreateCategoryRequest>,
) -> ApiResult<HttpResponse> {
    user.require_staff()?;
    if body.name.trim().is_empty() {
        return Err(ApiError::ValidationError("name is required".to_string()));
    }

    let category = store.insert_category(&body.name)?;
    Ok(HttpResponse::Created().json(category))
}

/// Get a category by id.
#[get("/{id}/")]
async fn get_category(
    store: web::Data<CommerceStorageEngine>,
    path: web::Path<i64>,
) -> ApiResult<HttpResponse> {
    let id = path.into_inner();
    let category = store
        .get_category(id)?
        .ok_or(ApiError::CategoryNotFound(id))?;
    Ok(HttpResponse::Ok().json(category))
}

#[put("/{id}/")]
async fn put_category(
    store: web::Data<CommerceStorageEngine>,
    user: AuthenticatedUser,
    path: web::Path<i64>,
    body: web::Json<UpdateCategoryRequest>,
) -> ApiResult<HttpResponse> {
    update_category(store, user, path.into_inner(), body).await
}

#[patch("/{id}/")]
async fn patch_category(
    store: web::Data<CommerceStorageEngine>,
    user: AuthenticatedUser,
    path: web::Path<i64>,
    body: web::Json<UpdateCategoryRequest>,
) -> ApiResult<HttpResponse> {
    update_category(store, user, path.into_inner(), body).await
}

/// Shared update path for PUT and PATCH.
async fn update_category(
    store: web::Data<CommerceStorageEngine>,
    user: AuthenticatedUser,
    id: i64,
    body: web::Json<UpdateCategoryRequest>,
) -> ApiResult<HttpResponse> {
    user.require_staff()?;
    let current = store
        .get_category(id)?
        .ok_or(ApiError::CategoryNotFound(id))?;

    let name = body.name.clone().unwrap_or(current.name);
    if name.trim().is_empty() {
        return Err(ApiError::ValidationError("name is required".to_string()));
    }

    let updated = store.update_category(id, &name)?;
    Ok(HttpResponse::Ok().json(updated))
}

/// Delete a category.
#[delete("/{id}/")]
async fn delete_category(
    store: web::Data<CommerceStorageEngine>,
    user: AuthenticatedUser,
    path: web::Path<i64>,
) -> ApiResult<HttpResponse> {
    user.require_staff()?;
    let id = path.into_inner();
    store.delete_category(id).map_err(|e| match e {
        StorageError::NotFound { .. } => ApiError::CategoryNotFound(id),
        other => ApiError::Storage(other),
    })?;
    Ok(HttpResponse::NoContent().finish())
}
