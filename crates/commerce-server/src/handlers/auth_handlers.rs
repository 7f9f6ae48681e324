//! Registration and login endpoints.

use actix_web::{post, web, HttpResponse};
use tracing::info;

use commerce_core::traits::storage::identity::NewUser;
use commerce_core::traits::storage::IIdentityStore;
use commerce_storage::CommerceStorageEngine;

use crate::errors::{ApiError, ApiResult};
use crate::identity::{hash_password, new_salt, new_token_key, verify_password};
use crate::models::{LoginRequest, RegisterRequest, TokenResponse};

/// Configure identity routes.
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(register).service(login);
}

/// Register a new user and hand out their token.
#[post("/register/")]
async fn register(
    store: web::Data<CommerceStorageEngine>,
    body: web::Json<RegisterRequest>,
) -> ApiResult<HttpResponse> {
    if body.username.trim().is_empty() {
        return Err(ApiError::ValidationError("username is required".to_string()));
    }
    if body.password.is_empty() {
        return Err(ApiError::ValidationError("password is required".to_string()));
    }
    if store.get_user_by_username(&body.username)?.is_some() {
        return Err(ApiError::ValidationError(
            "Username already exists".to_string(),
        ));
    }

    let salt = new_salt();
    let user = store.create_user(&NewUser {
        username: body.username.clone(),
        email: body.email.clone(),
        password_hash: hash_password(&body.password, &salt),
        password_salt: salt,
        is_staff: false,
        is_superuser: false,
    })?;
    let token = store.get_or_create_token(user.id, &new_token_key())?;

    info!(username = %user.username, "user registered");
    Ok(HttpResponse::Created().json(TokenResponse { token: token.key }))
}

/// Verify credentials and return the user's token. The same token is
/// returned on every successful login — issuance is idempotent.
#[post("/login/")]
async fn login(
    store: web::Data<CommerceStorageEngine>,
    body: web::Json<LoginRequest>,
) -> ApiResult<HttpResponse> {
    let Some(user) = store.get_user_by_username(&body.username)? else {
        return Err(ApiError::AuthenticationError);
    };
    if !verify_password(&body.password, &user.password_salt, &user.password_hash) {
        return Err(ApiError::AuthenticationError);
    }

    let token = store.get_or_create_token(user.id, &new_token_key())?;
    Ok(HttpResponse::Ok().json(TokenResponse { token: token.key }))
}
