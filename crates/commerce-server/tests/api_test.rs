//! End-to-end API tests over the full app: routing, auth middleware,
//! permission checks, and the order workflow.
//!
//! File-backed temp databases for the same reason as the storage
//! tests — in-memory SQLite is per-connection.

use actix_web::{test, web, App};
use serde_json::{json, Value};
use tempfile::TempDir;

use commerce_core::traits::storage::catalog::{ICatalogStore, NewProduct};
use commerce_core::traits::storage::identity::{IIdentityStore, NewUser};
use commerce_server::auth::AuthMiddleware;
use commerce_storage::CommerceStorageEngine;

fn temp_store() -> (TempDir, web::Data<CommerceStorageEngine>) {
    let dir = TempDir::new().unwrap();
    let engine = CommerceStorageEngine::open(&dir.path().join("test.db")).unwrap();
    (dir, web::Data::new(engine))
}

/// Create a user directly in the store and return (user_id, token).
fn seed_identity(store: &CommerceStorageEngine, username: &str, is_staff: bool) -> (i64, String) {
    let salt = commerce_server::identity::new_salt();
    let user = store
        .create_user(&NewUser {
            username: username.to_string(),
            email: format!("{username}@example.com"),
            password_hash: commerce_server::identity::hash_password("password", &salt),
            password_salt: salt,
            is_staff,
            is_superuser: is_staff,
        })
        .unwrap();
    let token = store
        .get_or_create_token(user.id, &commerce_server::identity::new_token_key())
        .unwrap();
    (user.id, token.key)
}

fn seed_product(store: &CommerceStorageEngine, name: &str, price: &str, created_by: i64) -> i64 {
    store
        .insert_product(&NewProduct {
            name: name.to_string(),
            description: format!("{name} description"),
            price: price.parse().unwrap(),
            stock: 10,
            image: None,
            category: None,
            created_by,
        })
        .unwrap()
        .id
}

macro_rules! app {
    ($data:expr) => {
        test::init_service(
            App::new()
                .app_data($data.clone())
                .wrap(AuthMiddleware)
                .configure(commerce_server::configure),
        )
        .await
    };
}

#[actix_web::test]
async fn register_then_login_reuses_token() {
    let (_dir, data) = temp_store();
    let app = app!(data);

    let resp = test::call_service(
        &app,
        test::TestRequest::post()
            .uri("/register/")
            .set_json(json!({"username": "u1", "email": "u1@example.com", "password": "p"}))
            .to_request(),
    )
    .await;
    assert_eq!(resp.status(), 201);
    let body: Value = test::read_body_json(resp).await;
    let token = body["token"].as_str().unwrap().to_string();
    assert!(!token.is_empty());

    let resp = test::call_service(
        &app,
        test::TestRequest::post()
            .uri("/login/")
            .set_json(json!({"username": "u1", "password": "p"}))
            .to_request(),
    )
    .await;
    assert_eq!(resp.status(), 200);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["token"].as_str().unwrap(), token);
}

#[actix_web::test]
async fn duplicate_username_registration_rejected() {
    let (_dir, data) = temp_store();
    let app = app!(data);

    let register = |username: &str| {
        test::TestRequest::post()
            .uri("/register/")
            .set_json(json!({"username": username, "email": "", "password": "p"}))
            .to_request()
    };

    let resp = test::call_service(&app, register("u1")).await;
    assert_eq!(resp.status(), 201);

    let resp = test::call_service(&app, register("u1")).await;
    assert_eq!(resp.status(), 400);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["code"], "VALIDATION_ERROR");
}

#[actix_web::test]
async fn login_with_bad_credentials_unauthorized() {
    let (_dir, data) = temp_store();
    seed_identity(&data, "u1", false);
    let app = app!(data);

    let resp = test::call_service(
        &app,
        test::TestRequest::post()
            .uri("/login/")
            .set_json(json!({"username": "u1", "password": "wrong"}))
            .to_request(),
    )
    .await;
    assert_eq!(resp.status(), 401);
}

#[actix_web::test]
async fn category_read_open_write_gated() {
    let (_dir, data) = temp_store();
    let (_, staff_token) = seed_identity(&data, "admin", true);
    let app = app!(data);

    // Unauthenticated read succeeds
    let resp = test::call_service(
        &app,
        test::TestRequest::get().uri("/categories/").to_request(),
    )
    .await;
    assert_eq!(resp.status(), 200);

    // Unauthenticated write rejected
    let resp = test::call_service(
        &app,
        test::TestRequest::post()
            .uri("/categories/")
            .set_json(json!({"name": "Electronics"}))
            .to_request(),
    )
    .await;
    assert_eq!(resp.status(), 401);

    // Staff write succeeds and the exact name persists
    let resp = test::call_service(
        &app,
        test::TestRequest::post()
            .uri("/categories/")
            .insert_header(("Authorization", format!("Token {staff_token}")))
            .set_json(json!({"name": "Electronics"}))
            .to_request(),
    )
    .await;
    assert_eq!(resp.status(), 201);

    let resp = test::call_service(
        &app,
        test::TestRequest::get().uri("/categories/").to_request(),
    )
    .await;
    let body: Value = test::read_body_json(resp).await;
    let names: Vec<&str> = body
        .as_array()
        .unwrap()
        .iter()
        .map(|c| c["name"].as_str().unwrap())
        .collect();
    assert_eq!(names, vec!["Electronics"]);
}

#[actix_web::test]
async fn non_staff_write_forbidden() {
    let (_dir, data) = temp_store();
    let (_, user_token) = seed_identity(&data, "plain", false);
    let app = app!(data);

    let resp = test::call_service(
        &app,
        test::TestRequest::post()
            .uri("/categories/")
            .insert_header(("Authorization", format!("Token {user_token}")))
            .set_json(json!({"name": "Books"}))
            .to_request(),
    )
    .await;
    assert_eq!(resp.status(), 403);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["code"], "FORBIDDEN");
}

#[actix_web::test]
async fn product_create_and_search() {
    let (_dir, data) = temp_store();
    let (_, staff_token) = seed_identity(&data, "admin", true);
    let app = app!(data);

    let resp = test::call_service(
        &app,
        test::TestRequest::post()
            .uri("/products/")
            .insert_header(("Authorization", format!("Token {staff_token}")))
            .set_json(json!({
                "name": "Laptop",
                "description": "Lightweight laptop for professionals.",
                "price": "999.99",
                "stock": 5
            }))
            .to_request(),
    )
    .await;
    assert_eq!(resp.status(), 201);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["price"], "999.99");

    let resp = test::call_service(
        &app,
        test::TestRequest::get()
            .uri("/products/?search=laptop")
            .to_request(),
    )
    .await;
    assert_eq!(resp.status(), 200);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body.as_array().unwrap().len(), 1);

    let resp = test::call_service(
        &app,
        test::TestRequest::get()
            .uri("/products/?search=nomatch")
            .to_request(),
    )
    .await;
    let body: Value = test::read_body_json(resp).await;
    assert!(body.as_array().unwrap().is_empty());
}

#[actix_web::test]
async fn negative_price_rejected() {
    let (_dir, data) = temp_store();
    let (_, staff_token) = seed_identity(&data, "admin", true);
    let app = app!(data);

    let resp = test::call_service(
        &app,
        test::TestRequest::post()
            .uri("/products/")
            .insert_header(("Authorization", format!("Token {staff_token}")))
            .set_json(json!({"name": "Bad", "description": "", "price": "-1.00", "stock": 1}))
            .to_request(),
    )
    .await;
    assert_eq!(resp.status(), 400);
}

#[actix_web::test]
async fn order_create_collapses_duplicate_products() {
    let (_dir, data) = temp_store();
    let (user_id, token) = seed_identity(&data, "buyer", false);
    let p1 = seed_product(&data, "P1", "10.00", user_id);
    let p2 = seed_product(&data, "P2", "20.00", user_id);
    let app = app!(data);

    let resp = test::call_service(
        &app,
        test::TestRequest::post()
            .uri("/orders/")
            .insert_header(("Authorization", format!("Token {token}")))
            .set_json(json!({"user": user_id, "products": [p1, p2, p2], "total_price": "30.00"}))
            .to_request(),
    )
    .await;
    assert_eq!(resp.status(), 201);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["products"], json!([p1, p2]));
    assert_eq!(body["total_price"], "30.00");
    assert_eq!(body["user"], user_id);
}

#[actix_web::test]
async fn order_with_unknown_product_persists_nothing() {
    let (_dir, data) = temp_store();
    let (user_id, token) = seed_identity(&data, "buyer", false);
    let p1 = seed_product(&data, "P1", "10.00", user_id);
    let app = app!(data);

    let resp = test::call_service(
        &app,
        test::TestRequest::post()
            .uri("/orders/")
            .insert_header(("Authorization", format!("Token {token}")))
            .set_json(json!({"user": user_id, "products": [p1, 9999], "total_price": "10.00"}))
            .to_request(),
    )
    .await;
    assert_eq!(resp.status(), 400);

    let resp = test::call_service(&app, test::TestRequest::get().uri("/orders/").to_request())
        .await;
    let body: Value = test::read_body_json(resp).await;
    assert!(
        body.as_array().unwrap().is_empty(),
        "failed create must persist no order"
    );
}

#[actix_web::test]
async fn order_create_requires_authentication() {
    let (_dir, data) = temp_store();
    let (user_id, _) = seed_identity(&data, "buyer", false);
    let p1 = seed_product(&data, "P1", "10.00", user_id);
    let app = app!(data);

    let resp = test::call_service(
        &app,
        test::TestRequest::post()
            .uri("/orders/")
            .set_json(json!({"user": user_id, "products": [p1], "total_price": "10.00"}))
            .to_request(),
    )
    .await;
    assert_eq!(resp.status(), 401);

    // An unresolvable token is the same as no token
    let resp = test::call_service(
        &app,
        test::TestRequest::post()
            .uri("/orders/")
            .insert_header(("Authorization", "Token bogus"))
            .set_json(json!({"user": user_id, "products": [p1], "total_price": "10.00"}))
            .to_request(),
    )
    .await;
    assert_eq!(resp.status(), 401);
}

#[actix_web::test]
async fn unknown_ids_return_not_found() {
    let (_dir, data) = temp_store();
    let app = app!(data);

    for uri in ["/categories/42/", "/products/42/", "/orders/42/"] {
        let resp = test::call_service(&app, test::TestRequest::get().uri(uri).to_request()).await;
        assert_eq!(resp.status(), 404, "{uri}");
        let body: Value = test::read_body_json(resp).await;
        assert_eq!(body["code"], "NOT_FOUND");
    }
}

#[actix_web::test]
async fn order_update_replaces_products_staff_only() {
    let (_dir, data) = temp_store();
    let (staff_id, staff_token) = seed_identity(&data, "admin", true);
    let (_, user_token) = seed_identity(&data, "plain", false);
    let p1 = seed_product(&data, "P1", "10.00", staff_id);
    let p2 = seed_product(&data, "P2", "20.00", staff_id);
    let app = app!(data);

    let resp = test::call_service(
        &app,
        test::TestRequest::post()
            .uri("/orders/")
            .insert_header(("Authorization", format!("Token {staff_token}")))
            .set_json(json!({"user": staff_id, "products": [p1], "total_price": "10.00"}))
            .to_request(),
    )
    .await;
    assert_eq!(resp.status(), 201);
    let body: Value = test::read_body_json(resp).await;
    let order_id = body["id"].as_i64().unwrap();

    // Non-staff update forbidden
    let resp = test::call_service(
        &app,
        test::TestRequest::patch()
            .uri(&format!("/orders/{order_id}/"))
            .insert_header(("Authorization", format!("Token {user_token}")))
            .set_json(json!({"products": [p2]}))
            .to_request(),
    )
    .await;
    assert_eq!(resp.status(), 403);

    // Staff update replaces the association set
    let resp = test::call_service(
        &app,
        test::TestRequest::patch()
            .uri(&format!("/orders/{order_id}/"))
            .insert_header(("Authorization", format!("Token {staff_token}")))
            .set_json(json!({"products": [p2], "total_price": "20.00"}))
            .to_request(),
    )
    .await;
    assert_eq!(resp.status(), 200);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["products"], json!([p2]));
    assert_eq!(body["total_price"], "20.00");
}
