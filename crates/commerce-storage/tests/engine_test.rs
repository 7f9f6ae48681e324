//! Engine integration tests — `CommerceStorageEngine` in isolation,
//! no HTTP involved.
//!
//! Uses file-backed temp directories because in-memory SQLite creates
//! isolated databases per connection (reads would not see writes).

use rust_decimal::Decimal;
use tempfile::TempDir;

use commerce_core::traits::storage::catalog::{ICatalogStore, ListFilter, NewProduct};
use commerce_core::traits::storage::identity::{IIdentityStore, NewUser};
use commerce_core::traits::storage::orders::{IOrderStore, OrderPatch};
use commerce_core::StorageError;
use commerce_storage::CommerceStorageEngine;

fn temp_engine() -> (TempDir, CommerceStorageEngine) {
    let dir = TempDir::new().unwrap();
    let db_path = dir.path().join("test.db");
    let engine = CommerceStorageEngine::open(&db_path).unwrap();
    (dir, engine)
}

fn seed_user(engine: &CommerceStorageEngine, username: &str) -> i64 {
    engine
        .create_user(&NewUser {
            username: username.to_string(),
            email: format!("{username}@example.com"),
            password_hash: "hash".to_string(),
            password_salt: "salt".to_string(),
            is_staff: false,
            is_superuser: false,
        })
        .unwrap()
        .id
}

fn seed_product(engine: &CommerceStorageEngine, name: &str, price: &str, created_by: i64) -> i64 {
    engine
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

#[test]
fn category_round_trip() {
    let (_dir, engine) = temp_engine();

    let created = engine.insert_category("Electronics").unwrap();
    assert_eq!(created.name, "Electronics");

    let listed = engine.list_categories(&ListFilter::default()).unwrap();
    assert_eq!(listed.len(), 1);
    assert_eq!(listed[0].name, "Electronics");

    let fetched = engine.get_category(created.id).unwrap().unwrap();
    assert_eq!(fetched.name, "Electronics");
}

#[test]
fn category_search_filters_by_name() {
    let (_dir, engine) = temp_engine();
    engine.insert_category("Electronics").unwrap();
    engine.insert_category("Books").unwrap();

    let filter = ListFilter {
        search: Some("lectro".to_string()),
        ordering: None,
    };
    let hits = engine.list_categories(&filter).unwrap();
    assert_eq!(hits.len(), 1);
    assert_eq!(hits[0].name, "Electronics");
}

#[test]
fn product_search_covers_name_and_description() {
    let (_dir, engine) = temp_engine();
    let user = seed_user(&engine, "creator");
    seed_product(&engine, "Laptop", "999.99", user);

    engine
        .insert_product(&NewProduct {
            name: "Headphones".to_string(),
            description: "Noise-cancelling, pairs with any laptop".to_string(),
            price: "199.99".parse().unwrap(),
            stock: 5,
            image: None,
            category: None,
            created_by: user,
        })
        .unwrap();

    let filter = ListFilter {
        search: Some("laptop".to_string()),
        ordering: None,
    };
    let hits = engine.list_products(&filter).unwrap();
    // LIKE is ASCII case-insensitive, so the name "Laptop" matches too;
    // the description hit is the one under test here.
    assert_eq!(hits.len(), 2);
    assert!(hits.iter().any(|p| p.name == "Headphones"));
}

#[test]
fn product_ordering_by_price() {
    let (_dir, engine) = temp_engine();
    let user = seed_user(&engine, "creator");
    seed_product(&engine, "Expensive", "999.99", user);
    seed_product(&engine, "Cheap", "9.99", user);
    seed_product(&engine, "Middle", "99.99", user);

    let filter = ListFilter {
        search: None,
        ordering: Some("price".to_string()),
    };
    let products = engine.list_products(&filter).unwrap();
    let names: Vec<&str> = products.iter().map(|p| p.name.as_str()).collect();
    assert_eq!(names, vec!["Cheap", "Middle", "Expensive"]);

    let filter = ListFilter {
        search: None,
        ordering: Some("-price".to_string()),
    };
    let products = engine.list_products(&filter).unwrap();
    let names: Vec<&str> = products.iter().map(|p| p.name.as_str()).collect();
    assert_eq!(names, vec!["Expensive", "Middle", "Cheap"]);
}

#[test]
fn order_persists_product_set_with_duplicates_collapsed() {
    let (_dir, engine) = temp_engine();
    let user = seed_user(&engine, "buyer");
    let p1 = seed_product(&engine, "P1", "10.00", user);
    let p2 = seed_product(&engine, "P2", "20.00", user);

    let order = engine
        .create_order(user, &[p1, p2, p2], "30.00".parse().unwrap())
        .unwrap();

    assert_eq!(order.user, user);
    assert_eq!(order.products, vec![p1, p2]);
    assert_eq!(order.total_price, Decimal::new(3000, 2));

    let fetched = engine.get_order(order.id).unwrap().unwrap();
    assert_eq!(fetched.products, vec![p1, p2]);
}

#[test]
fn order_with_unknown_product_persists_nothing() {
    let (_dir, engine) = temp_engine();
    let user = seed_user(&engine, "buyer");
    let p1 = seed_product(&engine, "P1", "10.00", user);

    let result = engine.create_order(user, &[p1, 9999], "10.00".parse().unwrap());
    assert!(matches!(
        result,
        Err(StorageError::NotFound {
            entity: "product",
            id: 9999
        })
    ));

    // Atomicity: no order row survived the failed association
    let orders = engine.list_orders(&ListFilter::default()).unwrap();
    assert!(orders.is_empty(), "failed create must persist no order row");
}

#[test]
fn order_with_empty_product_list_rejected() {
    let (_dir, engine) = temp_engine();
    let user = seed_user(&engine, "buyer");

    let result = engine.create_order(user, &[], "0.00".parse().unwrap());
    assert!(matches!(result, Err(StorageError::InvalidValue { .. })));
}

#[test]
fn order_for_unknown_user_rejected() {
    let (_dir, engine) = temp_engine();
    let user = seed_user(&engine, "creator");
    let p1 = seed_product(&engine, "P1", "10.00", user);

    let result = engine.create_order(4242, &[p1], "10.00".parse().unwrap());
    assert!(matches!(
        result,
        Err(StorageError::NotFound { entity: "user", .. })
    ));
}

#[test]
fn order_update_replaces_association_set() {
    let (_dir, engine) = temp_engine();
    let user = seed_user(&engine, "buyer");
    let p1 = seed_product(&engine, "P1", "10.00", user);
    let p2 = seed_product(&engine, "P2", "20.00", user);
    let p3 = seed_product(&engine, "P3", "30.00", user);

    let order = engine
        .create_order(user, &[p1, p2], "30.00".parse().unwrap())
        .unwrap();

    let patch = OrderPatch {
        user: None,
        products: Some(vec![p3]),
        total_price: Some("30.00".parse().unwrap()),
    };
    let updated = engine.update_order(order.id, &patch).unwrap();
    assert_eq!(updated.products, vec![p3]);

    let fetched = engine.get_order(order.id).unwrap().unwrap();
    assert_eq!(fetched.products, vec![p3]);
}

#[test]
fn order_total_is_stored_as_supplied() {
    // total_price is client-supplied and never recomputed; a mismatched
    // total persists verbatim.
    let (_dir, engine) = temp_engine();
    let user = seed_user(&engine, "buyer");
    let p1 = seed_product(&engine, "P1", "10.00", user);

    let order = engine
        .create_order(user, &[p1], "123.45".parse().unwrap())
        .unwrap();
    assert_eq!(order.total_price, Decimal::new(12345, 2));
}

#[test]
fn duplicate_username_conflicts_and_creates_nothing() {
    let (_dir, engine) = temp_engine();
    seed_user(&engine, "taken");

    let result = engine.create_user(&NewUser {
        username: "taken".to_string(),
        email: "other@example.com".to_string(),
        password_hash: "h".to_string(),
        password_salt: "s".to_string(),
        is_staff: false,
        is_superuser: false,
    });
    assert!(matches!(result, Err(StorageError::Conflict { .. })));
}

#[test]
fn token_issuance_is_idempotent() {
    let (_dir, engine) = temp_engine();
    let user = seed_user(&engine, "holder");

    let first = engine.get_or_create_token(user, "key-one").unwrap();
    assert_eq!(first.key, "key-one");

    // Second call offers a fresh key; the stored one wins
    let second = engine.get_or_create_token(user, "key-two").unwrap();
    assert_eq!(second.key, "key-one");

    let resolved = engine.resolve_token("key-one").unwrap().unwrap();
    assert_eq!(resolved.id, user);
    assert!(engine.resolve_token("key-two").unwrap().is_none());
}

#[test]
fn deleting_order_cascades_association_pairs() {
    let (_dir, engine) = temp_engine();
    let user = seed_user(&engine, "buyer");
    let p1 = seed_product(&engine, "P1", "10.00", user);

    let order = engine
        .create_order(user, &[p1], "10.00".parse().unwrap())
        .unwrap();
    engine.delete_order(order.id).unwrap();

    assert!(engine.get_order(order.id).unwrap().is_none());
    // The product itself survives
    assert!(engine.get_product(p1).unwrap().is_some());
}
