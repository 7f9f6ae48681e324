//! Seed the database with sample data.
//!
//! Ensures a staff user exists, creates the fixed categories and
//! products, then twenty orders over them. Deterministic — safe to
//! inspect, not meant for production databases.

use std::io;
use std::path::Path;

use rust_decimal::Decimal;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use commerce_core::traits::storage::catalog::{ICatalogStore, ListFilter, NewProduct};
use commerce_core::traits::storage::identity::{IIdentityStore, NewUser};
use commerce_core::traits::storage::orders::IOrderStore;
use commerce_core::{ServerConfig, StorageError};
use commerce_server::identity::{hash_password, new_salt};
use commerce_storage::CommerceStorageEngine;

const CATEGORY_NAMES: [&str; 5] = ["Electronics", "Books", "Clothing", "Home & Kitchen", "Toys"];

const PRODUCT_DATA: [(&str, &str, &str); 10] = [
    ("Smartphone", "High-end smartphone with advanced features.", "699.99"),
    ("Laptop", "Lightweight laptop for professionals.", "999.99"),
    ("Headphones", "Noise-cancelling over-ear headphones.", "199.99"),
    ("Cookware Set", "Non-stick cookware set for your kitchen.", "89.99"),
    ("Desk Lamp", "LED desk lamp with adjustable brightness.", "29.99"),
    ("T-shirt", "Cotton t-shirt available in various sizes.", "19.99"),
    ("Book", "Bestselling novel by a renowned author.", "14.99"),
    ("Toy Car", "Remote-controlled toy car for kids.", "49.99"),
    ("Blender", "High-speed blender for smoothies and more.", "59.99"),
    ("Board Game", "Fun board game for the whole family.", "39.99"),
];

fn main() -> io::Result<()> {
    let config = ServerConfig::load("commerce.toml").map_err(io::Error::other)?;

    tracing_subscriber::registry()
        .with(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(config.effective_log_filter())),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let engine = CommerceStorageEngine::open(Path::new(config.effective_database_path()))
        .map_err(io::Error::other)?;

    seed(&engine).map_err(io::Error::other)?;
    info!("seeding completed");
    Ok(())
}

fn seed(engine: &CommerceStorageEngine) -> Result<(), StorageError> {
    // Staff user all seed rows hang off
    let admin = match engine.get_user_by_username("admin")? {
        Some(user) => user,
        None => {
            let salt = new_salt();
            let user = engine.create_user(&NewUser {
                username: "admin".to_string(),
                email: "admin@example.com".to_string(),
                password_hash: hash_password("password", &salt),
                password_salt: salt,
                is_staff: true,
                is_superuser: true,
            })?;
            info!(username = %user.username, "admin user created");
            user
        }
    };

    // Categories are get-or-create by name
    let existing = engine.list_categories(&ListFilter::default())?;
    for name in CATEGORY_NAMES {
        if !existing.iter().any(|c| c.name == name) {
            engine.insert_category(name)?;
            info!(category = name, "category created");
        }
    }
    let categories = engine.list_categories(&ListFilter::default())?;

    let mut products = Vec::with_capacity(PRODUCT_DATA.len());
    for (i, (name, description, price)) in PRODUCT_DATA.iter().enumerate() {
        let price: Decimal = price.parse().map_err(|e| StorageError::InvalidValue {
            field: "price",
            message: format!("{e}"),
        })?;
        let product = engine.insert_product(&NewProduct {
            name: (*name).to_string(),
            description: (*description).to_string(),
            price,
            stock: 10 + ((i as i64 * 17) % 91),
            image: Some(format!(
                "https://placehold.example/products/{}.png",
                name.to_lowercase().replace(' ', "-")
            )),
            category: Some(categories[i % categories.len()].id),
            created_by: admin.id,
        })?;
        info!(product = name, "product created");
        products.push(product);
    }

    for i in 0..20u64 {
        let count = 1 + (i as usize % 5);
        let selected: Vec<_> = (0..count)
            .map(|j| &products[(i as usize + j) % products.len()])
            .collect();
        let ids: Vec<i64> = selected.iter().map(|p| p.id).collect();
        let total: Decimal = selected.iter().map(|p| p.price).sum();

        let order = engine.create_order(admin.id, &ids, total)?;
        info!(order_id = order.id, %total, "order created");
    }

    Ok(())
}
