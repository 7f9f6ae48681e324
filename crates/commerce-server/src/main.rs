//! commerce-server binary.

use std::io;
use std::path::Path;

use actix_web::{web, App, HttpServer};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use commerce_core::ServerConfig;
use commerce_server::auth::AuthMiddleware;
use commerce_storage::CommerceStorageEngine;

#[actix_web::main]
async fn main() -> io::Result<()> {
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
    let data = web::Data::new(engine);

    let addr = config.effective_bind_addr().to_string();
    info!(%addr, db = config.effective_database_path(), "starting commerce server");

    HttpServer::new(move || {
        App::new()
            .app_data(data.clone())
            .wrap(AuthMiddleware)
            .configure(commerce_server::configure)
    })
    .bind(addr)?
    .run()
    .await
}
