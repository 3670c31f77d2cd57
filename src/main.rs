use actix_web::middleware::NormalizePath;
use actix_web::web::Data;
use actix_web::{App, HttpServer};

#[cfg(test)]
#[macro_use]
mod test_support;

mod api;
mod config;
mod db;
mod docs;
mod error;
mod model;
mod routes;
mod store;
mod utils;

use config::Config;
use db::{ensure_schema, init_db};
use store::{MemoryStore, MySqlStore, Store};

use crate::docs::ApiDoc;
use tracing::{info, warn};
use tracing_appender::rolling;
use utoipa::OpenApi; // ← needed for ApiDoc::openapi()
use utoipa_swagger_ui::SwaggerUi;

#[actix_web::main]
async fn main() -> anyhow::Result<()> {
    let config = Config::from_env()?;

    // Rolling daily log
    let file_appender = rolling::daily(&config.log_dir, "app.log");
    let (non_blocking, _guard) = tracing_appender::non_blocking(file_appender);

    tracing_subscriber::fmt()
        .with_writer(non_blocking)
        .with_max_level(config.log_level)
        .with_ansi(false)
        .with_target(false) // removes module path
        .with_level(true)
        .with_thread_ids(false)
        .with_thread_names(false)
        .pretty()
        .init();

    info!(addr = %config.server_addr, prefix = %config.api_prefix, "Server starting...");

    match config.database_url.clone() {
        Some(url) => {
            let pool = init_db(&url).await?;
            ensure_schema(&pool).await?;
            info!("Using MySQL store");
            serve(MySqlStore::new(pool), config).await?;
        }
        None => {
            warn!("DATABASE_URL not set, data is kept in memory and lost on shutdown");
            serve(MemoryStore::new(), config).await?;
        }
    }

    Ok(())
}

async fn serve<S: Store>(store: S, config: Config) -> std::io::Result<()> {
    let store = Data::new(store);
    let server_addr = config.server_addr.clone();
    let config_data = Data::new(config);

    HttpServer::new(move || {
        let config = config_data.clone();
        App::new()
            .wrap(actix_web::middleware::Logger::default())
            .wrap(NormalizePath::trim())
            .service(
                SwaggerUi::new("/swagger-ui/{_:.*}") // ← important: wildcard {_:.*} to match JS/CSS files
                    .url("/api-doc/openapi.json", ApiDoc::openapi()),
            )
            .app_data(store.clone())
            .app_data(config.clone())
            .configure(|cfg| routes::configure::<S>(cfg, &config))
    })
    .bind(server_addr)?
    .run()
    .await
}
