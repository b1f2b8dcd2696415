//! Single binary web server: competition API plus static assets.
//! Run with: cargo run --bin web
//! Listens on 0.0.0.0:8080 by default so the app is reachable via DNS on a VPS.
//! Override with env: HOST, PORT, STATIC_DIR, EVENT_BUFFER.

use actix_files::Files;
use actix_web::{middleware::Logger, web, App, HttpServer};
use competition_coordinator::{api, CompetitionStore, MemoryStore, ServerConfig};
use std::sync::Arc;

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    env_logger::init_from_env(env_logger::Env::new().default_filter_or("info"));

    let config = match ServerConfig::from_env() {
        Ok(config) => config,
        Err(e) => {
            log::error!("Invalid configuration: {}", e);
            return Err(std::io::Error::new(std::io::ErrorKind::InvalidInput, e));
        }
    };
    log::info!("Starting server at http://{}:{}", config.host, config.port);

    let store: Arc<dyn CompetitionStore> = Arc::new(MemoryStore::new(config.event_buffer));
    let state = web::Data::from(store);

    let static_dir = config.static_dir.clone();
    if static_dir.is_dir() {
        log::info!("Serving static assets from {}", static_dir.display());
    } else {
        log::warn!("Static directory {} not found; serving API only", static_dir.display());
    }

    HttpServer::new(move || {
        let static_dir = static_dir.clone();
        App::new()
            .wrap(Logger::default())
            .app_data(state.clone())
            .configure(api::configure)
            // Mounted at `/`, so it must come after the API routes.
            .configure(move |cfg| {
                if static_dir.is_dir() {
                    cfg.service(Files::new("/", static_dir).index_file("index.html"));
                }
            })
    })
    .bind((config.host.as_str(), config.port))?
    .run()
    .await
}
