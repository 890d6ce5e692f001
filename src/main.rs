use actix_web::{
    middleware,
    web::{self, Data},
    App, HttpServer,
};
use log::info;
use sqlx::SqlitePool;

mod config;
mod db;
mod envelope;
mod errors;
mod routes;
mod structs;
mod utils;

use config::Config;

#[derive(Debug, Clone)]
pub struct AppState {
    db_pool: SqlitePool,
    users_list_include_passwords: bool,
}

impl AppState {
    pub fn new(db_pool: SqlitePool, config: &Config) -> Self {
        AppState {
            db_pool,
            users_list_include_passwords: config.users_list_include_passwords,
        }
    }
}

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    dotenvy::dotenv().ok();
    env_logger::init_from_env(env_logger::Env::new().default_filter_or("info"));

    let config = Config::from_env().map_err(|e| {
        log::error!("FATAL: {}", e);
        e
    })?;

    let db_pool = db::connect(&config).await.map_err(|e| {
        log::error!("FATAL: could not open database: {}", e);
        e
    })?;

    if config.users_list_include_passwords {
        log::warn!("Users list responses include stored passwords");
    }

    let state = AppState::new(db_pool, &config);

    info!(
        "Starting HTTP server on http://{}:{}/",
        config.host, config.port
    );

    HttpServer::new(move || {
        App::new()
            // enable logger - always register Actix Web Logger middleware last
            .wrap(middleware::Logger::default())
            .app_data(Data::new(state.clone()))
            .configure(routes::configure)
            .default_service(web::to(routes::not_found_handler))
    })
    .bind((config.host.as_str(), config.port))?
    .run()
    .await
}
