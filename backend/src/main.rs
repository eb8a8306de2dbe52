mod config;
mod error;
mod services;
mod state;
mod storage;
mod study;
#[cfg(test)]
mod testing;

use crate::config::Config;
use crate::state::AppState;
use actix_web::{middleware, web, App, HttpServer};
use env_logger::Env;
use log::info;

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    env_logger::init_from_env(Env::default().default_filter_or("info"));

    let config = Config::load().map_err(std::io::Error::other)?;
    let state = web::Data::new(AppState::from_config(&config).map_err(std::io::Error::other)?);

    info!("Server running at http://{}:{}", config.host, config.port);

    HttpServer::new(move || {
        App::new()
            .wrap(middleware::Logger::default())
            .app_data(state.clone())
            .configure(services::configure)
    })
    .bind((config.host.as_str(), config.port))?
    .run()
    .await
}
