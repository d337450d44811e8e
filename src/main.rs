use actix_cors::Cors;
use actix_web::{middleware::Logger, web, App, HttpServer};
use anyhow::{Context, Result};
use log::info;

use message_board::config::Config;
use message_board::databases::setup_backend;
use message_board::routes;

#[actix_web::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let config = Config::from_env()?;
    let pool = setup_backend(&config).await?;
    let db_pool = web::Data::new(pool);

    info!("Listening on http://{}:{}", config.host, config.port);

    HttpServer::new(move || {
        App::new()
            .wrap(Cors::permissive())
            .wrap(Logger::default())
            .app_data(db_pool.clone())
            .configure(routes::init)
            .default_service(web::to(routes::not_found))
    })
    .bind((config.host.as_str(), config.port))
    .with_context(|| format!("Failed to bind {}:{}", config.host, config.port))?
    .run()
    .await
    .context("HTTP server stopped with an error")
}
