use actix_web::{App, HttpServer, middleware::Logger};
use anyhow::Context;

use subshop_backend::{
    app::{access_gate, configure_app},
    config::Config,
    database::{create_pool, run_migrations},
    logging::init_json_logger,
    middlewares::create_cors,
    services::Services,
};

#[actix_web::main]
async fn main() -> anyhow::Result<()> {
    init_json_logger();

    let config = Config::from_toml()
        .map_err(|e| anyhow::anyhow!("{e}"))
        .context("Failed to load configuration")?;

    let pool = create_pool(&config.database)
        .await
        .context("Failed to create database connection pool")?;

    run_migrations(&pool)
        .await
        .context("Failed to run database migrations")?;

    let services = Services::new(pool, &config);
    if config.bot.notify_url.is_none() {
        log::warn!("BOT_NOTIFY_URL is not set, order notifications are disabled");
    }

    log::info!(
        "Starting HTTP server at {}:{}",
        config.server.host,
        config.server.port
    );

    HttpServer::new(move || {
        let services = services.clone();
        App::new()
            .wrap(access_gate(&services))
            .wrap(create_cors())
            .wrap(Logger::default())
            .configure(move |cfg| configure_app(cfg, &services))
    })
    .bind((config.server.host.as_str(), config.server.port))?
    .run()
    .await?;

    Ok(())
}
