use actix_web::{App, HttpServer, middleware::Logger, web};
use anyhow::Context;
use subshop_backend::{
    Config,
    bot::{BotState, relay::RelayState, relay::relay_config, run_dispatcher},
    database::create_pool,
    logging::init_json_logger,
    services::ActivationService,
};
use teloxide::Bot;

#[actix_web::main]
async fn main() -> anyhow::Result<()> {
    init_json_logger();

    let config = Config::from_toml().map_err(|e| anyhow::anyhow!("{e}"))?;
    if config.bot.token.is_empty() {
        anyhow::bail!("TELEGRAM_BOT_TOKEN is not set");
    }

    let pool = create_pool(&config.database)
        .await
        .context("Failed to connect to the database")?;
    log::info!("Bot connected to the database");

    let bot = Bot::new(config.bot.token.clone());
    let state = BotState::new(ActivationService::new(pool));
    let relay = web::Data::new(RelayState {
        bot: bot.clone(),
        secret_key: config.bot.secret_key.clone(),
    });

    let bind_addr = format!("{}:{}", config.bot.web_host, config.bot.web_port);
    log::info!("Notification relay listening on {bind_addr}");

    let server = HttpServer::new(move || {
        App::new()
            .app_data(relay.clone())
            .wrap(Logger::default())
            .configure(relay_config)
    })
    .bind(&bind_addr)
    .with_context(|| format!("Failed to bind {bind_addr}"))?
    .run();

    tokio::select! {
        res = server => res.context("Notification relay stopped")?,
        _ = run_dispatcher(bot, state) => log::info!("Bot dispatcher stopped"),
    }

    Ok(())
}
