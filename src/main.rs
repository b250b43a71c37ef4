use std::sync::Arc;

use axum::Router;
use clap::Parser;
use tower::ServiceBuilder;
use tower_http::trace::TraceLayer;

use booking_engine::config::Config;
use booking_engine::store::Store;
use booking_engine::transport::HttpChatTransport;
use booking_engine::{logger, reminders, sweeper, web, AppState};

/// Single-master appointment-booking service.
#[derive(Debug, Parser)]
struct Cli {
    /// Run pending schema migrations and exit, without starting the server.
    #[arg(long)]
    migrate_only: bool,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    logger::init();

    let cli = Cli::parse();
    let config = Config::from_env()?;

    let store = Store::connect(&config.database_url).await?;
    store.run_migrations().await?;
    log::info!("database ready");

    if cli.migrate_only {
        return Ok(());
    }

    let transport = Arc::new(HttpChatTransport::new(config.transport_base_url.clone(), config.transport_bot_token.clone()));

    let sleeping_threshold_days = config.sleeping_threshold_days;
    let reactivation_cooldown_days = config.reactivation_cooldown_days;
    let bind_addr = config.bind_addr.clone();

    let state = Arc::new(AppState::new(store.clone(), transport.clone(), config));

    tokio::spawn(reminders::run_dispatcher(store.clone(), transport.clone()));
    tokio::spawn(sweeper::run_sweeper(store.clone(), transport.clone(), sleeping_threshold_days, reactivation_cooldown_days));

    let app: Router = Router::new()
        .merge(web::router())
        .nest("/admin", booking_engine::admin::routes::router())
        .layer(ServiceBuilder::new().layer(TraceLayer::new_for_http()))
        .with_state(state);

    log::info!("listening on {bind_addr}");
    let listener = tokio::net::TcpListener::bind(&bind_addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
