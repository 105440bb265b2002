//! ADR Desk
//!
//! Main entry point for the ADR Desk API server.

use actix_cors::Cors;
use actix_web::{web, App, HttpServer};
use anyhow::{bail, Context};
use tracing::info;
use tracing_actix_web::TracingLogger;
use tracing_subscriber::EnvFilter;

use adr::{api, config, db, AppState};

fn init_tracing(json: bool) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let subscriber = tracing_subscriber::fmt().with_env_filter(filter);
    if json {
        subscriber.json().init();
    } else {
        subscriber.init();
    }
}

#[actix_web::main]
async fn main() -> anyhow::Result<()> {
    dotenv::dotenv().ok();

    // Load configuration
    let config = config::load_config().context("failed to load configuration")?;
    init_tracing(config.log.json);

    if config.session.secret.is_empty() {
        bail!("session secret is not configured; set ADR__SESSION__SECRET");
    }

    // Connect to database
    let database = db::Database::connect(&config.database)
        .await
        .context("failed to connect to database")?;

    // Run migrations
    database
        .run_migrations()
        .await
        .context("failed to run database migrations")?;

    // Create app state
    let app_state = web::Data::new(AppState::new(database, &config));

    let bind = (config.server.host.clone(), config.server.port);
    info!(host = %bind.0, port = bind.1, "starting HTTP server");

    // Start HTTP server
    HttpServer::new(move || {
        App::new()
            .app_data(app_state.clone())
            .wrap(Cors::permissive())
            .wrap(TracingLogger::default())
            .configure(api::configure)
    })
    .bind(bind)?
    .run()
    .await?;

    Ok(())
}
