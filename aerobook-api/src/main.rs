use std::net::SocketAddr;
use std::sync::Arc;

use aerobook_api::{app, AppState};
use aerobook_store::{app_config::Config, AmadeusClient, DbClient, PgBookingRepository};
use anyhow::Context;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "aerobook_api=debug,aerobook_booking=debug,aerobook_store=info,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = Config::load().context("Failed to load config")?;
    tracing::info!("Starting Aerobook API on port {}", config.server.port);

    let db = DbClient::new(&config.database)
        .await
        .context("Failed to connect to Postgres")?;
    db.migrate().await.context("Failed to run migrations")?;

    let supplier = AmadeusClient::new(&config.amadeus).context("Failed to build Amadeus client")?;
    tracing::info!("Using Amadeus at {}", config.amadeus.base_url);

    let app_state = AppState::new(
        Arc::new(supplier),
        Arc::new(PgBookingRepository::new(db.pool.clone())),
        config.booking.passenger_policy,
        config.traveler_defaults.clone(),
    );

    let app = app(app_state);

    let addr = SocketAddr::from(([0, 0, 0, 0], config.server.port));
    tracing::info!("Listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
