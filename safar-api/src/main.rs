use std::net::SocketAddr;
use std::sync::Arc;

use safar_api::{
    app,
    state::{AppState, AuthConfig},
};
use safar_store::{
    DbClient, PgBookingRepository, PgGuideAccountRepository, PgGuideRepository,
    PgTouristAccountRepository,
};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "safar_api=debug,tower_http=debug,axum::rejection=trace".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = safar_store::app_config::Config::load().expect("Failed to load config");
    tracing::info!("Starting Safar API on port {}", config.server.port);

    let db = DbClient::new(&config.database.url)
        .await
        .expect("Failed to connect to Postgres");
    db.migrate().await.expect("Failed to run migrations");

    let pool = db.pool.clone();
    let app_state = AppState {
        guide_accounts: Arc::new(PgGuideAccountRepository::new(pool.clone())),
        tourist_accounts: Arc::new(PgTouristAccountRepository::new(pool.clone())),
        guides: Arc::new(PgGuideRepository::new(pool.clone())),
        bookings: Arc::new(PgBookingRepository::new(pool)),
        auth: AuthConfig {
            secret: config.auth.jwt_secret.clone(),
            expiration: config.auth.token_expiration_seconds,
        },
    };

    let app = app(app_state);

    let addr = SocketAddr::from(([0, 0, 0, 0], config.server.port));
    tracing::info!("Listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await.unwrap();
    axum::serve(listener, app).await.unwrap();
}
