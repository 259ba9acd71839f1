use std::time::Duration;

use sea_orm::Database;
use tracing::{info, warn};

use outpass_auth_types::identity::TokenSecret;
use outpass_core::tracing::init_tracing;
use outpass_service::config::OutpassConfig;
use outpass_service::router::build_router;
use outpass_service::state::AppState;
use outpass_service::usecase::notification::PurgeExpiredNotificationsUseCase;

#[tokio::main]
async fn main() {
    init_tracing("info");

    let config = OutpassConfig::from_env();

    let db = Database::connect(&config.database_url)
        .await
        .expect("failed to connect to database");

    let state = AppState {
        db,
        jwt_secret: TokenSecret::new(config.jwt_secret),
        notification_ttl: chrono::Duration::hours(config.notification_ttl_hours),
    };

    // Expired notification sweeper
    let purge_state = state.clone();
    let purge_every = Duration::from_secs(config.notification_purge_interval_secs);
    tokio::spawn(async move {
        let uc = PurgeExpiredNotificationsUseCase {
            repo: purge_state.notification_repo(),
        };
        let mut ticker = tokio::time::interval(purge_every);
        loop {
            ticker.tick().await;
            if let Err(e) = uc.execute().await {
                warn!(error = %e, "notification purge failed");
            }
        }
    });

    let router = build_router(state);
    let addr = format!("0.0.0.0:{}", config.outpass_port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .expect("failed to bind");

    info!("outpass service listening on {addr}");
    axum::serve(listener, router).await.expect("server error");
}
