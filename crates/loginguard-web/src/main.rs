mod api;
mod auth;
mod config;
mod dto;
mod error;
mod state;

use std::time::Duration;

use axum::http::{header, Method};
use tower_http::cors::CorsLayer;
use tower_http::limit::RequestBodyLimitLayer;
use tower_http::trace::TraceLayer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::config::ServerConfig;
use crate::state::AppState;

const TOKEN_SWEEP_INTERVAL: Duration = Duration::from_secs(60);

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                "loginguard_web=debug,loginguard_core=info,tower_http=debug".into()
            }),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = ServerConfig::load()?;
    let bind_addr = config.bind_addr;
    let evict_interval = config.evict_interval_seconds;
    let jwt_ttl = Duration::from_secs(config.auth.jwt_ttl_hours * 3600);

    tracing::info!(
        "Login limiter: {} failures per {} seconds",
        config.limiter.max_attempts,
        config.limiter.window_seconds
    );

    let state = AppState::new(config)?;

    // Idle tracker eviction
    if evict_interval > 0 {
        let limiter = state.limiter.clone();
        tokio::spawn(async move {
            let mut interval = tokio::time::interval(Duration::from_secs(evict_interval));
            loop {
                interval.tick().await;
                limiter.evict_idle();
            }
        });
    }

    // Revoked token cleanup, independent of tracker eviction
    let sweep_state = state.clone();
    tokio::spawn(async move {
        let mut interval = tokio::time::interval(TOKEN_SWEEP_INTERVAL);
        loop {
            interval.tick().await;
            sweep_state.sweep_revoked_tokens(jwt_ttl);
        }
    });

    // CORS: same-origin only by default (no cross-origin requests allowed)
    let cors = CorsLayer::new()
        .allow_methods([Method::GET, Method::POST])
        .allow_headers([header::CONTENT_TYPE, header::AUTHORIZATION]);

    let app = axum::Router::new()
        .nest("/api", api::auth_router())
        .layer(RequestBodyLimitLayer::new(64 * 1024))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state);

    let listener = tokio::net::TcpListener::bind(bind_addr).await?;
    tracing::info!("loginguard-web listening on http://{}", bind_addr);
    axum::serve(listener, app).await?;

    Ok(())
}
