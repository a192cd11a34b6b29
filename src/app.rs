/*
 * Responsibility
 * - Config 読み込み → 依存生成 → Router 組み立て
 * - Middleware の適用 (CORS / Bearer / policy guard / trace)
 * - axum::serve() で起動
 */
use std::sync::Arc;

use anyhow::Result;
use axum::Router;
use sqlx::postgres::PgPoolOptions;
use tower_http::trace::TraceLayer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::api::v1::routes;
use crate::config::Config;
use crate::middleware;
use crate::repos::credential_store::PgCredentialStore;
use crate::repos::owner_lookup::PgOwnerLookup;
use crate::services::auth::token::TokenCodec;
use crate::state::AppState;

fn init_tracing() {
    // Prefer RUST_LOG if set; otherwise use a sensible default.
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info,tower_http=info"));

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer())
        .init();
}

pub async fn run() -> Result<()> {
    init_tracing();
    let config = Config::from_env()?;

    tracing::info!(
        "starting API in {:?} mode on {}",
        config.app_env,
        config.addr
    );

    let state = build_state(&config).await?;
    let app = build_router(state, &config);

    let listener = tokio::net::TcpListener::bind(config.addr).await?;
    axum::serve(listener, app).await?;
    Ok(())
}

async fn build_state(config: &Config) -> Result<AppState> {
    let db = PgPoolOptions::new()
        .max_connections(5)
        .connect(&config.database_url)
        .await?;

    let tokens = TokenCodec::new(&config.auth_secret, config.token_ttl_seconds);
    let credentials = Arc::new(PgCredentialStore::new(db.clone()));
    let owners = Arc::new(PgOwnerLookup::new(db.clone()));

    Ok(AppState::new(
        db,
        tokens,
        credentials,
        owners,
        &config.bearer_prefix,
    ))
}

fn build_router(state: AppState, config: &Config) -> Router {
    let v1 = routes::router(state.clone());
    // Bearer verification wraps the whole v1 surface; the per-route policy
    // guard is already applied inside router() and runs after routing.
    let v1 = middleware::auth::access::apply(v1, state.clone());

    let app = Router::new()
        .nest(routes::NEST, v1)
        .with_state(state)
        .layer(TraceLayer::new_for_http());

    middleware::cors::apply(app, config)
}
