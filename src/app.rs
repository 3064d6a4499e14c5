/*
 * Responsibility
 * - tracing / panic hook の初期化
 * - Config読み込み → 依存生成 (PgPool, identity provider, transcription gateway) → Router 組み立て
 * - Middleware の適用 (CORS / request-id / trace / body limit / timeout)
 * - axum::serve() で起動
 */
use std::net::SocketAddr;
use std::{panic, process};

use anyhow::{Context, Result};
use axum::Router;
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

use crate::api;
use crate::api::handlers::fallback::not_found;
use crate::config::Config;
use crate::db;
use crate::middleware;
use crate::services::{auth::build_identity_provider, transcription::TranscriptionGateway};
use crate::state::AppState;

fn init_tracing() {
    // Prefer RUST_LOG if set; otherwise use a sensible default.
    // Ex:
    // RUST_LOG=info,voicescribe_pro=debug,tower_http=debug cargo run
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,voicescribe_pro=debug,tower_http=info"));

    let json = std::env::var("LOG_FORMAT")
        .map(|v| v.eq_ignore_ascii_case("json"))
        .unwrap_or(false);

    if json {
        tracing_subscriber::registry()
            .with(filter)
            .with(fmt::layer().json().with_target(true))
            .init();
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(fmt::layer().with_target(true))
            .init();
    }
}

fn init_panic_hook(abort_on_panic: bool) {
    // Keep the default hook as a fallback (prints to stderr with location/payload).
    let default_hook = panic::take_hook();

    panic::set_hook(Box::new(move |info| {
        // Always surface panics via tracing so they don't get "lost"
        // (stderr can be hidden depending on how the process is launched.)
        tracing::error!(?info, "panic");

        // In development, fail fast: crash the whole process so we notice immediately.
        if abort_on_panic {
            process::abort();
        } else {
            default_hook(info);
        }
    }))
}

pub async fn run() -> Result<()> {
    init_tracing();
    let config = Config::from_env()?;

    init_panic_hook(config.app_env.is_development());

    tracing::info!(
        "starting API in {:?} mode on {}",
        config.app_env,
        config.addr
    );

    let state = build_state(&config).await?;
    let app = build_router(state, &config);

    let listener = tokio::net::TcpListener::bind(config.addr)
        .await
        .with_context(|| format!("failed to bind {}", config.addr))?;

    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .with_graceful_shutdown(shutdown_signal())
    .await?;

    tracing::info!("server stopped");
    Ok(())
}

/// Build process-level services once and inject them into the shared state.
pub async fn build_state(config: &Config) -> Result<AppState> {
    let db = db::connect(config)
        .await
        .context("failed to connect to database")?;

    if config.app_env.is_development() {
        db::auto_migrate(&db)
            .await
            .context("database migration failed")?;
    }

    let identity = build_identity_provider(config)?;

    let transcription = TranscriptionGateway::new(config.transcription_base_url.clone());
    if !transcription.is_configured() {
        tracing::warn!(
            "INTERNAL_LOCAL_DOCKER_URL_BASE_PATH is not set; transcription requests will fail"
        );
    }

    Ok(AppState::new(
        db,
        identity,
        transcription,
        config.clerk.session_cookie_name.as_str(),
    ))
}

pub fn build_router(state: AppState, config: &Config) -> Router {
    let router = api::routes(state.clone())
        .fallback(not_found)
        .with_state(state);

    let router = middleware::http::apply(router, config);
    middleware::cors::apply(router, config)
}

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %err, "failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    tracing::info!("shutdown signal received");
}
