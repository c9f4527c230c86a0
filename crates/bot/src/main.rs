//! Hibiki bot - catalog watcher and announcer.
//!
//! This binary polls a Notion database of catalog entries, announces
//! genuinely-updated entries to a Discord channel, and serves:
//!
//! - `/` and `/health` - keep-alive endpoints for the hosting platform's
//!   uptime pinger
//! - `/interactions` - Discord's signed interaction webhook (slash
//!   commands and select menus)
//!
//! # Architecture
//!
//! - Axum web framework for the HTTP surface
//! - Notion query API for the catalog (read-only)
//! - Discord REST API for messages and commands (no gateway)
//! - A single background scheduler task driving sync cycles

#![cfg_attr(not(test), forbid(unsafe_code))]

use std::sync::Arc;

use axum::{Router, routing::get, routing::post};
use tower_http::trace::{DefaultOnResponse, OnResponse, TraceLayer};
use tracing::Span;

use hibiki_bot::cache::CacheStore;
use hibiki_bot::config::BotConfig;
use hibiki_bot::discord::{DiscordClient, application_commands, handle_interaction};
use hibiki_bot::notion::NotionClient;
use hibiki_bot::scheduler;
use hibiki_bot::state::AppState;
use hibiki_bot::sync::SyncEngine;

use sentry::integrations::tracing as sentry_tracing;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Initialize Sentry error tracking and return guard that must be kept alive.
fn init_sentry(config: &BotConfig) -> Option<sentry::ClientInitGuard> {
    let dsn = config.sentry_dsn.as_ref()?;

    let guard = sentry::init((
        dsn.as_str(),
        sentry::ClientOptions {
            release: sentry::release_name!(),
            environment: config
                .sentry_environment
                .clone()
                .map(std::borrow::Cow::Owned),
            attach_stacktrace: true,
            ..Default::default()
        },
    ));

    tracing::info!("Sentry initialized");
    Some(guard)
}

/// Filter tracing events to Sentry event types.
fn sentry_event_filter(metadata: &tracing::Metadata<'_>) -> sentry_tracing::EventFilter {
    match *metadata.level() {
        tracing::Level::ERROR | tracing::Level::WARN => sentry_tracing::EventFilter::Event,
        tracing::Level::INFO | tracing::Level::DEBUG => sentry_tracing::EventFilter::Breadcrumb,
        _ => sentry_tracing::EventFilter::Ignore,
    }
}

#[tokio::main]
async fn main() {
    // Load configuration from environment (needed for Sentry init)
    let config = BotConfig::from_env().expect("Failed to load configuration");

    // Initialize Sentry (must be done before tracing subscriber)
    let _sentry_guard = init_sentry(&config);

    // Initialize tracing with EnvFilter and Sentry integration
    // Defaults to info level for our crate if RUST_LOG is not set
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "hibiki_bot=info,tower_http=debug".into());

    // Use JSON format on the hosting platform for structured log parsing,
    // text format locally
    let is_hosted = std::env::var("RENDER").is_ok() || std::env::var("FLY_APP_NAME").is_ok();
    let json_layer = is_hosted.then(|| tracing_subscriber::fmt::layer().json().flatten_event(true));
    let text_layer = (!is_hosted).then(tracing_subscriber::fmt::layer);

    tracing_subscriber::registry()
        .with(env_filter)
        .with(json_layer)
        .with(text_layer)
        .with(sentry_tracing::layer().event_filter(sentry_event_filter))
        .init();

    // Build API clients
    let notion = NotionClient::new(&config.notion.token, config.notion.database_id.clone())
        .expect("Failed to create Notion client");
    let discord = DiscordClient::new(
        config.discord.bot_token.clone(),
        config.discord.application_id.clone(),
    );

    // Register slash commands (best-effort; lookups still work once a
    // previous deployment registered them)
    match discord.register_commands(&application_commands()).await {
        Ok(()) => tracing::info!("application commands registered"),
        Err(e) => tracing::error!(error = %e, "failed to register application commands"),
    }

    // Spawn the sync scheduler
    let cache = CacheStore::new(&config.cache_file);
    let engine = Arc::new(SyncEngine::new(
        notion.clone(),
        discord.clone(),
        cache,
        config.discord.channel_id.clone(),
        config.web_base_url.clone(),
    ));
    scheduler::spawn(engine, config.sync_interval);

    // Build router
    let state = AppState::new(config.clone(), notion, discord);
    let app = Router::new()
        .route("/", get(keep_alive))
        .route("/health", get(health))
        .route("/interactions", post(handle_interaction))
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(|request: &axum::http::Request<_>| {
                    tracing::info_span!(
                        "http_request",
                        method = %request.method(),
                        uri = %request.uri(),
                        status = tracing::field::Empty,
                        latency_ms = tracing::field::Empty,
                    )
                })
                .on_response(
                    |response: &axum::http::Response<_>,
                     latency: std::time::Duration,
                     span: &Span| {
                        span.record("status", response.status().as_u16());
                        span.record("latency_ms", latency.as_millis() as u64);
                        DefaultOnResponse::default().on_response(response, latency, span);
                    },
                ),
        )
        .with_state(state);

    // Start server
    let addr = config.socket_addr();
    tracing::info!("hibiki-bot listening on http://{}", addr);

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .expect("Failed to bind to address");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .expect("Server error");
}

/// Keep-alive endpoint for the hosting platform's uptime pinger.
async fn keep_alive() -> &'static str {
    "Hibiki is running"
}

/// Liveness health check endpoint.
///
/// Returns "ok" if the server is running. Does not check dependencies.
async fn health() -> &'static str {
    "ok"
}

/// Wait for shutdown signal (Ctrl+C or SIGTERM).
async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("Failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {},
        () = terminate => {},
    }
}
