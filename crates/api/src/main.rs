//! ShopSphere API - Product review backend.
//!
//! This binary serves the REST API on port 3000.
//!
//! # Architecture
//!
//! - Axum web framework with JSON envelopes
//! - `PostgreSQL` for users, catalog, and order history (read-mostly)
//! - `MongoDB` for reviews, review comments, and the activity log
//! - Stateless bearer tokens (HS256)
//!
//! Migrations and seeding are NOT run on startup. Use the CLI:
//! `cargo run -p shopsphere-cli -- migrate`.

#![cfg_attr(not(test), forbid(unsafe_code))]

use std::net::SocketAddr;
use std::sync::Arc;

use sentry::integrations::tracing as sentry_tracing;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use shopsphere_api::config::ApiConfig;
use shopsphere_api::db;
use shopsphere_api::routes;
use shopsphere_api::state::AppState;
use shopsphere_api::stores::Stores;
use shopsphere_api::stores::mongo::MongoStores;
use shopsphere_api::stores::postgres::PgRelationalStore;

/// Initialize Sentry error tracking and return guard that must be kept alive.
fn init_sentry(config: &ApiConfig) -> Option<sentry::ClientInitGuard> {
    let dsn = config.sentry_dsn.as_ref()?;

    let guard = sentry::init((
        dsn.as_str(),
        sentry::ClientOptions {
            release: sentry::release_name!(),
            environment: config
                .sentry_environment
                .clone()
                .map(std::borrow::Cow::Owned),
            sample_rate: config.sentry_sample_rate,
            traces_sample_rate: config.sentry_traces_sample_rate,
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
    let config = ApiConfig::from_env().expect("Failed to load configuration");

    // Initialize Sentry (must be done before tracing subscriber)
    let _sentry_guard = init_sentry(&config);

    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "shopsphere_api=info,tower_http=debug".into());

    // JSON logs when LOG_FORMAT=json, text otherwise
    let json_logs = std::env::var("LOG_FORMAT").is_ok_and(|v| v.eq_ignore_ascii_case("json"));
    let json_layer = json_logs.then(|| tracing_subscriber::fmt::layer().json().flatten_event(true));
    let text_layer = (!json_logs).then(tracing_subscriber::fmt::layer);

    tracing_subscriber::registry()
        .with(env_filter)
        .with(json_layer)
        .with(text_layer)
        .with(sentry_tracing::layer().event_filter(sentry_event_filter))
        .init();

    tracing::debug!(?config, "Configuration loaded");

    // Relational store
    let pool = db::create_pool(&config.database_url, config.store_timeout)
        .await
        .expect("Failed to create database pool");
    tracing::info!("Database pool created");

    // Document store
    let mongo = MongoStores::connect(
        &config.mongodb_uri,
        &config.mongodb_database,
        config.store_timeout,
    )
    .await
    .expect("Failed to connect to MongoDB");
    if let Err(e) = mongo.ensure_indexes().await {
        tracing::warn!(error = %e, "Failed to ensure MongoDB indexes");
    }
    tracing::info!(database = %config.mongodb_database, "MongoDB connected");

    let stores = Stores {
        relational: Arc::new(PgRelationalStore::new(pool, config.store_timeout)),
        reviews: Arc::new(mongo.review_store()),
        comments: Arc::new(mongo.comment_store()),
        activity: Arc::new(mongo.activity_store()),
    };
    let state = AppState::new(&config, stores);

    let app = routes::app(state)
        // Sentry layers (outermost for full request coverage)
        .layer(sentry_tower::NewSentryLayer::new_from_top())
        .layer(sentry_tower::SentryHttpLayer::new().enable_transaction());

    // Start server
    let addr = config.socket_addr();
    tracing::info!("shopsphere-api listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .expect("Failed to bind to address");

    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .with_graceful_shutdown(shutdown_signal())
    .await
    .expect("Server error");
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

    tracing::info!("Shutdown signal received, starting graceful shutdown");
}
