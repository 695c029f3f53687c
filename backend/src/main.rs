//! Recipe Catalog Backend
//!
//! HTTP API for authentication, recipe CRUD and category listing.
//!
//! ## Architecture
//!
//! - Routes: HTTP request handling and routing
//! - Services: Business logic
//! - Repositories: Store traits with PostgreSQL and in-memory implementations
//!
//! Pass `--in-memory` to run without a database.

use anyhow::{Context, Result};
use metrics_exporter_prometheus::PrometheusBuilder;
use recipe_catalog_backend::config::AppConfig;
use recipe_catalog_backend::{db, repositories::MemoryStore, routes, state::AppState};
use tokio::signal;
use tracing::{error, info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Where users and recipes are kept for this run
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum StoreMode {
    Postgres,
    InMemory,
}

impl StoreMode {
    fn from_args() -> Self {
        if std::env::args().skip(1).any(|arg| arg == "--in-memory") {
            StoreMode::InMemory
        } else {
            StoreMode::Postgres
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    init_tracing();

    let config = AppConfig::load().context("loading configuration")?;
    let production = AppConfig::is_production();

    info!(
        version = env!("CARGO_PKG_VERSION"),
        env = if production { "production" } else { "development" },
        "Starting Recipe Catalog Backend"
    );

    if production {
        check_production_config(&config)?;
    }

    let state = build_state(config.clone(), StoreMode::from_args(), production).await?;
    let state = match PrometheusBuilder::new().install_recorder() {
        Ok(handle) => state.with_metrics(handle),
        Err(e) => {
            warn!(error = %e, "Metrics recorder unavailable; /metrics disabled");
            state
        }
    };

    let app = routes::create_router(state);

    let addr = format!("{}:{}", config.server.host, config.server.port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("binding {}", addr))?;
    info!(address = %addr, "Server listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Server stopped");
    Ok(())
}

async fn build_state(config: AppConfig, mode: StoreMode, production: bool) -> Result<AppState> {
    match mode {
        StoreMode::InMemory => {
            warn!("Using in-memory store; data is lost on exit");
            Ok(AppState::in_memory(config, MemoryStore::new()))
        }
        StoreMode::Postgres => {
            info!("Connecting to database...");
            let pool = db::create_pool(&config.database)
                .await
                .context("connecting to database")?;

            // Production schemas are migrated by a separate job
            if !production {
                db::run_migrations(&pool).await?;
            }

            Ok(AppState::new(pool, config))
        }
    }
}

fn init_tracing() {
    let default_filter = if AppConfig::is_production() {
        "recipe_catalog_backend=info,tower_http=info"
    } else {
        "recipe_catalog_backend=debug,tower_http=debug,sqlx=warn"
    };
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| default_filter.into());

    let registry = tracing_subscriber::registry().with(env_filter);

    if AppConfig::is_production() {
        registry.with(tracing_subscriber::fmt::layer().json()).init();
    } else {
        registry.with(tracing_subscriber::fmt::layer().pretty()).init();
    }
}

fn check_production_config(config: &AppConfig) -> Result<()> {
    if config.database.url.contains("localhost") || config.database.url.contains("127.0.0.1") {
        warn!("Database URL points at localhost");
    }

    let issues = config.production_issues();
    for issue in &issues {
        error!("Configuration error: {}", issue);
    }
    if !issues.is_empty() {
        anyhow::bail!("Refusing to start with {} configuration error(s)", issues.len());
    }

    Ok(())
}

/// Resolves on Ctrl+C or, on unix, SIGTERM
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            error!(error = %e, "Ctrl+C handler failed");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
            }
            Err(e) => {
                error!(error = %e, "SIGTERM handler failed");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => info!("Ctrl+C received, shutting down"),
        _ = terminate => info!("SIGTERM received, shutting down"),
    }
}
