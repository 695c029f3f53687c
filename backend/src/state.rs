//! Application state management
//!
//! This module provides the shared application state that is passed
//! to all request handlers via Axum's state extraction.
//!
//! State is built once at startup and is read-only while serving: the
//! signing secret can only change by restarting the process.

use crate::auth::{JwtService, PasswordService};
use crate::config::AppConfig;
use crate::repositories::{CredentialStore, MemoryStore, PgStore, RecipeStore};
use metrics_exporter_prometheus::PrometheusHandle;
use secrecy::ExposeSecret;
use sqlx::PgPool;
use std::sync::Arc;

/// Shared application state
///
/// All fields are cheap to clone (`Arc` or `Copy`).
#[derive(Clone)]
pub struct AppState {
    /// User identities
    pub users: Arc<dyn CredentialStore>,
    /// Recipes and categories
    pub recipes: Arc<dyn RecipeStore>,
    /// Application configuration
    pub config: Arc<AppConfig>,
    /// Pre-initialized JWT service with cached keys
    pub jwt: JwtService,
    /// Password hashing settings
    pub passwords: PasswordService,
    /// Prometheus renderer, when a recorder is installed
    pub metrics: Option<PrometheusHandle>,
}

impl AppState {
    /// Create state backed by PostgreSQL
    pub fn new(db: PgPool, config: AppConfig) -> Self {
        let store = PgStore::new(db);
        Self::with_stores(Arc::new(store.clone()), Arc::new(store), config)
    }

    /// Create state backed by an in-memory store
    pub fn in_memory(config: AppConfig, store: MemoryStore) -> Self {
        Self::with_stores(Arc::new(store.clone()), Arc::new(store), config)
    }

    /// Create state from explicit stores
    ///
    /// Derives the JWT keys from the configured secret, so call this once
    /// at startup rather than per request.
    pub fn with_stores(
        users: Arc<dyn CredentialStore>,
        recipes: Arc<dyn RecipeStore>,
        config: AppConfig,
    ) -> Self {
        let jwt = JwtService::new(
            config.jwt.secret.expose_secret(),
            config.jwt.token_expiry_secs,
        );
        let passwords = PasswordService::from_config(&config.password);

        Self {
            users,
            recipes,
            config: Arc::new(config),
            jwt,
            passwords,
            metrics: None,
        }
    }

    /// Attach a Prometheus handle so `/metrics` can render it
    pub fn with_metrics(mut self, handle: PrometheusHandle) -> Self {
        self.metrics = Some(handle);
        self
    }

    /// Get a reference to the configuration
    #[inline]
    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    /// Get a reference to the JWT service
    #[inline]
    pub fn jwt(&self) -> &JwtService {
        &self.jwt
    }
}
