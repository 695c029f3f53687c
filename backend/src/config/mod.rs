//! Configuration management for the Recipe Catalog backend
//!
//! Configuration is loaded hierarchically:
//! 1. Default values (in code)
//! 2. TOML config files (config/development.toml or config/production.toml)
//! 3. Environment variables (prefix: RECIPES__)
//! 4. Plain `DATABASE_URL`, `JWT_SECRET` and `PORT` variables

use anyhow::Result;
use secrecy::{ExposeSecret, SecretString};
use serde::Deserialize;
use std::env;

/// Application configuration
#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub database: DatabaseConfig,
    pub jwt: JwtConfig,
    pub password: PasswordConfig,
    pub uploads: UploadConfig,
}

/// Server configuration
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    /// Requests still running after this are answered with 408
    pub request_timeout_secs: u64,
}

/// Database configuration
#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseConfig {
    pub url: String,
    pub max_connections: u32,
}

/// JWT configuration
///
/// The secret is only reachable through `ExposeSecret`, so it never shows
/// up in `Debug` output or logs.
#[derive(Debug, Clone, Deserialize)]
pub struct JwtConfig {
    pub secret: SecretString,
    pub token_expiry_secs: i64,
}

/// Password hashing algorithm used for new hashes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PasswordAlgorithm {
    Bcrypt,
    Argon2,
}

/// Password hashing configuration
#[derive(Debug, Clone, Deserialize)]
pub struct PasswordConfig {
    pub algorithm: PasswordAlgorithm,
    pub bcrypt_cost: u32,
}

/// Upload limits
#[derive(Debug, Clone, Deserialize)]
pub struct UploadConfig {
    pub max_body_bytes: usize,
}

const DEFAULT_DATABASE_URL: &str = "postgres://localhost:5432/Chef_App";
const DEFAULT_JWT_SECRET: &str = "development-secret-change-in-production";

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            server: ServerConfig {
                host: "127.0.0.1".to_string(),
                port: 3000,
                request_timeout_secs: 30,
            },
            database: DatabaseConfig {
                url: DEFAULT_DATABASE_URL.to_string(),
                max_connections: 10,
            },
            jwt: JwtConfig {
                secret: SecretString::new(DEFAULT_JWT_SECRET.to_string()),
                token_expiry_secs: 3600, // 1 hour
            },
            password: PasswordConfig {
                algorithm: PasswordAlgorithm::Bcrypt,
                bcrypt_cost: 10,
            },
            uploads: UploadConfig {
                max_body_bytes: 5 * 1024 * 1024,
            },
        }
    }
}

impl AppConfig {
    /// Load configuration from files and environment
    ///
    /// Loading order (later sources override earlier):
    /// 1. Default values
    /// 2. Config file based on RUST_ENV (development.toml or production.toml)
    /// 3. Environment variables with RECIPES__ prefix
    /// 4. DATABASE_URL, JWT_SECRET and PORT
    pub fn load() -> Result<Self> {
        let env = env::var("RUST_ENV").unwrap_or_else(|_| "development".to_string());
        let config_file = format!("config/{}.toml", env);

        let config = config::Config::builder()
            // Start with defaults
            .set_default("server.host", "127.0.0.1")?
            .set_default("server.port", 3000)?
            .set_default("server.request_timeout_secs", 30)?
            .set_default("database.url", DEFAULT_DATABASE_URL)?
            .set_default("database.max_connections", 10)?
            .set_default("jwt.secret", DEFAULT_JWT_SECRET)?
            .set_default("jwt.token_expiry_secs", 3600)?
            .set_default("password.algorithm", "bcrypt")?
            .set_default("password.bcrypt_cost", 10)?
            .set_default("uploads.max_body_bytes", 5 * 1024 * 1024)?
            // Load from environment-specific config file
            .add_source(config::File::with_name(&config_file).required(false))
            // Override with environment variables (RECIPES__ prefix)
            // e.g., RECIPES__SERVER__PORT=9000 sets server.port
            .add_source(config::Environment::with_prefix("RECIPES").separator("__"))
            .set_override_option("database.url", env::var("DATABASE_URL").ok())?
            .set_override_option("jwt.secret", env::var("JWT_SECRET").ok())?
            .set_override_option("server.port", env::var("PORT").ok())?
            .build()?;

        Ok(config.try_deserialize()?)
    }

    /// Check if running in production mode
    pub fn is_production() -> bool {
        env::var("RUST_ENV")
            .map(|v| v == "production")
            .unwrap_or(false)
    }

    /// Problems that make this configuration unsafe to run in production
    pub fn production_issues(&self) -> Vec<&'static str> {
        let mut issues = Vec::new();
        let secret = self.jwt.secret.expose_secret();
        if secret.contains("development") || secret.len() < 32 {
            issues.push("JWT secret must be at least 32 characters and not contain 'development'");
        }
        if self.password.algorithm == PasswordAlgorithm::Bcrypt && self.password.bcrypt_cost < 10 {
            issues.push("bcrypt cost must be at least 10");
        }
        issues
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = AppConfig::default();
        assert_eq!(config.server.host, "127.0.0.1");
        assert_eq!(config.server.port, 3000);
        assert_eq!(config.server.request_timeout_secs, 30);
        assert_eq!(config.database.max_connections, 10);
        assert_eq!(config.jwt.token_expiry_secs, 3600);
        assert_eq!(config.password.algorithm, PasswordAlgorithm::Bcrypt);
        assert_eq!(config.password.bcrypt_cost, 10);
    }

    #[test]
    fn test_debug_does_not_leak_secret() {
        let config = AppConfig::default();
        let debug = format!("{:?}", config);
        assert!(!debug.contains(DEFAULT_JWT_SECRET));
    }

    #[test]
    fn test_default_secret_is_rejected_for_production() {
        let config = AppConfig::default();
        assert!(!config.production_issues().is_empty());

        let mut hardened = AppConfig::default();
        hardened.jwt.secret = SecretString::new("x".repeat(48));
        assert!(hardened.production_issues().is_empty());
    }

    #[test]
    fn test_is_production() {
        // Default should be false (development)
        assert!(!AppConfig::is_production());
    }
}
