//! Configuración de base de datos
//!
//! Este módulo maneja la conexión y configuración de PostgreSQL con SQLx.

use std::time::Duration;

use sqlx::postgres::{PgPool, PgPoolOptions};

use super::{parse_var, ConfigError};

const DEFAULT_CONNECT_RETRY_INTERVAL_MS: u64 = 1_000;

/// Configuración de la base de datos
#[derive(Debug, Clone)]
pub struct DatabaseConfig {
    pub url: String,
    pub max_connections: u32,
    pub acquire_timeout: Duration,
    pub connect_retry_interval: Duration,
    pub connect_max_attempts: u32,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            url: String::new(),
            max_connections: 10,
            acquire_timeout: Duration::from_secs(30),
            connect_retry_interval: Duration::from_millis(DEFAULT_CONNECT_RETRY_INTERVAL_MS),
            connect_max_attempts: 10,
        }
    }
}

impl DatabaseConfig {
    /// Leer la configuración a partir de una función de búsqueda de variables
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();

        let url = lookup("DATABASE_URL")
            .filter(|url| !url.trim().is_empty())
            .ok_or(ConfigError::Missing("DATABASE_URL"))?;

        let retry_interval_ms: u64 = parse_var(
            &lookup,
            "DATABASE_CONNECT_RETRY_INTERVAL_MS",
            DEFAULT_CONNECT_RETRY_INTERVAL_MS,
        )?;

        Ok(Self {
            url,
            max_connections: parse_var(&lookup, "DATABASE_MAX_CONNECTIONS", defaults.max_connections)?,
            acquire_timeout: defaults.acquire_timeout,
            connect_retry_interval: Duration::from_millis(retry_interval_ms),
            connect_max_attempts: parse_var(
                &lookup,
                "DATABASE_CONNECT_MAX_ATTEMPTS",
                defaults.connect_max_attempts,
            )?,
        })
    }

    /// Crear un nuevo pool de conexiones (un único intento)
    pub async fn create_pool(&self) -> Result<PgPool, sqlx::Error> {
        PgPoolOptions::new()
            .max_connections(self.max_connections)
            .acquire_timeout(self.acquire_timeout)
            .connect(&self.url)
            .await
    }
}
