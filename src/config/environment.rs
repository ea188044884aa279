//! Configuración de variables de entorno
//!
//! Este módulo maneja la configuración del servidor HTTP a partir del entorno.

use std::net::SocketAddr;
use std::time::Duration;

use super::args::ServerArgs;
use super::database::DatabaseConfig;
use super::{parse_var, ConfigError};

const DEFAULT_LISTEN_ADDRESS: &str = ":8080";
const DEFAULT_SHUTDOWN_GRACE_PERIOD_SECS: u64 = 10;

/// Configuración del entorno
#[derive(Debug, Clone)]
pub struct EnvironmentConfig {
    pub listen_address: SocketAddr,
    pub shutdown_grace_period: Duration,
    pub database: DatabaseConfig,
}

impl EnvironmentConfig {
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let raw_listen_address =
            lookup("LISTEN_ADDRESS").unwrap_or_else(|| DEFAULT_LISTEN_ADDRESS.to_string());
        let listen_address =
            parse_listen_address(&raw_listen_address).ok_or(ConfigError::Invalid {
                name: "LISTEN_ADDRESS",
                value: raw_listen_address,
            })?;

        let grace_secs: u64 = parse_var(
            &lookup,
            "SHUTDOWN_GRACE_PERIOD_SECS",
            DEFAULT_SHUTDOWN_GRACE_PERIOD_SECS,
        )?;

        Ok(Self {
            listen_address,
            shutdown_grace_period: Duration::from_secs(grace_secs),
            database: DatabaseConfig::from_lookup(&lookup)?,
        })
    }

    /// Configuración del proceso: flags de línea de comandos y, por debajo,
    /// variables de entorno
    pub fn from_args(args: &ServerArgs) -> Result<Self, ConfigError> {
        Self::from_lookup(|key| match key {
            "DATABASE_URL" if args.database_url.is_some() => args.database_url.clone(),
            "LISTEN_ADDRESS" if args.listen_address.is_some() => args.listen_address.clone(),
            _ => std::env::var(key).ok(),
        })
    }
}

/// `host:port` o `:port` (todas las interfaces)
fn parse_listen_address(raw: &str) -> Option<SocketAddr> {
    let raw = raw.trim();
    match raw.strip_prefix(':') {
        Some(port) => Some(SocketAddr::from(([0, 0, 0, 0], port.parse::<u16>().ok()?))),
        None => raw.parse().ok(),
    }
}
