//! Configuración del proyecto
//!
//! Este módulo contiene la configuración de base de datos y del servidor,
//! leída de flags de línea de comandos y variables de entorno (y de `.env`
//! vía dotenvy).

pub mod args;
pub mod database;
pub mod environment;

use std::str::FromStr;

use thiserror::Error;

pub use args::ServerArgs;
pub use environment::EnvironmentConfig;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("{0} must be set")]
    Missing(&'static str),

    #[error("{name} has an invalid value: '{value}'")]
    Invalid { name: &'static str, value: String },
}

/// Leer y parsear una variable opcional, con valor por defecto
fn parse_var<T, F>(lookup: &F, name: &'static str, default: T) -> Result<T, ConfigError>
where
    T: FromStr,
    F: Fn(&str) -> Option<String>,
{
    match lookup(name) {
        Some(raw) => raw
            .trim()
            .parse()
            .map_err(|_| ConfigError::Invalid { name, value: raw }),
        None => Ok(default),
    }
}
