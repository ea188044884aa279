//! Flags de línea de comandos
//!
//! Cada flag cae en su variable de entorno cuando no se pasa.

use clap::Parser;

#[derive(Parser, Debug, Clone, Default)]
#[command(author, version, about = "Servidor HTTP de vehículos con búsqueda por cercanía")]
pub struct ServerArgs {
    /// URL de la base de datos PostgreSQL
    #[arg(long, env = "DATABASE_URL")]
    pub database_url: Option<String>,

    /// Dirección de escucha (`host:port` o `:port`), por defecto `:8080`
    #[arg(long, env = "LISTEN_ADDRESS")]
    pub listen_address: Option<String>,
}
