mod api;
mod config;
mod database;
mod dto;
mod models;
mod repositories;
mod state;
mod utils;

use std::sync::Arc;

use anyhow::Result;
use clap::Parser;
use dotenvy::dotenv;
use tokio::{signal, sync::Notify};
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

use config::{EnvironmentConfig, ServerArgs};
use database::connect_with_retry;
use repositories::PgVehicleStore;
use state::AppState;

#[tokio::main]
async fn main() -> Result<()> {
    // Cargar variables de entorno antes de leer los flags
    dotenv().ok();
    let args = ServerArgs::parse();

    // Configurar logging
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    info!("🚗 Vehicle Server - API de vehículos");
    info!("===================================");

    let config = EnvironmentConfig::from_args(&args)?;

    // Conectar a la base de datos; una señal durante los reintentos aborta el arranque
    let pool = tokio::select! {
        pool = connect_with_retry(&config.database) => match pool {
            Ok(pool) => pool,
            Err(e) => {
                error!("❌ Error conectando a la base de datos: {}", e);
                return Err(anyhow::anyhow!("Error de base de datos: {}", e));
            }
        },
        _ = shutdown_signal() => {
            info!("👋 Arranque cancelado");
            return Ok(());
        }
    };

    let store = Arc::new(PgVehicleStore::new(pool).await?);
    let app = api::create_router(AppState::new(store.clone()));

    let listener = tokio::net::TcpListener::bind(config.listen_address).await?;
    info!("🌐 Servidor iniciando en http://{}", config.listen_address);
    info!("🔍 Endpoints disponibles:");
    info!("   POST   /vehicles - Crear vehículo");
    info!("   GET    /vehicles?latitude=&longitude=&limit= - Vehículos más cercanos");
    info!("   DELETE /vehicles/:id - Eliminar vehículo");
    info!("   GET    /_/ready - Health check");

    // Iniciar servidor en background
    let stop = Arc::new(Notify::new());
    let mut server_handle = tokio::spawn({
        let stop = stop.clone();
        async move {
            axum::serve(listener, app)
                .with_graceful_shutdown(async move { stop.notified().await })
                .await
        }
    });

    tokio::select! {
        result = &mut server_handle => {
            match result {
                Ok(Ok(())) => info!("👋 Servidor terminado"),
                Ok(Err(e)) => error!("❌ Servidor terminó con error: {}", e),
                Err(e) => error!("❌ Tarea del servidor abortada: {}", e),
            }
            store.close().await;
            return Ok(());
        }
        _ = shutdown_signal() => {}
    }

    // Apagado graceful acotado
    stop.notify_one();
    match tokio::time::timeout(config.shutdown_grace_period, &mut server_handle).await {
        Ok(Ok(Ok(()))) => info!("👋 Servidor terminado"),
        Ok(Ok(Err(e))) => error!("❌ Servidor terminó con error: {}", e),
        Ok(Err(e)) => error!("❌ Tarea del servidor abortada: {}", e),
        Err(_) => {
            warn!(
                "⚠️ Las peticiones en curso no terminaron en {:?}, forzando cierre",
                config.shutdown_grace_period
            );
            server_handle.abort();
        }
    }

    store.close().await;
    info!("🗄️ Conexiones a la base de datos cerradas");
    Ok(())
}

/// Señal de apagado graceful
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            error!("❌ No se pudo instalar el handler de Ctrl+C: {}", e);
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
                error!("❌ No se pudo instalar el handler de SIGTERM: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            info!("🛑 Señal Ctrl+C recibida, apagando servidor...");
        },
        _ = terminate => {
            info!("🛑 Señal de terminación recibida, apagando servidor...");
        },
    }
}
