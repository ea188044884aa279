//! Contrato del store de vehículos
//!
//! Los handlers sólo conocen este trait; el backend concreto (memoria o
//! PostgreSQL/PostGIS) se inyecta a través de `AppState`.

use async_trait::async_trait;
use thiserror::Error;

use crate::models::{Point, Vehicle};
use crate::repositories::geometry_codec::GeometryError;

/// Errores del almacenamiento
#[derive(Error, Debug)]
pub enum StoreError {
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Geometry error: {0}")]
    Geometry(GeometryError),

    #[error("invalid coordinates")]
    InvalidCoordinates,

    #[error("battery level {0} does not fit the storage column")]
    BatteryOutOfRange(i64),
}

impl From<GeometryError> for StoreError {
    fn from(e: GeometryError) -> Self {
        match e {
            GeometryError::InvalidCoordinates(_) => StoreError::InvalidCoordinates,
            other => StoreError::Geometry(other),
        }
    }
}

/// Resultado tipado para operaciones del store
pub type StoreResult<T> = Result<T, StoreError>;

#[async_trait]
pub trait VehicleStore: Send + Sync {
    /// Crea un vehículo nuevo. El `id` recibido se ignora y el devuelto es
    /// el asignado por el store.
    async fn create(&self, vehicle: Vehicle) -> StoreResult<Vehicle>;

    /// Los `limit` vehículos más cercanos a `location`, del más cercano al
    /// más lejano. Empates por `id` ascendente; `limit <= 0` devuelve vacío.
    async fn find_closest_from(&self, location: Point, limit: i64) -> StoreResult<Vec<Vehicle>>;

    /// Elimina un vehículo. `Ok(false)` si el id no existía.
    async fn delete(&self, id: i64) -> StoreResult<bool>;
}
