//! Store PostgreSQL/PostGIS
//!
//! Cada operación es una única sentencia. El orden por distancia lo calcula
//! el motor con el operador `<->` sobre `geography`, así que el índice
//! espacial hace el trabajo en lugar de la aplicación.
//!
//! Las consultas son funciones genéricas sobre `PgExecutor`: funcionan igual
//! contra el pool, una conexión suelta o una transacción.

use std::sync::Arc;

use async_trait::async_trait;
use sqlx::postgres::PgRow;
use sqlx::{PgExecutor, PgPool, Row};

use crate::database::connection::ensure_schema;
use crate::models::{Point, Vehicle};
use crate::repositories::geometry_codec::{Ewkb, GeometryCodec};
use crate::repositories::vehicle_repository::{StoreError, StoreResult, VehicleStore};

const CREATE_VEHICLE_STATEMENT: &str = r#"
INSERT INTO vehicle_server.vehicles (shortcode, battery, position)
VALUES ($1, $2, ST_GeomFromEWKB($3))
RETURNING id
"#;

// $1 = longitud, $2 = latitud
const FIND_CLOSEST_FROM_STATEMENT: &str = r#"
SELECT id, shortcode, COALESCE(battery, 0)::smallint AS battery, ST_AsEWKB(position) AS position
FROM vehicle_server.vehicles
ORDER BY position <-> ST_MakePoint($1, $2)::geography ASC, id ASC
LIMIT $3
"#;

const DELETE_BY_ID_STATEMENT: &str = r#"
DELETE FROM vehicle_server.vehicles WHERE id = $1
"#;

/// Inserta un vehículo y devuelve el id generado por la secuencia
pub async fn insert_vehicle<'e, E>(
    executor: E,
    codec: &dyn GeometryCodec,
    vehicle: &Vehicle,
) -> StoreResult<i64>
where
    E: PgExecutor<'e>,
{
    let battery = i16::try_from(vehicle.battery_level)
        .map_err(|_| StoreError::BatteryOutOfRange(vehicle.battery_level))?;
    let encoded_position = codec.encode(&vehicle.position)?;

    let id: i32 = sqlx::query_scalar(CREATE_VEHICLE_STATEMENT)
        .bind(vehicle.short_code.as_str())
        .bind(battery)
        .bind(encoded_position)
        .fetch_one(executor)
        .await?;

    Ok(i64::from(id))
}

/// Los `limit` vehículos más cercanos a `location`
pub async fn select_closest_vehicles<'e, E>(
    executor: E,
    codec: &dyn GeometryCodec,
    location: Point,
    limit: i64,
) -> StoreResult<Vec<Vehicle>>
where
    E: PgExecutor<'e>,
{
    if limit <= 0 {
        return Ok(Vec::new());
    }

    let rows = sqlx::query(FIND_CLOSEST_FROM_STATEMENT)
        .bind(location.longitude)
        .bind(location.latitude)
        .bind(limit)
        .fetch_all(executor)
        .await?;

    rows.iter().map(|row| vehicle_from_row(codec, row)).collect()
}

/// Borra por id; devuelve las filas afectadas
pub async fn delete_vehicle_by_id<'e, E>(executor: E, id: i64) -> StoreResult<u64>
where
    E: PgExecutor<'e>,
{
    let result = sqlx::query(DELETE_BY_ID_STATEMENT)
        .bind(id)
        .execute(executor)
        .await?;

    Ok(result.rows_affected())
}

fn vehicle_from_row(codec: &dyn GeometryCodec, row: &PgRow) -> StoreResult<Vehicle> {
    let id: i32 = row.try_get("id")?;
    let short_code: String = row.try_get("shortcode")?;
    let battery: i16 = row.try_get("battery")?;
    let encoded_position: Vec<u8> = row.try_get("position")?;

    Ok(Vehicle {
        id: i64::from(id),
        short_code,
        position: codec.decode(&encoded_position)?,
        battery_level: i64::from(battery),
    })
}

/// Store de vehículos respaldado por PostgreSQL con PostGIS
#[derive(Clone)]
pub struct PgVehicleStore {
    pool: PgPool,
    codec: Arc<dyn GeometryCodec>,
}

impl PgVehicleStore {
    /// Crea el store sobre un pool ya conectado y asegura que el esquema
    /// exista (idempotente).
    pub async fn new(pool: PgPool) -> StoreResult<Self> {
        Self::with_codec(pool, Arc::new(Ewkb::default())).await
    }

    pub async fn with_codec(pool: PgPool, codec: Arc<dyn GeometryCodec>) -> StoreResult<Self> {
        ensure_schema(&pool).await?;
        Ok(Self { pool, codec })
    }

    #[cfg(test)]
    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    /// Cierra el pool; las operaciones posteriores fallan
    pub async fn close(&self) {
        log::info!("🔌 Cerrando conexiones a la base de datos");
        self.pool.close().await;
    }
}

#[async_trait]
impl VehicleStore for PgVehicleStore {
    async fn create(&self, vehicle: Vehicle) -> StoreResult<Vehicle> {
        let id = insert_vehicle(&self.pool, self.codec.as_ref(), &vehicle).await?;
        Ok(vehicle.with_id(id))
    }

    async fn find_closest_from(&self, location: Point, limit: i64) -> StoreResult<Vec<Vehicle>> {
        select_closest_vehicles(&self.pool, self.codec.as_ref(), location, limit).await
    }

    async fn delete(&self, id: i64) -> StoreResult<bool> {
        let affected = delete_vehicle_by_id(&self.pool, id).await?;
        if affected > 1 {
            log::error!(
                "❌ Borrado del id {} afectó {} filas: ids duplicados en vehicle_server.vehicles",
                id,
                affected
            );
        }
        Ok(affected == 1)
    }
}
