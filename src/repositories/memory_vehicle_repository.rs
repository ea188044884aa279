//! Store en memoria
//!
//! Implementación sin dependencias externas usada en tests y en desarrollo
//! local. Reproduce el contrato observable del store PostgreSQL: ids
//! secuenciales desde 1, orden por distancia y borrado idempotente.

use std::collections::BTreeMap;

use async_trait::async_trait;
use geo::{Distance, Haversine};
use tokio::sync::RwLock;

use crate::models::{Point, Vehicle};
use crate::repositories::vehicle_repository::{StoreResult, VehicleStore};

#[derive(Debug)]
struct MemoryData {
    next_id: i64,
    vehicles: BTreeMap<i64, Vehicle>,
}

#[derive(Debug)]
pub struct MemoryVehicleStore {
    data: RwLock<MemoryData>,
}

impl Default for MemoryVehicleStore {
    fn default() -> Self {
        Self::new()
    }
}

impl MemoryVehicleStore {
    pub fn new() -> Self {
        Self {
            data: RwLock::new(MemoryData {
                next_id: 1,
                vehicles: BTreeMap::new(),
            }),
        }
    }

    /// Número de vehículos almacenados
    #[cfg(test)]
    pub async fn len(&self) -> usize {
        self.data.read().await.vehicles.len()
    }
}

/// Distancia de círculo máximo en metros
fn distance_meters(from: &Point, to: &Point) -> f64 {
    Haversine.distance(
        geo::Point::new(from.longitude, from.latitude),
        geo::Point::new(to.longitude, to.latitude),
    )
}

#[async_trait]
impl VehicleStore for MemoryVehicleStore {
    async fn create(&self, vehicle: Vehicle) -> StoreResult<Vehicle> {
        let mut data = self.data.write().await;

        let id = data.next_id;
        data.next_id += 1;

        let stored = vehicle.with_id(id);
        data.vehicles.insert(id, stored.clone());

        log::debug!("Vehículo {} creado en memoria", id);
        Ok(stored)
    }

    async fn find_closest_from(&self, location: Point, limit: i64) -> StoreResult<Vec<Vehicle>> {
        if limit <= 0 {
            return Ok(Vec::new());
        }

        let data = self.data.read().await;

        let mut ranked: Vec<(f64, &Vehicle)> = data
            .vehicles
            .values()
            .map(|v| (distance_meters(&location, &v.position), v))
            .collect();

        // BTreeMap ya entrega por id; sort_by es estable
        ranked.sort_by(|a, b| a.0.total_cmp(&b.0));

        let limit = usize::try_from(limit).unwrap_or(usize::MAX);
        Ok(ranked
            .into_iter()
            .take(limit)
            .map(|(_, v)| v.clone())
            .collect())
    }

    async fn delete(&self, id: i64) -> StoreResult<bool> {
        let removed = self.data.write().await.vehicles.remove(&id).is_some();
        log::debug!("Borrado en memoria del vehículo {}: {}", id, removed);
        Ok(removed)
    }
}
