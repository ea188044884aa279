//! Modelo de Vehicle
//!
//! Este módulo contiene los tipos de valor compartidos por todas las capas:
//! el punto geográfico y el vehículo tal como lo maneja el store.

/// Punto geográfico en grados (WGS-84)
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Point {
    pub latitude: f64,
    pub longitude: f64,
}

impl Point {
    pub const fn new(latitude: f64, longitude: f64) -> Self {
        Self { latitude, longitude }
    }
}

/// Vehicle principal - el `id` lo asigna siempre el store al crearlo
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Vehicle {
    pub id: i64,
    pub short_code: String,
    pub position: Point,
    pub battery_level: i64,
}

impl Vehicle {
    /// Crear un vehículo todavía no persistido (id = 0)
    pub fn new(short_code: impl Into<String>, position: Point, battery_level: i64) -> Self {
        Self {
            id: 0,
            short_code: short_code.into(),
            position,
            battery_level,
        }
    }

    /// Copia del vehículo con el identificador asignado por el store
    pub fn with_id(self, id: i64) -> Self {
        Self { id, ..self }
    }
}
