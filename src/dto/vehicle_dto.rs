//! DTOs de vehículos
//!
//! Cuerpos de petición y respuesta de los endpoints `/vehicles`.

use serde::{Deserialize, Deserializer, Serialize};
use validator::{Validate, ValidationErrors};

use crate::models::{Point, Vehicle};
use crate::utils::validation::{collect_issues, validate_battery_level, validate_short_code};

/// Orden en el que se reportan los errores de validación
const VALIDATED_FIELDS: [&str; 4] = ["shortcode", "latitude", "longitude", "battery"];

/// `null` vale lo mismo que un campo ausente
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de> + Default,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

// Request para crear un vehículo; los campos ausentes o nulos toman su valor cero
#[derive(Debug, Default, Deserialize, Validate)]
#[serde(default)]
pub struct CreateVehicleRequest {
    #[serde(deserialize_with = "null_as_default")]
    #[validate(range(min = -90.0, max = 90.0, message = "latitude must be >= -90 and <= 90"))]
    pub latitude: f64,

    #[serde(deserialize_with = "null_as_default")]
    #[validate(range(min = -90.0, max = 90.0, message = "longitude must be >= -90 and <= 90"))]
    pub longitude: f64,

    #[serde(deserialize_with = "null_as_default")]
    #[validate(custom = "validate_short_code")]
    pub shortcode: String,

    // Entero de 64 bits: un valor enorme es un error de validación, no de JSON
    #[serde(deserialize_with = "null_as_default")]
    pub battery: i64,
}

impl CreateVehicleRequest {
    /// Todas las incidencias de validación, en orden estable
    pub fn validation_issues(&self) -> Vec<String> {
        let mut errors = self.validate().err().unwrap_or_else(ValidationErrors::new);
        if let Err(error) = validate_battery_level(self.battery) {
            errors.add("battery", error);
        }

        collect_issues(&errors, &VALIDATED_FIELDS)
    }

    pub fn into_vehicle(self) -> Vehicle {
        Vehicle::new(
            self.shortcode,
            Point::new(self.latitude, self.longitude),
            self.battery,
        )
    }
}

// Response de vehículo
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct VehicleResponse {
    pub id: i64,
    pub latitude: f64,
    pub longitude: f64,
    pub shortcode: String,
    pub battery: i64,
}

impl From<Vehicle> for VehicleResponse {
    fn from(vehicle: Vehicle) -> Self {
        Self {
            id: vehicle.id,
            latitude: vehicle.position.latitude,
            longitude: vehicle.position.longitude,
            shortcode: vehicle.short_code,
            battery: vehicle.battery_level,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct CreateVehicleResponse {
    pub vehicle: VehicleResponse,
}

#[derive(Debug, Serialize)]
pub struct ListVehiclesResponse {
    pub vehicles: Vec<VehicleResponse>,
}

/// Parámetros de `GET /vehicles`
///
/// Se reciben como texto: un valor ausente o mal formado vale cero y, si
/// una clave se repite, cuenta la primera aparición.
#[derive(Debug, Default)]
pub struct ListVehiclesQuery {
    pub latitude: Option<String>,
    pub longitude: Option<String>,
    pub limit: Option<String>,
}

impl ListVehiclesQuery {
    pub fn from_pairs(pairs: impl IntoIterator<Item = (String, String)>) -> Self {
        let mut query = Self::default();

        for (key, value) in pairs {
            let slot = match key.as_str() {
                "latitude" => &mut query.latitude,
                "longitude" => &mut query.longitude,
                "limit" => &mut query.limit,
                _ => continue,
            };
            if slot.is_none() {
                *slot = Some(value);
            }
        }

        query
    }

    pub fn position(&self) -> Point {
        Point::new(
            parse_or_zero(self.latitude.as_deref()),
            parse_or_zero(self.longitude.as_deref()),
        )
    }

    pub fn limit(&self) -> i64 {
        parse_or_zero(self.limit.as_deref())
    }
}

fn parse_or_zero<T: std::str::FromStr + Default>(raw: Option<&str>) -> T {
    raw.and_then(|value| value.trim().parse().ok()).unwrap_or_default()
}
