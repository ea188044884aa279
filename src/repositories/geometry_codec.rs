//! Codec de geometrías
//!
//! Traduce `Point` hacia y desde EWKB (Extended Well-Known Binary), el
//! formato binario que PostGIS devuelve con `ST_AsEWKB` y acepta con
//! `ST_GeomFromEWKB`. Las coordenadas viajan siempre como (x, y) =
//! (longitud, latitud).

use std::io::Cursor;

use geozero::error::{GeozeroError, Result as GeozeroResult};
use geozero::{wkb, CoordDimensions, GeomProcessor, ToWkb};
use thiserror::Error;

use crate::models::Point;

/// SRID de WGS-84
pub const WGS84_SRID: i32 = 4326;

/// Errores de codificación de geometrías
#[derive(Error, Debug, Clone, PartialEq)]
pub enum GeometryError {
    #[error("malformed geometry: {0}")]
    Malformed(String),

    #[error("geometry is not a single point")]
    NotAPoint,

    #[error("invalid coordinates: expected 2 components, got {0}")]
    InvalidCoordinates(usize),

    #[error("unexpected SRID {found} (expected {expected})")]
    UnexpectedSrid { expected: i32, found: i32 },

    #[error("{0} trailing bytes after geometry")]
    TrailingBytes(usize),
}

impl From<GeozeroError> for GeometryError {
    fn from(e: GeozeroError) -> Self {
        GeometryError::Malformed(e.to_string())
    }
}

/// Frontera de serialización entre el dominio y la columna de geometría
pub trait GeometryCodec: Send + Sync {
    fn encode(&self, point: &Point) -> Result<Vec<u8>, GeometryError>;

    fn decode(&self, bytes: &[u8]) -> Result<Point, GeometryError>;
}

/// Codec EWKB para puntos 2D en WGS-84
#[derive(Debug, Clone, Copy)]
pub struct Ewkb {
    srid: i32,
}

impl Default for Ewkb {
    fn default() -> Self {
        Self { srid: WGS84_SRID }
    }
}

impl GeometryCodec for Ewkb {
    fn encode(&self, point: &Point) -> Result<Vec<u8>, GeometryError> {
        let geometry = geo::Geometry::Point(geo::Point::new(point.longitude, point.latitude));
        Ok(geometry.to_ewkb(CoordDimensions::xy(), Some(self.srid))?)
    }

    fn decode(&self, bytes: &[u8]) -> Result<Point, GeometryError> {
        let mut cursor = Cursor::new(bytes);
        let mut collector = PointCollector::default();
        wkb::process_ewkb_geom(&mut cursor, &mut collector)?;

        let consumed = cursor.position() as usize;
        if consumed < bytes.len() {
            return Err(GeometryError::TrailingBytes(bytes.len() - consumed));
        }

        collector.into_point(self.srid)
    }
}

/// Recoge lo que el lector EWKB va encontrando; se piden todas las
/// dimensiones para poder rechazar Z/M
#[derive(Debug, Default)]
struct PointCollector {
    srid: Option<i32>,
    points: usize,
    // (x, y, número de componentes)
    coordinates: Vec<(f64, f64, usize)>,
}

impl PointCollector {
    fn into_point(self, expected_srid: i32) -> Result<Point, GeometryError> {
        let &[(longitude, latitude, dimensions)] = self.coordinates.as_slice() else {
            return Err(GeometryError::NotAPoint);
        };
        if self.points != 1 {
            return Err(GeometryError::NotAPoint);
        }

        if let Some(found) = self.srid.filter(|srid| *srid != expected_srid) {
            return Err(GeometryError::UnexpectedSrid {
                expected: expected_srid,
                found,
            });
        }

        if dimensions != 2 {
            return Err(GeometryError::InvalidCoordinates(dimensions));
        }

        Ok(Point::new(latitude, longitude))
    }
}

impl GeomProcessor for PointCollector {
    fn dimensions(&self) -> CoordDimensions {
        CoordDimensions::xyzm()
    }

    fn srid(&mut self, srid: Option<i32>) -> GeozeroResult<()> {
        self.srid = srid;
        Ok(())
    }

    fn point_begin(&mut self, _idx: usize) -> GeozeroResult<()> {
        self.points += 1;
        Ok(())
    }

    fn xy(&mut self, x: f64, y: f64, _idx: usize) -> GeozeroResult<()> {
        self.coordinates.push((x, y, 2));
        Ok(())
    }

    fn coordinate(
        &mut self,
        x: f64,
        y: f64,
        z: Option<f64>,
        m: Option<f64>,
        t: Option<f64>,
        tm: Option<u64>,
        _idx: usize,
    ) -> GeozeroResult<()> {
        let extra = [z, m, t].iter().filter(|c| c.is_some()).count() + usize::from(tm.is_some());
        self.coordinates.push((x, y, 2 + extra));
        Ok(())
    }
}
