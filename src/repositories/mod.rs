//! Repositorios
//!
//! Este módulo contiene el contrato del store de vehículos y sus dos
//! implementaciones: en memoria y PostgreSQL/PostGIS.

pub mod geometry_codec;
pub mod memory_vehicle_repository;
pub mod pg_vehicle_repository;
pub mod vehicle_repository;

pub use memory_vehicle_repository::MemoryVehicleStore;
pub use pg_vehicle_repository::PgVehicleStore;
pub use vehicle_repository::{StoreError, StoreResult, VehicleStore};
