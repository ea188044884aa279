//! Módulo de base de datos
//!
//! Maneja la conexión con PostgreSQL y el esquema de PostGIS

pub mod connection;

pub use connection::connect_with_retry;
