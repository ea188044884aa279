//! Modelos del sistema
//!
//! Este módulo contiene los modelos de dominio independientes del
//! almacenamiento y del transporte HTTP.

pub mod vehicle;

pub use vehicle::{Point, Vehicle};
