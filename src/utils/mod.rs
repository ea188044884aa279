//! Utilidades del sistema
//!
//! Este módulo contiene utilidades para manejo de errores, validación y
//! codificación JSON.

pub mod errors;
pub mod json;
pub mod validation;
