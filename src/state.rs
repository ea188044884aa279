//! Shared application state
//!
//! Este módulo define el estado compartido de la aplicación que se pasa
//! a través del router de Axum.

use std::sync::Arc;

use crate::repositories::VehicleStore;

#[derive(Clone)]
pub struct AppState {
    pub vehicles: Arc<dyn VehicleStore>,
}

impl AppState {
    pub fn new(vehicles: Arc<dyn VehicleStore>) -> Self {
        Self { vehicles }
    }
}
