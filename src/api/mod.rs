//! API endpoints
//!
//! Este módulo contiene los endpoints de la API.

pub mod health;
pub mod vehicles;

use axum::{
    routing::{delete, get},
    Router,
};
use tower_http::trace::TraceLayer;

use crate::state::AppState;

/// Crear el router principal de la API
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route(
            "/vehicles",
            get(vehicles::list_vehicles).post(vehicles::create_vehicle),
        )
        .route("/vehicles/:id", delete(vehicles::delete_vehicle))
        .route("/_/ready", get(health::ready))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
