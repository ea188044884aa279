//! Health check
//!
//! El proceso está listo en cuanto acepta peticiones.

use axum::http::StatusCode;

/// `GET /_/ready`
pub async fn ready() -> StatusCode {
    StatusCode::OK
}
