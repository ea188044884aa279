//! Sistema de manejo de errores
//!
//! Este módulo define los errores de la API y su conversión al sobre JSON
//! `{code, message, details?}` que reciben los clientes.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::{Serialize, Serializer};
use serde_json::{json, Value};
use thiserror::Error;

use crate::repositories::StoreError;
use crate::utils::json::JsonResponse;

/// Códigos de error del sobre JSON
///
/// 1: catch-all. [2 - 999]: errores técnicos de bajo nivel.
/// [1000 - 1999]: errores de aplicación.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(i64)]
pub enum ErrCode {
    InternalServerError = 1,
    RequestBodyTrailingGarbage = 2,
    RequestUnexpectedContentType = 3,
    InvalidRequestPayload = 1000,
    ResourceNotFound = 1001,
}

impl ErrCode {
    pub fn as_i64(self) -> i64 {
        self as i64
    }
}

impl Serialize for ErrCode {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_i64(self.as_i64())
    }
}

/// Sobre de error de la API
#[derive(Debug, Serialize)]
pub struct ApiErrorBody {
    pub code: ErrCode,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<Value>,
}

impl ApiErrorBody {
    fn new(code: ErrCode, message: &str) -> Self {
        Self {
            code,
            message: message.to_string(),
            details: None,
        }
    }

    fn with_details(mut self, details: Value) -> Self {
        self.details = Some(details);
        self
    }
}

/// Errores principales de la aplicación
#[derive(Error, Debug)]
pub enum AppError {
    #[error("Unexpected request content type: '{0}'")]
    UnexpectedContentType(String),

    #[error("Unexpected garbage at the end on the request body")]
    TrailingGarbage,

    #[error("Malformed JSON body: {0}")]
    MalformedJson(#[from] serde_json::Error),

    #[error("Invalid request payload: {0:?}")]
    Validation(Vec<String>),

    #[error("Invalid vehicle id: '{0}'")]
    InvalidVehicleId(String),

    #[error("Vehicle {0} not found")]
    VehicleNotFound(i64),

    #[error("Storage error: {0}")]
    Store(#[from] StoreError),
}

impl AppError {
    /// Estado HTTP y sobre JSON para este error
    pub fn to_parts(&self) -> (StatusCode, ApiErrorBody) {
        match self {
            AppError::UnexpectedContentType(got) => (
                StatusCode::BAD_REQUEST,
                ApiErrorBody::new(
                    ErrCode::RequestUnexpectedContentType,
                    "Unexpected request content type",
                )
                .with_details(json!({ "expected": "application/json", "got": got })),
            ),

            AppError::TrailingGarbage => (
                StatusCode::BAD_REQUEST,
                ApiErrorBody::new(
                    ErrCode::RequestBodyTrailingGarbage,
                    "Unexpected garbage at the end on the request body",
                ),
            ),

            AppError::Validation(issues) => (
                StatusCode::BAD_REQUEST,
                ApiErrorBody::new(ErrCode::InvalidRequestPayload, "The request payload is invalid")
                    .with_details(json!(issues)),
            ),

            AppError::InvalidVehicleId(raw) => (
                StatusCode::BAD_REQUEST,
                ApiErrorBody::new(ErrCode::InvalidRequestPayload, "The request payload is invalid")
                    .with_details(json!([format!("invalid vehicle id '{}'", raw)])),
            ),

            AppError::VehicleNotFound(id) => (
                StatusCode::NOT_FOUND,
                ApiErrorBody::new(ErrCode::ResourceNotFound, "Vehicle not found")
                    .with_details(json!({ "id": id })),
            ),

            // JSON mal formado no tiene forma estructurada: código genérico
            AppError::MalformedJson(_) => (
                StatusCode::BAD_REQUEST,
                ApiErrorBody::new(ErrCode::InternalServerError, "Unexpected error"),
            ),

            AppError::Store(_) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                ApiErrorBody::new(ErrCode::InternalServerError, "Unexpected error"),
            ),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, body) = self.to_parts();

        if status.is_server_error() {
            tracing::error!(error = %self, "❌ Error interno atendiendo la petición");
        } else {
            tracing::debug!(error = %self, "Petición rechazada");
        }

        JsonResponse(status, body).into_response()
    }
}

/// Resultado tipado para handlers
pub type AppResult<T> = Result<T, AppError>;
