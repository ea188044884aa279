//! Utilidades JSON
//!
//! Decodificación estricta de cuerpos de petición y respuestas JSON con las
//! cabeceras que la API garantiza en cada respuesta.

use axum::{
    http::{header, HeaderMap, HeaderValue, StatusCode},
    response::{IntoResponse, Response},
};
use serde::{de::DeserializeOwned, Deserialize, Serialize};

use crate::utils::errors::AppError;

pub const JSON_CONTENT_TYPE: &str = "application/json; charset=utf-8";

/// Decodificar el cuerpo exigiendo `Content-Type: application/json` y
/// ningún contenido después del valor JSON
pub fn decode_json_request<T: DeserializeOwned>(
    headers: &HeaderMap,
    body: &[u8],
) -> Result<T, AppError> {
    let content_type = headers
        .get(header::CONTENT_TYPE)
        .and_then(|value| value.to_str().ok())
        .unwrap_or_default();

    if !content_type.eq_ignore_ascii_case("application/json") {
        return Err(AppError::UnexpectedContentType(content_type.to_string()));
    }

    decode_json(body)
}

/// Decodificar un único valor JSON; los espacios finales se aceptan
pub fn decode_json<T: DeserializeOwned>(body: &[u8]) -> Result<T, AppError> {
    let mut deserializer = serde_json::Deserializer::from_slice(body);
    let value = T::deserialize(&mut deserializer)?;

    deserializer.end().map_err(|_| AppError::TrailingGarbage)?;

    Ok(value)
}

/// Respuesta JSON con estado explícito
pub struct JsonResponse<T>(pub StatusCode, pub T);

impl<T: Serialize> IntoResponse for JsonResponse<T> {
    fn into_response(self) -> Response {
        let JsonResponse(status, payload) = self;

        match serde_json::to_vec(&payload) {
            Ok(bytes) => {
                let mut response = (status, bytes).into_response();
                let headers = response.headers_mut();
                headers.insert(header::CONTENT_TYPE, HeaderValue::from_static(JSON_CONTENT_TYPE));
                headers.insert(header::X_CONTENT_TYPE_OPTIONS, HeaderValue::from_static("nosniff"));
                response
            }
            Err(e) => {
                tracing::error!("❌ No se pudo serializar la respuesta: {}", e);
                let mut response = (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    r#"{"code":1,"message":"Unexpected error"}"#,
                )
                    .into_response();
                let headers = response.headers_mut();
                headers.insert(header::CONTENT_TYPE, HeaderValue::from_static(JSON_CONTENT_TYPE));
                headers.insert(header::X_CONTENT_TYPE_OPTIONS, HeaderValue::from_static("nosniff"));
                response
            }
        }
    }
}
