//! Handlers de Vehicles
//!
//! Este módulo maneja la creación, búsqueda por cercanía y borrado de
//! vehículos.

use axum::{
    body::Bytes,
    extract::{Path, Query, State},
    http::{HeaderMap, StatusCode},
};
use tracing::{debug, info};

use crate::{
    dto::{
        CreateVehicleRequest, CreateVehicleResponse, ListVehiclesQuery, ListVehiclesResponse,
        VehicleResponse,
    },
    state::AppState,
    utils::{
        errors::{AppError, AppResult},
        json::{decode_json_request, JsonResponse},
    },
};

/// Crear un vehículo
#[tracing::instrument(skip_all, fields(handler = "create_vehicle"))]
pub async fn create_vehicle(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: Bytes,
) -> AppResult<JsonResponse<CreateVehicleResponse>> {
    let request: CreateVehicleRequest = decode_json_request(&headers, &body)?;

    let issues = request.validation_issues();
    if !issues.is_empty() {
        return Err(AppError::Validation(issues));
    }

    let vehicle = state.vehicles.create(request.into_vehicle()).await?;
    info!("🚗 Vehículo {} creado ({})", vehicle.id, vehicle.short_code);

    Ok(JsonResponse(
        StatusCode::CREATED,
        CreateVehicleResponse {
            vehicle: vehicle.into(),
        },
    ))
}

/// Listar los vehículos más cercanos a una posición
#[tracing::instrument(skip_all, fields(handler = "list_vehicles"))]
pub async fn list_vehicles(
    State(state): State<AppState>,
    Query(pairs): Query<Vec<(String, String)>>,
) -> AppResult<JsonResponse<ListVehiclesResponse>> {
    let query = ListVehiclesQuery::from_pairs(pairs);
    let position = query.position();
    let limit = query.limit();

    let vehicles = state.vehicles.find_closest_from(position, limit).await?;
    debug!(
        "📍 {} vehículos cerca de ({}, {}) con límite {}",
        vehicles.len(),
        position.latitude,
        position.longitude,
        limit
    );

    Ok(JsonResponse(
        StatusCode::OK,
        ListVehiclesResponse {
            vehicles: vehicles.into_iter().map(VehicleResponse::from).collect(),
        },
    ))
}

/// Eliminar un vehículo
#[tracing::instrument(skip_all, fields(handler = "delete_vehicle"))]
pub async fn delete_vehicle(
    State(state): State<AppState>,
    Path(raw_id): Path<String>,
) -> AppResult<StatusCode> {
    let id: i64 = raw_id
        .parse()
        .map_err(|_| AppError::InvalidVehicleId(raw_id.clone()))?;

    if !state.vehicles.delete(id).await? {
        return Err(AppError::VehicleNotFound(id));
    }

    info!("🗑️ Vehículo {} eliminado", id);
    Ok(StatusCode::NO_CONTENT)
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use async_trait::async_trait;
    use axum::{
        body::Body,
        http::{header, Method, Request},
        Router,
    };
    use serde_json::{json, Value};
    use tower::ServiceExt;

    use crate::api::create_router;
    use crate::models::{Point, Vehicle};
    use crate::repositories::{MemoryVehicleStore, StoreError, StoreResult, VehicleStore};
    use crate::state::AppState;

    use super::*;

    fn app() -> Router {
        create_router(AppState::new(Arc::new(MemoryVehicleStore::new())))
    }

    async fn send(app: &Router, request: Request<Body>) -> (StatusCode, HeaderMap, Value) {
        let response = app.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let headers = response.headers().clone();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let body = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap()
        };
        (status, headers, body)
    }

    fn post_json(content_type: &str, body: impl Into<Body>) -> Request<Body> {
        Request::builder()
            .method(Method::POST)
            .uri("/vehicles")
            .header(header::CONTENT_TYPE, content_type)
            .body(body.into())
            .unwrap()
    }

    fn create_request(payload: Value) -> Request<Body> {
        post_json("application/json", payload.to_string())
    }

    fn get(uri: &str) -> Request<Body> {
        Request::builder().uri(uri).body(Body::empty()).unwrap()
    }

    fn delete(uri: &str) -> Request<Body> {
        Request::builder()
            .method(Method::DELETE)
            .uri(uri)
            .body(Body::empty())
            .unwrap()
    }

    #[tokio::test]
    async fn test_create_vehicle() {
        let app = app();

        let (status, headers, body) = send(
            &app,
            create_request(json!({
                "latitude": 10.0,
                "longitude": 9.0,
                "shortcode": "ebvf",
                "battery": 72,
            })),
        )
        .await;

        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(headers[header::CONTENT_TYPE], "application/json; charset=utf-8");
        assert_eq!(headers[header::X_CONTENT_TYPE_OPTIONS], "nosniff");
        assert_eq!(
            body,
            json!({
                "vehicle": {
                    "id": 1,
                    "latitude": 10.0,
                    "longitude": 9.0,
                    "shortcode": "ebvf",
                    "battery": 72,
                }
            })
        );
    }

    #[tokio::test]
    async fn test_create_vehicle_validation() {
        let cases = [
            (json!({"latitude": 10.0, "longitude": 9.0, "shortcode": "", "battery": 72}), "missing short code"),
            (json!({"latitude": 10.0, "longitude": 9.0, "shortcode": "aaabbbcccddd", "battery": 72}), "short code too long"),
            (json!({"latitude": -91.0, "longitude": 9.0, "shortcode": "ebvf", "battery": 72}), "latitude must be >= -90 and <= 90"),
            (json!({"latitude": 10.0, "longitude": 91.0, "shortcode": "ebvf", "battery": 72}), "longitude must be >= -90 and <= 90"),
            (json!({"latitude": 10.0, "longitude": 9.0, "shortcode": "ebvf", "battery": 101}), "battery level must be > 0 and <= 100"),
        ];

        let app = app();
        for (payload, expected) in cases {
            let (status, _, body) = send(&app, create_request(payload)).await;

            assert_eq!(status, StatusCode::BAD_REQUEST);
            assert_eq!(
                body,
                json!({
                    "code": 1000,
                    "message": "The request payload is invalid",
                    "details": [expected],
                })
            );
        }

        // null y enteros fuera de rango también llegan a la validación
        let both = json!(["missing short code", "battery level must be > 0 and <= 100"]);
        for payload in [
            json!({"latitude": 1, "longitude": 1, "shortcode": "", "battery": 5_000_000_000i64}),
            json!({"latitude": 1, "longitude": 1, "shortcode": null, "battery": -5}),
        ] {
            let (status, _, body) = send(&app, create_request(payload)).await;

            assert_eq!(status, StatusCode::BAD_REQUEST);
            assert_eq!(body["code"], 1000);
            assert_eq!(body["details"], both);
        }

        let (_, _, body) = send(&app, get("/vehicles?latitude=0&longitude=0&limit=10")).await;
        assert_eq!(body, json!({ "vehicles": [] }));
    }

    #[tokio::test]
    async fn test_create_vehicle_reports_every_issue() {
        let (status, _, body) = send(
            &app(),
            create_request(json!({"latitude": 10.0, "longitude": 9.0, "shortcode": "", "battery": -5})),
        )
        .await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(
            body["details"],
            json!(["missing short code", "battery level must be > 0 and <= 100"])
        );
    }

    #[tokio::test]
    async fn test_create_vehicle_rejects_content_type() {
        let (status, _, body) = send(&app(), post_json("text/plain", r#"{"shortcode":"ebvf"}"#)).await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(
            body,
            json!({
                "code": 3,
                "message": "Unexpected request content type",
                "details": { "expected": "application/json", "got": "text/plain" },
            })
        );
    }

    #[tokio::test]
    async fn test_create_vehicle_rejects_trailing_garbage() {
        let payload = r#"{"latitude":10.0,"longitude":9.0,"shortcode":"ebvf","battery":72}{"x":1}"#;
        let (status, _, body) = send(&app(), post_json("application/json", payload)).await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["code"], 2);
        assert_eq!(body["message"], "Unexpected garbage at the end on the request body");
    }

    #[tokio::test]
    async fn test_create_vehicle_rejects_malformed_json() {
        let (status, _, body) = send(&app(), post_json("application/json", "{\"latitude\":")).await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body, json!({ "code": 1, "message": "Unexpected error" }));
    }

    #[tokio::test]
    async fn test_list_vehicles_by_distance() {
        let app = app();
        for (index, coordinate) in [50.0, 51.0, 52.0].into_iter().enumerate() {
            let (status, _, _) = send(
                &app,
                create_request(json!({
                    "latitude": coordinate,
                    "longitude": coordinate,
                    "shortcode": format!("v{}", index),
                    "battery": 50,
                })),
            )
            .await;
            assert_eq!(status, StatusCode::CREATED);
        }

        let (status, _, body) = send(&app, get("/vehicles?latitude=49&longitude=49&limit=10")).await;
        assert_eq!(status, StatusCode::OK);

        let ids: Vec<i64> = body["vehicles"]
            .as_array()
            .unwrap()
            .iter()
            .map(|vehicle| vehicle["id"].as_i64().unwrap())
            .collect();
        assert_eq!(ids, vec![1, 2, 3]);

        let (_, _, body) = send(&app, get("/vehicles?latitude=53&longitude=53&limit=2")).await;
        assert_eq!(body["vehicles"][0]["id"], 3);
        assert_eq!(body["vehicles"].as_array().unwrap().len(), 2);

        let (status, _, body) = send(&app, get("/vehicles?latitude=abc&longitude=49")).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, json!({ "vehicles": [] }));
    }

    #[tokio::test]
    async fn test_list_vehicles_repeated_parameters_use_first_value() {
        let app = app();
        for coordinate in [1.0, 60.0] {
            send(
                &app,
                create_request(json!({
                    "latitude": coordinate,
                    "longitude": coordinate,
                    "shortcode": "abcd",
                    "battery": 10,
                })),
            )
            .await;
        }

        let (status, headers, body) = send(
            &app,
            get("/vehicles?latitude=1&latitude=60&longitude=1&limit=1&limit=5"),
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(headers[header::CONTENT_TYPE], "application/json; charset=utf-8");
        assert_eq!(body["vehicles"].as_array().unwrap().len(), 1);
        assert_eq!(body["vehicles"][0]["id"], 1);
    }

    #[tokio::test]
    async fn test_delete_vehicle() {
        let app = app();
        for coordinate in [50.0, 51.0] {
            send(
                &app,
                create_request(json!({
                    "latitude": coordinate,
                    "longitude": coordinate,
                    "shortcode": "abcd",
                    "battery": 10,
                })),
            )
            .await;
        }

        let (status, _, body) = send(&app, delete("/vehicles/456")).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(
            body,
            json!({ "code": 1001, "message": "Vehicle not found", "details": { "id": 456 } })
        );

        let (status, _, body) = send(&app, delete("/vehicles/1")).await;
        assert_eq!(status, StatusCode::NO_CONTENT);
        assert_eq!(body, Value::Null);

        let (status, _, _) = send(&app, delete("/vehicles/1")).await;
        assert_eq!(status, StatusCode::NOT_FOUND);

        let (_, _, body) = send(&app, get("/vehicles?latitude=49&longitude=49&limit=10")).await;
        assert_eq!(body["vehicles"].as_array().unwrap().len(), 1);
        assert_eq!(body["vehicles"][0]["id"], 2);
    }

    #[tokio::test]
    async fn test_delete_vehicle_invalid_id() {
        let (status, _, body) = send(&app(), delete("/vehicles/abc")).await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["code"], 1000);
        assert_eq!(body["details"], json!(["invalid vehicle id 'abc'"]));
    }

    struct FailingStore;

    #[async_trait]
    impl VehicleStore for FailingStore {
        async fn create(&self, _vehicle: Vehicle) -> StoreResult<Vehicle> {
            Err(StoreError::Database(sqlx::Error::PoolTimedOut))
        }

        async fn find_closest_from(&self, _location: Point, _limit: i64) -> StoreResult<Vec<Vehicle>> {
            Err(StoreError::Database(sqlx::Error::PoolClosed))
        }

        async fn delete(&self, _id: i64) -> StoreResult<bool> {
            Err(StoreError::InvalidCoordinates)
        }
    }

    #[tokio::test]
    async fn test_store_failures_are_internal_errors() {
        let app = create_router(AppState::new(Arc::new(FailingStore)));
        let expected = json!({ "code": 1, "message": "Unexpected error" });

        let (status, _, body) = send(
            &app,
            create_request(json!({"latitude": 1.0, "longitude": 1.0, "shortcode": "abcd", "battery": 1})),
        )
        .await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body, expected);

        let (status, _, body) = send(&app, get("/vehicles?latitude=1&longitude=1&limit=1")).await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body, expected);

        let (status, _, body) = send(&app, delete("/vehicles/1")).await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body, expected);
    }
}
