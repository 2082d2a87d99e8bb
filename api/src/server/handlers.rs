//! HTTP request handlers

use std::sync::Arc;

use axum::{
    extract::{rejection::JsonRejection, Path, State},
    http::{header, StatusCode},
    response::IntoResponse,
    Json,
};
use openapi_server::{
    CreateDeviceRequest, DeviceResponse, ErrorResponse, HealthResponse, MessageResponse,
    UpdateDeviceRequest, VersionResponse,
};
use uuid::Uuid;

use crate::errors::DeviceError;
use crate::models::device::{Device, DeviceChanges, DeviceState, NewDevice, UpdateMode};
use crate::server::state::ServerState;
use crate::utils::version_info;

pub const PING_MESSAGE: &str = "Devices API is running fine!";

/// Error half of every handler result
pub type ApiError = (StatusCode, Json<ErrorResponse>);

/// Convert a domain error into a status and JSON body
pub fn error_response(err: DeviceError) -> ApiError {
    let status = err.status_code();
    let message = err.to_string();
    let body = match err {
        DeviceError::InUse { rule, device } => ErrorResponse {
            error: "device_in_use".to_string(),
            message,
            rule: Some(rule.as_str().to_string()),
            device: Some(DeviceResponse::from(*device)),
        },
        other => ErrorResponse {
            error: other.kind().to_string(),
            message,
            rule: None,
            device: None,
        },
    };
    (status, Json(body))
}

fn parse_id(raw: &str) -> Result<Uuid, ApiError> {
    raw.parse::<Uuid>().map_err(|_| {
        error_response(DeviceError::Validation(format!(
            "Invalid device id: {}",
            raw
        )))
    })
}

fn parse_state(raw: &str) -> Result<DeviceState, ApiError> {
    raw.parse::<DeviceState>().map_err(error_response)
}

fn parse_body<T>(payload: Result<Json<T>, JsonRejection>) -> Result<T, ApiError> {
    payload
        .map(|Json(body)| body)
        .map_err(|e| error_response(DeviceError::Validation(e.body_text())))
}

fn to_responses(devices: Vec<Device>) -> Json<Vec<DeviceResponse>> {
    Json(devices.into_iter().map(DeviceResponse::from).collect())
}

/// Health check handler
pub async fn health_handler() -> impl IntoResponse {
    let version = version_info();
    Json(HealthResponse {
        status: "healthy".to_string(),
        service: "devices-api".to_string(),
        version: version.version,
    })
}

/// Version handler
pub async fn version_handler() -> impl IntoResponse {
    let version = version_info();
    Json(VersionResponse {
        version: version.version,
        git_hash: version.git_hash,
        build_time: version.build_time,
    })
}

/// Liveness text
pub async fn ping_handler() -> impl IntoResponse {
    PING_MESSAGE
}

/// Create handler
pub async fn create_device_handler(
    State(state): State<Arc<ServerState>>,
    payload: Result<Json<CreateDeviceRequest>, JsonRejection>,
) -> Result<impl IntoResponse, ApiError> {
    let request = parse_body(payload)?;

    let mut input = NewDevice::new(request.name, request.brand);
    if let Some(raw) = request.state.as_deref() {
        input = input.with_state(parse_state(raw)?);
    }

    let device = state.devices.create(input).await.map_err(error_response)?;
    let location = format!("/api/devices/{}", device.id);

    Ok((
        StatusCode::CREATED,
        [(header::LOCATION, location)],
        Json(DeviceResponse::from(device)),
    ))
}

/// Get-by-id handler
pub async fn get_device_handler(
    State(state): State<Arc<ServerState>>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    let id = parse_id(&id)?;
    let device = state.devices.get_by_id(id).await.map_err(error_response)?;
    Ok(Json(DeviceResponse::from(device)))
}

/// List handler
pub async fn list_devices_handler(
    State(state): State<Arc<ServerState>>,
) -> Result<impl IntoResponse, ApiError> {
    let devices = state.devices.get_all().await.map_err(error_response)?;
    Ok(to_responses(devices))
}

/// Brand filter handler
pub async fn devices_by_brand_handler(
    State(state): State<Arc<ServerState>>,
    Path(brand): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    let devices = state
        .devices
        .get_by_brand(&brand)
        .await
        .map_err(error_response)?;
    Ok(to_responses(devices))
}

/// State filter handler
pub async fn devices_by_state_handler(
    State(state): State<Arc<ServerState>>,
    Path(raw_state): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    let device_state = parse_state(&raw_state)?;
    let devices = state
        .devices
        .get_by_state(device_state)
        .await
        .map_err(error_response)?;
    Ok(to_responses(devices))
}

async fn update_device(
    state: &ServerState,
    raw_id: &str,
    request: UpdateDeviceRequest,
    mode: UpdateMode,
) -> Result<Json<DeviceResponse>, ApiError> {
    let id = parse_id(raw_id)?;

    let changes = DeviceChanges {
        name: request.name,
        brand: request.brand,
        state: request.state.as_deref().map(parse_state).transpose()?,
    };

    let device = state
        .devices
        .update(id, changes, mode)
        .await
        .map_err(error_response)?;
    Ok(Json(DeviceResponse::from(device)))
}

/// Full update handler (PUT)
pub async fn replace_device_handler(
    State(state): State<Arc<ServerState>>,
    Path(id): Path<String>,
    payload: Result<Json<UpdateDeviceRequest>, JsonRejection>,
) -> Result<impl IntoResponse, ApiError> {
    let request = parse_body(payload)?;
    update_device(&state, &id, request, UpdateMode::Full).await
}

/// Partial update handler (PATCH)
pub async fn patch_device_handler(
    State(state): State<Arc<ServerState>>,
    Path(id): Path<String>,
    payload: Result<Json<UpdateDeviceRequest>, JsonRejection>,
) -> Result<impl IntoResponse, ApiError> {
    let request = parse_body(payload)?;
    update_device(&state, &id, request, UpdateMode::Partial).await
}

/// Delete handler
pub async fn delete_device_handler(
    State(state): State<Arc<ServerState>>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    let id = parse_id(&id)?;
    state.devices.delete(id).await.map_err(error_response)?;
    Ok(Json(MessageResponse {
        message: format!("Device with ID {} deleted successfully.", id),
    }))
}
