use axum::{extract::State, Json};
use mongodb::bson::DateTime;
use tracing::info;
use utoipa::OpenApi;

use super::{
    dto::{StoreReadingRequest, StoreReadingResponse},
    errors::ApiError,
    AppState,
};
use crate::{db::models::Reading, image_store, validate::ValidatedReading};

// ---------------------------------------------------------------------------
// Ingestion
// ---------------------------------------------------------------------------

/// Validate one sensor payload, persist its image locally (best-effort), and
/// insert the reading into the collection named after the sanitized field id.
#[utoipa::path(
    post,
    path = "/api/store-reading",
    request_body = StoreReadingRequest,
    responses(
        (status = 200, description = "Reading stored", body = StoreReadingResponse),
        (status = 400, description = "Payload failed validation"),
        (status = 500, description = "Store interaction failed"),
    ),
    tag = "ingest"
)]
pub async fn store_reading(
    State(state): State<AppState>,
    Json(req): Json<StoreReadingRequest>,
) -> Result<Json<StoreReadingResponse>, ApiError> {
    let reading = ValidatedReading::try_from(&req)?;

    // Best-effort file copy. Decode or write failures degrade saved_file to
    // null; they never abort the request.
    let saved_file = match image_store::decode_image(&reading.image_base64) {
        Some(bytes) => image_store::save(&state.upload_dir, &reading.field_id, &bytes).await,
        None => None,
    };

    let doc = Reading {
        id: None,
        field_id: reading.field_id,
        soil_moisture: reading.soil_moisture,
        temperature: reading.temperature,
        humidity: reading.humidity,
        image_base64: reading.image_base64,
        saved_file: saved_file.clone(),
        created_at: DateTime::now(),
    };
    let inserted_id = state.store.insert_reading(&doc).await?;

    info!(collection = %doc.field_id, id = %inserted_id, "Reading stored");

    Ok(Json(StoreReadingResponse {
        success: true,
        inserted_id: inserted_id.to_hex(),
        collection: doc.field_id,
        saved_file,
    }))
}

// ---------------------------------------------------------------------------
// Health checks
// ---------------------------------------------------------------------------

/// Plain-text confirmation hit by field gateways and uptime monitors.
#[utoipa::path(
    get,
    path = "/",
    responses(
        (status = 200, description = "Service is running"),
    ),
    tag = "system"
)]
pub async fn root() -> &'static str {
    "AgriVision IoT ingestion service is running"
}

/// Returns `200 OK` with `{"status":"ok"}` when the server is running.
#[utoipa::path(
    get,
    path = "/health",
    responses(
        (status = 200, description = "Service is healthy"),
    ),
    tag = "system"
)]
pub async fn health() -> Json<serde_json::Value> {
    Json(serde_json::json!({ "status": "ok" }))
}

// ---------------------------------------------------------------------------
// OpenAPI spec
// ---------------------------------------------------------------------------

#[derive(OpenApi)]
#[openapi(
    paths(store_reading, root, health),
    components(schemas(StoreReadingRequest, StoreReadingResponse)),
    tags(
        (name = "ingest", description = "Sensor reading ingestion"),
        (name = "system", description = "System endpoints"),
    ),
    info(
        title = "AgriVision Ingestion API",
        version = "0.1.0",
        description = "Ingestion endpoint for AgriVision IoT field sensor readings"
    )
)]
pub struct ApiDoc;

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
