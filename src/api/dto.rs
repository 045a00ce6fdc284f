use serde::{Deserialize, Serialize};
use serde_json::Value;
use utoipa::ToSchema;

use crate::validate::SensorValue;

/// Request body for `POST /api/store-reading`.
///
/// Every field is loosely typed on purpose: the validation pipeline owns the
/// error vocabulary, so a wrong-typed field produces the documented 400
/// response instead of a serde-level rejection.
#[derive(Debug, Deserialize, ToSchema)]
pub struct StoreReadingRequest {
    /// Identifier of the reporting field deployment. Doubles as the target
    /// collection name after sanitization.
    #[serde(default)]
    #[schema(value_type = Option<String>)]
    pub field_id: Option<Value>,

    /// Number, or a decimal string such as `"42.5"`.
    #[serde(default)]
    #[schema(value_type = Option<f64>)]
    pub soil_moisture: Option<SensorValue>,

    /// Number, or a decimal string.
    #[serde(default)]
    #[schema(value_type = Option<f64>)]
    pub temperature: Option<SensorValue>,

    /// Number, or a decimal string.
    #[serde(default)]
    #[schema(value_type = Option<f64>)]
    pub humidity: Option<SensorValue>,

    /// Image as bare base64 or a `data:<mime>;base64,<payload>` URI.
    #[serde(default)]
    #[schema(value_type = Option<String>)]
    pub image_base64: Option<Value>,

    /// Accepted for compatibility and ignored — the active database is
    /// fixed by process configuration, never by caller input.
    #[serde(default)]
    #[schema(value_type = Option<String>)]
    pub database_name: Option<Value>,
}

/// Success response for `POST /api/store-reading`.
#[derive(Debug, Serialize, ToSchema)]
pub struct StoreReadingResponse {
    pub success: bool,
    /// Hex form of the store-assigned document id.
    #[serde(rename = "insertedId")]
    pub inserted_id: String,
    /// Collection the reading was written to (the sanitized field id).
    pub collection: String,
    /// Path of the local image copy, or null when decode/write failed.
    pub saved_file: Option<String>,
}
