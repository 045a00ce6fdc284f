use mongodb::bson::{oid::ObjectId, DateTime};
use serde::{Deserialize, Serialize};

/// One sensor sample, persisted in the collection named after its field.
///
/// Insert-only: readings are never mutated or deleted by this service.
/// `image_base64` keeps the payload exactly as received, alongside the
/// best-effort file copy referenced by `saved_file`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Reading {
    #[serde(rename = "_id", skip_serializing_if = "Option::is_none")]
    pub id: Option<ObjectId>,
    pub field_id: String,
    pub soil_moisture: f64,
    pub temperature: f64,
    pub humidity: f64,
    pub image_base64: String,
    /// Local path of the persisted image; `None` when decode or write failed.
    pub saved_file: Option<String>,
    pub created_at: DateTime,
}
