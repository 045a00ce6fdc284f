//! Best-effort persistence of uploaded sensor images.
//!
//! Decode or filesystem errors are logged and swallowed — a lost image copy
//! must never fail the ingestion request that carried it.

use base64::{engine::general_purpose::STANDARD as BASE64, Engine as _};
use tokio::fs;
use tracing::{debug, warn};

/// Decode an image payload into raw bytes.
///
/// Accepts either a bare base64 string or a data-URI of the form
/// `data:<mime>;base64,<payload>`; the URI prefix is stripped before
/// decoding. Returns `None` (with a warning) when the payload does not
/// decode.
pub fn decode_image(raw: &str) -> Option<Vec<u8>> {
    match BASE64.decode(strip_data_uri(raw).trim()) {
        Ok(bytes) => Some(bytes),
        Err(e) => {
            warn!(error = %e, "image_store: undecodable image payload — skipping file write");
            None
        }
    }
}

/// Strip a `data:<mime>;base64,` prefix, if present.
fn strip_data_uri(raw: &str) -> &str {
    if raw.starts_with("data:") {
        if let Some((_, payload)) = raw.split_once(";base64,") {
            return payload;
        }
    }
    raw
}

/// Write image bytes to `{dir}/{field_id}_{millis}.jpg`, creating `dir`
/// recursively if missing. Returns the written path, or `None` on any
/// filesystem error.
pub async fn save(dir: &str, field_id: &str, bytes: &[u8]) -> Option<String> {
    let ts = chrono::Utc::now().timestamp_millis();
    let path = format!("{dir}/{field_id}_{ts}.jpg");

    if let Err(e) = fs::create_dir_all(dir).await {
        warn!(dir = %dir, error = %e, "image_store: failed to create upload directory");
        return None;
    }

    if let Err(e) = fs::write(&path, bytes).await {
        warn!(path = %path, error = %e, "image_store: failed to write image file");
        return None;
    }

    debug!(path = %path, bytes = bytes.len(), "image_store: saved");
    Some(path)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
