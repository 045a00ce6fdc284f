use serde::Deserialize;
use serde_json::Value;
use thiserror::Error;

use crate::api::dto::StoreReadingRequest;

/// Upper bound on a sanitized field identifier, in characters.
pub const MAX_FIELD_ID_LEN: usize = 100;

// ---------------------------------------------------------------------------
// Validation errors
//
// One variant per rejected check, in pipeline order. Display strings are
// surfaced verbatim to the caller in the 400 response body, so they must
// name the offending field.
// ---------------------------------------------------------------------------

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ValidationError {
    #[error("invalid field_id: expected 1-100 characters from A-Z, a-z, 0-9, '_' or '-'")]
    InvalidFieldId,

    #[error("missing image_base64")]
    MissingImage,

    #[error("missing sensor value: {0}")]
    MissingSensorValue(&'static str),

    #[error("sensor value is not a finite number: {0}")]
    NonNumericSensorValue(&'static str),
}

// ---------------------------------------------------------------------------
// SensorValue — polymorphic reading as sent by field gateways
//
// Gateways report readings either as JSON numbers or as decimal strings
// ("42.5"), depending on firmware. #[serde(untagged)] tries each variant in
// order; Other is the catch-all so a wrong-typed value still reaches the
// pipeline and fails with the right error kind instead of a body-level
// deserialization error.
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum SensorValue {
    Number(f64),
    Text(String),
    Other(Value),
}

impl SensorValue {
    /// Numeric coercion: numbers pass through, strings are trimmed and
    /// parsed. Returns `None` for unparsable or non-finite values and for
    /// anything that is neither a number nor a string.
    pub fn as_finite_f64(&self) -> Option<f64> {
        let v = match self {
            SensorValue::Number(v) => *v,
            SensorValue::Text(s) => s.trim().parse::<f64>().ok()?,
            SensorValue::Other(_) => return None,
        };
        v.is_finite().then_some(v)
    }
}

// ---------------------------------------------------------------------------
// ValidatedReading
// ---------------------------------------------------------------------------

/// A request body that passed the full validation pipeline.
///
/// Built from the raw DTO via `TryFrom` instead of being deserialised
/// directly, so every check runs in the documented order and reports its
/// own error kind.
#[derive(Debug, Clone)]
pub struct ValidatedReading {
    /// Sanitized field identifier — safe to use as a collection name.
    pub field_id: String,
    pub soil_moisture: f64,
    pub temperature: f64,
    pub humidity: f64,
    /// The image payload exactly as received (base64 or data-URI).
    pub image_base64: String,
}

impl TryFrom<&StoreReadingRequest> for ValidatedReading {
    type Error = ValidationError;

    fn try_from(req: &StoreReadingRequest) -> Result<Self, ValidationError> {
        // 1. field_id is the trust boundary: it becomes a collection name,
        //    so nothing outside the allow-list may pass.
        let field_id = sanitize_field_id(req.field_id.as_ref())?;

        // 2. Image presence. The contract only requires presence here —
        //    decodability is checked later and is non-fatal.
        let image = req
            .image_base64
            .as_ref()
            .ok_or(ValidationError::MissingImage)?;

        // 3. All three sensor values must be present before any coercion.
        let soil_moisture = require_sensor(&req.soil_moisture, "soil_moisture")?;
        let temperature = require_sensor(&req.temperature, "temperature")?;
        let humidity = require_sensor(&req.humidity, "humidity")?;

        // 4. Coerce each to a finite f64.
        let soil_moisture = coerce_sensor(soil_moisture, "soil_moisture")?;
        let temperature = coerce_sensor(temperature, "temperature")?;
        let humidity = coerce_sensor(humidity, "humidity")?;

        Ok(Self {
            field_id,
            soil_moisture,
            temperature,
            humidity,
            image_base64: raw_image_text(image),
        })
    }
}

/// Validate and trim a field identifier.
///
/// Accepts exactly: a JSON string that, after trimming, is 1 to
/// [`MAX_FIELD_ID_LEN`] characters drawn from ASCII letters, digits,
/// underscore, and hyphen. Everything else — wrong type, empty, over-length,
/// disallowed characters — is rejected.
pub fn sanitize_field_id(raw: Option<&Value>) -> Result<String, ValidationError> {
    let s = raw
        .and_then(Value::as_str)
        .ok_or(ValidationError::InvalidFieldId)?;
    let trimmed = s.trim();

    let len_ok = !trimmed.is_empty() && trimmed.len() <= MAX_FIELD_ID_LEN;
    let chars_ok = trimmed
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-');

    if len_ok && chars_ok {
        Ok(trimmed.to_owned())
    } else {
        Err(ValidationError::InvalidFieldId)
    }
}

fn require_sensor<'a>(
    value: &'a Option<SensorValue>,
    name: &'static str,
) -> Result<&'a SensorValue, ValidationError> {
    value
        .as_ref()
        .ok_or(ValidationError::MissingSensorValue(name))
}

fn coerce_sensor(value: &SensorValue, name: &'static str) -> Result<f64, ValidationError> {
    value
        .as_finite_f64()
        .ok_or(ValidationError::NonNumericSensorValue(name))
}

/// The image payload to store verbatim in the document.
///
/// Strings are stored as-is. A present-but-non-string value already passed
/// the presence check, so its JSON rendering is stored instead; it will
/// never decode, which degrades `saved_file` to null downstream.
fn raw_image_text(value: &Value) -> String {
    match value.as_str() {
        Some(s) => s.to_owned(),
        None => value.to_string(),
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    fn request(body: Value) -> StoreReadingRequest {
        serde_json::from_value(body).unwrap()
    }

    fn valid_body() -> Value {
        json!({
            "field_id": "Field_01",
            "soil_moisture": "42.5",
            "temperature": 21,
            "humidity": 60,
            "image_base64": "QQ=="
        })
    }

    // --- sanitize_field_id --------------------------------------------------

    #[test]
    fn field_id_plain_is_accepted() {
        let v = json!("Field_01");
        assert_eq!(sanitize_field_id(Some(&v)).unwrap(), "Field_01");
    }

    #[test]
    fn field_id_is_trimmed() {
        let v = json!("  plot-7  ");
        assert_eq!(sanitize_field_id(Some(&v)).unwrap(), "plot-7");
    }

    #[test]
    fn field_id_accepts_full_allowed_alphabet() {
        let v = json!("AZaz09_-");
        assert_eq!(sanitize_field_id(Some(&v)).unwrap(), "AZaz09_-");
    }

    #[test]
    fn field_id_at_max_length_is_accepted() {
        let long = "x".repeat(MAX_FIELD_ID_LEN);
        let v = json!(long.clone());
        assert_eq!(sanitize_field_id(Some(&v)).unwrap(), long);
    }

    #[test]
    fn field_id_over_max_length_is_rejected() {
        let v = json!("x".repeat(MAX_FIELD_ID_LEN + 1));
        assert_eq!(
            sanitize_field_id(Some(&v)),
            Err(ValidationError::InvalidFieldId)
        );
    }

    #[test]
    fn field_id_absent_is_rejected() {
        assert_eq!(sanitize_field_id(None), Err(ValidationError::InvalidFieldId));
    }

    #[test]
    fn field_id_non_string_is_rejected() {
        for v in [json!(42), json!(true), json!(["a"]), json!({"id": "a"})] {
            assert_eq!(
                sanitize_field_id(Some(&v)),
                Err(ValidationError::InvalidFieldId),
                "value: {v}"
            );
        }
    }

    #[test]
    fn field_id_whitespace_only_is_rejected() {
        let v = json!("   ");
        assert_eq!(
            sanitize_field_id(Some(&v)),
            Err(ValidationError::InvalidFieldId)
        );
    }

    #[test]
    fn field_id_disallowed_characters_are_rejected() {
        for s in ["bad id!", "a.b", "semi;colon", "slash/", "ünicode", "a b"] {
            let v = json!(s);
            assert_eq!(
                sanitize_field_id(Some(&v)),
                Err(ValidationError::InvalidFieldId),
                "value: {s:?}"
            );
        }
    }

    // --- SensorValue coercion -----------------------------------------------

    #[test]
    fn sensor_number_passes_through() {
        let v: SensorValue = serde_json::from_str("21").unwrap();
        assert_eq!(v.as_finite_f64(), Some(21.0));
    }

    #[test]
    fn sensor_float_passes_through() {
        let v: SensorValue = serde_json::from_str("42.5").unwrap();
        assert_eq!(v.as_finite_f64(), Some(42.5));
    }

    #[test]
    fn sensor_numeric_string_is_parsed() {
        let v: SensorValue = serde_json::from_str(r#""42.5""#).unwrap();
        assert_eq!(v.as_finite_f64(), Some(42.5));
    }

    #[test]
    fn sensor_string_with_whitespace_is_parsed() {
        let v: SensorValue = serde_json::from_str(r#"" -3.25 ""#).unwrap();
        assert_eq!(v.as_finite_f64(), Some(-3.25));
    }

    #[test]
    fn sensor_non_numeric_string_fails_coercion() {
        let v: SensorValue = serde_json::from_str(r#""wet""#).unwrap();
        assert_eq!(v.as_finite_f64(), None);
    }

    #[test]
    fn sensor_empty_string_fails_coercion() {
        let v: SensorValue = serde_json::from_str(r#""""#).unwrap();
        assert_eq!(v.as_finite_f64(), None);
    }

    #[test]
    fn sensor_infinity_string_fails_coercion() {
        let v: SensorValue = serde_json::from_str(r#""inf""#).unwrap();
        assert_eq!(v.as_finite_f64(), None);
    }

    #[test]
    fn sensor_bool_fails_coercion() {
        let v: SensorValue = serde_json::from_str("true").unwrap();
        assert_eq!(v.as_finite_f64(), None);
    }

    // --- Pipeline -----------------------------------------------------------

    #[test]
    fn valid_request_passes_pipeline() {
        let req = request(valid_body());
        let r = ValidatedReading::try_from(&req).unwrap();
        assert_eq!(r.field_id, "Field_01");
        assert_eq!(r.soil_moisture, 42.5);
        assert_eq!(r.temperature, 21.0);
        assert_eq!(r.humidity, 60.0);
        assert_eq!(r.image_base64, "QQ==");
    }

    #[test]
    fn field_id_is_trimmed_through_pipeline() {
        let mut body = valid_body();
        body["field_id"] = json!("  Field_01  ");
        let r = ValidatedReading::try_from(&request(body)).unwrap();
        assert_eq!(r.field_id, "Field_01");
    }

    #[test]
    fn invalid_field_id_wins_over_missing_image() {
        let body = json!({ "field_id": "bad id!" });
        let err = ValidatedReading::try_from(&request(body)).unwrap_err();
        assert_eq!(err, ValidationError::InvalidFieldId);
    }

    #[test]
    fn missing_image_wins_over_missing_sensors() {
        let body = json!({ "field_id": "Field_01" });
        let err = ValidatedReading::try_from(&request(body)).unwrap_err();
        assert_eq!(err, ValidationError::MissingImage);
    }

    #[test]
    fn null_image_counts_as_missing() {
        let mut body = valid_body();
        body["image_base64"] = Value::Null;
        let err = ValidatedReading::try_from(&request(body)).unwrap_err();
        assert_eq!(err, ValidationError::MissingImage);
    }

    #[test]
    fn missing_sensor_is_reported_by_name() {
        let mut body = valid_body();
        body.as_object_mut().unwrap().remove("humidity");
        let err = ValidatedReading::try_from(&request(body)).unwrap_err();
        assert_eq!(err, ValidationError::MissingSensorValue("humidity"));
    }

    #[test]
    fn null_sensor_counts_as_missing() {
        let mut body = valid_body();
        body["temperature"] = Value::Null;
        let err = ValidatedReading::try_from(&request(body)).unwrap_err();
        assert_eq!(err, ValidationError::MissingSensorValue("temperature"));
    }

    #[test]
    fn presence_of_all_sensors_is_checked_before_coercion() {
        // soil_moisture is non-numeric AND humidity is absent: the presence
        // check across all three runs first, so the missing one wins.
        let body = json!({
            "field_id": "Field_01",
            "soil_moisture": "wet",
            "temperature": 21,
            "image_base64": "QQ=="
        });
        let err = ValidatedReading::try_from(&request(body)).unwrap_err();
        assert_eq!(err, ValidationError::MissingSensorValue("humidity"));
    }

    #[test]
    fn non_numeric_sensor_is_reported_by_name() {
        let mut body = valid_body();
        body["soil_moisture"] = json!("wet");
        let err = ValidatedReading::try_from(&request(body)).unwrap_err();
        assert_eq!(err, ValidationError::NonNumericSensorValue("soil_moisture"));
    }

    #[test]
    fn wrong_typed_sensor_is_reported_as_non_numeric() {
        let mut body = valid_body();
        body["humidity"] = json!([60]);
        let err = ValidatedReading::try_from(&request(body)).unwrap_err();
        assert_eq!(err, ValidationError::NonNumericSensorValue("humidity"));
    }

    #[test]
    fn database_name_in_body_is_ignored() {
        let mut body = valid_body();
        body["database_name"] = json!("SomewhereElse");
        let r = ValidatedReading::try_from(&request(body)).unwrap();
        assert_eq!(r.field_id, "Field_01");
    }

    #[test]
    fn non_string_image_passes_presence_and_is_stored_as_json() {
        let mut body = valid_body();
        body["image_base64"] = json!(12345);
        let r = ValidatedReading::try_from(&request(body)).unwrap();
        assert_eq!(r.image_base64, "12345");
    }
}
