//! # Request Validation
//!
//! Turns an arbitrary JSON body into a [`FeatureRecord`] or a [`ValidationError`]
//! enumerating every offending field. Nothing reaches the model without passing
//! through here.
//!
//! Acceptance rules:
//! - the body must be a JSON object
//! - each of the 13 schema fields must be present
//! - each value must be a JSON number or a string holding a finite number
//! - unknown fields are rejected
//!
//! Realistic clinical ranges are documented in [`DOMAIN_RANGES`] and only
//! enforced when the validator is built with `enforce_domain_ranges`.

use serde::Serialize;
use serde_json::{Map, Value};
use std::fmt;
use thiserror::Error;

use crate::constants::{FEATURE_COUNT, FEATURE_ORDER};
use crate::models::{FeatureRecord, FeatureVector};

/// Longest string accepted as a numeric literal
const MAX_NUMERIC_STRING_LENGTH: usize = 64;

/// Pseudo-field name used when the body as a whole is unusable
pub const BODY_FIELD: &str = "body";

/// Category of a single field violation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ViolationKind {
    Missing,
    UnknownField,
    NotANumber,
    OutOfRange,
    InvalidBody,
}

impl fmt::Display for ViolationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::Missing => "missing",
            Self::UnknownField => "unknown_field",
            Self::NotANumber => "not_a_number",
            Self::OutOfRange => "out_of_range",
            Self::InvalidBody => "invalid_body",
        };
        f.write_str(label)
    }
}

/// One offending field, serialized into the 422 response body
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FieldViolation {
    pub field: String,
    #[serde(rename = "type")]
    pub kind: ViolationKind,
    #[serde(rename = "msg")]
    pub message: String,
}

impl FieldViolation {
    fn new(field: impl Into<String>, kind: ViolationKind, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            kind,
            message: message.into(),
        }
    }
}

/// Request failed schema validation
#[derive(Debug, Clone, PartialEq, Error)]
#[error("Request validation failed for field(s): {}", field_list(.violations))]
pub struct ValidationError {
    pub violations: Vec<FieldViolation>,
}

impl ValidationError {
    pub fn invalid_body(message: impl Into<String>) -> Self {
        Self {
            violations: vec![FieldViolation::new(
                BODY_FIELD,
                ViolationKind::InvalidBody,
                message,
            )],
        }
    }

    pub fn field_names(&self) -> Vec<&str> {
        self.violations.iter().map(|v| v.field.as_str()).collect()
    }

    pub fn has_violation(&self, field: &str, kind: ViolationKind) -> bool {
        self.violations
            .iter()
            .any(|v| v.field == field && v.kind == kind)
    }
}

fn field_list(violations: &[FieldViolation]) -> String {
    violations
        .iter()
        .map(|v| v.field.as_str())
        .collect::<Vec<_>>()
        .join(", ")
}

/// Inclusive realistic range for one feature
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DomainRange {
    pub min: f64,
    pub max: f64,
    /// Categorical codes must be whole numbers
    pub integral: bool,
}

const fn continuous(min: f64, max: f64) -> DomainRange {
    DomainRange {
        min,
        max,
        integral: false,
    }
}

const fn categorical(min: f64, max: f64) -> DomainRange {
    DomainRange {
        min,
        max,
        integral: true,
    }
}

/// Ranges observed in the synthetic test-data generator, aligned with `FEATURE_ORDER`
pub const DOMAIN_RANGES: [DomainRange; FEATURE_COUNT] = [
    continuous(29.0, 77.0),   // age
    categorical(0.0, 1.0),    // gender
    categorical(0.0, 3.0),    // cp
    continuous(90.0, 200.0),  // trestbps
    continuous(120.0, 570.0), // chol
    categorical(0.0, 1.0),    // fbs
    categorical(0.0, 1.0),    // restecg
    continuous(70.0, 210.0),  // thalach
    categorical(0.0, 1.0),    // exang
    continuous(0.0, 6.5),     // oldpeak
    categorical(0.0, 2.0),    // slope
    categorical(0.0, 3.0),    // ca
    categorical(0.0, 3.0),    // thal
];

impl DomainRange {
    pub fn contains(&self, value: f64) -> bool {
        value >= self.min && value <= self.max && (!self.integral || value.fract() == 0.0)
    }
}

/// Look up the documented range for a feature
pub fn domain_range(feature: &str) -> Option<DomainRange> {
    FEATURE_ORDER
        .iter()
        .position(|name| *name == feature)
        .map(|index| DOMAIN_RANGES[index])
}

/// Schema validator for inbound prediction requests
#[derive(Debug, Clone, Copy, Default)]
pub struct RequestValidator {
    enforce_domain_ranges: bool,
}

impl RequestValidator {
    pub fn new(enforce_domain_ranges: bool) -> Self {
        Self {
            enforce_domain_ranges,
        }
    }

    pub fn enforces_domain_ranges(&self) -> bool {
        self.enforce_domain_ranges
    }

    /// Parse raw request bytes then validate
    pub fn validate_bytes(&self, body: &[u8]) -> Result<FeatureRecord, ValidationError> {
        let value: Value = serde_json::from_slice(body)
            .map_err(|e| ValidationError::invalid_body(format!("Body is not valid JSON: {e}")))?;
        self.validate(&value)
    }

    /// Validate a JSON value against the 13-field schema
    pub fn validate(&self, value: &Value) -> Result<FeatureRecord, ValidationError> {
        let Value::Object(map) = value else {
            return Err(ValidationError::invalid_body(format!(
                "Body must be a JSON object, got {}",
                json_type_name(value)
            )));
        };

        let mut violations = Vec::new();
        let mut values = [0.0_f64; FEATURE_COUNT];

        for (index, name) in FEATURE_ORDER.iter().enumerate() {
            match map.get(*name) {
                None => violations.push(FieldViolation::new(
                    *name,
                    ViolationKind::Missing,
                    "Field required",
                )),
                Some(raw) => match coerce_number(raw) {
                    Some(number) => {
                        if self.enforce_domain_ranges && !DOMAIN_RANGES[index].contains(number) {
                            let range = DOMAIN_RANGES[index];
                            violations.push(FieldViolation::new(
                                *name,
                                ViolationKind::OutOfRange,
                                format!(
                                    "Value {number} outside [{}, {}]{}",
                                    range.min,
                                    range.max,
                                    if range.integral { " (whole numbers only)" } else { "" }
                                ),
                            ));
                        }
                        values[index] = number;
                    }
                    None => violations.push(FieldViolation::new(
                        *name,
                        ViolationKind::NotANumber,
                        format!(
                            "Value is not a valid number (got {})",
                            json_type_name(raw)
                        ),
                    )),
                },
            }
        }

        violations.extend(unknown_fields(map));

        if violations.is_empty() {
            Ok(FeatureRecord::from_feature_vector(FeatureVector(values)))
        } else {
            Err(ValidationError { violations })
        }
    }
}

/// Unknown keys, sorted for deterministic error bodies
fn unknown_fields(map: &Map<String, Value>) -> Vec<FieldViolation> {
    let mut unknown: Vec<&String> = map
        .keys()
        .filter(|key| !FEATURE_ORDER.contains(&key.as_str()))
        .collect();
    unknown.sort();

    unknown
        .into_iter()
        .map(|key| {
            FieldViolation::new(
                key.clone(),
                ViolationKind::UnknownField,
                "Extra inputs are not permitted",
            )
        })
        .collect()
}

/// Numbers pass through; numeric strings are coerced; everything else is rejected
fn coerce_number(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64().filter(|f| f.is_finite()),
        Value::String(s) if s.len() <= MAX_NUMERIC_STRING_LENGTH => s
            .trim()
            .parse::<f64>()
            .ok()
            .filter(|f| f.is_finite()),
        _ => None,
    }
}

fn json_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn valid_body() -> Value {
        json!({
            "age": 63, "gender": 1, "cp": 3, "trestbps": 145, "chol": 233, "fbs": 1,
            "restecg": 0, "thalach": 150, "exang": 0, "oldpeak": 2.3, "slope": 0,
            "ca": 0, "thal": 1
        })
    }

    #[test]
    fn test_accepts_valid_record() {
        let record = RequestValidator::default().validate(&valid_body()).unwrap();
        assert_eq!(record.age, 63.0);
        assert_eq!(record.oldpeak, 2.3);
        assert_eq!(record.thal, 1.0);
    }

    #[test]
    fn test_coerces_numeric_strings() {
        let mut body = valid_body();
        body["chol"] = json!("233.5");
        let record = RequestValidator::default().validate(&body).unwrap();
        assert_eq!(record.chol, 233.5);
    }

    #[test]
    fn test_rejects_non_numeric_string() {
        let mut body = valid_body();
        body["age"] = json!("sixty");
        let err = RequestValidator::default().validate(&body).unwrap_err();
        assert_eq!(err.field_names(), vec!["age"]);
        assert!(err.has_violation("age", ViolationKind::NotANumber));
    }

    #[test]
    fn test_rejects_booleans_and_nulls() {
        let mut body = valid_body();
        body["fbs"] = json!(true);
        body["ca"] = Value::Null;
        let err = RequestValidator::default().validate(&body).unwrap_err();
        assert_eq!(err.field_names(), vec!["fbs", "ca"]);
    }

    #[test]
    fn test_reports_every_missing_field_in_order() {
        let mut body = valid_body();
        let map = body.as_object_mut().unwrap();
        map.remove("thal");
        map.remove("age");
        let err = RequestValidator::default().validate(&body).unwrap_err();
        assert_eq!(err.field_names(), vec!["age", "thal"]);
        assert!(err
            .violations
            .iter()
            .all(|v| v.kind == ViolationKind::Missing));
    }

    #[test]
    fn test_rejects_unknown_fields_sorted() {
        let mut body = valid_body();
        body["zeta"] = json!(1);
        body["bmi"] = json!(22.1);
        let err = RequestValidator::default().validate(&body).unwrap_err();
        assert_eq!(err.field_names(), vec!["bmi", "zeta"]);
        assert!(err.has_violation("bmi", ViolationKind::UnknownField));
    }

    #[test]
    fn test_rejects_non_object_body() {
        let err = RequestValidator::default()
            .validate(&json!([1, 2, 3]))
            .unwrap_err();
        assert!(err.has_violation(BODY_FIELD, ViolationKind::InvalidBody));
    }

    #[test]
    fn test_rejects_malformed_json_bytes() {
        let err = RequestValidator::default()
            .validate_bytes(b"{\"age\": 63,")
            .unwrap_err();
        assert!(err.has_violation(BODY_FIELD, ViolationKind::InvalidBody));
    }

    #[test]
    fn test_permissive_by_default_on_ranges() {
        let mut body = valid_body();
        body["age"] = json!(-4);
        assert!(RequestValidator::default().validate(&body).is_ok());
    }

    #[test]
    fn test_enforced_domain_ranges() {
        let validator = RequestValidator::new(true);
        assert!(validator.validate(&valid_body()).is_ok());

        let mut body = valid_body();
        body["age"] = json!(120);
        body["cp"] = json!(1.5);
        body["oldpeak"] = json!(6.5);
        let err = validator.validate(&body).unwrap_err();
        assert_eq!(err.field_names(), vec!["age", "cp"]);
        assert!(err
            .violations
            .iter()
            .all(|v| v.kind == ViolationKind::OutOfRange));
    }

    #[test]
    fn test_domain_range_lookup() {
        let oldpeak = domain_range("oldpeak").unwrap();
        assert!(!oldpeak.integral);
        assert!(oldpeak.contains(6.5));
        assert!(!oldpeak.contains(6.6));
        assert!(domain_range("bmi").is_none());
    }

    #[test]
    fn test_error_display_lists_fields() {
        let mut body = valid_body();
        body["age"] = json!("sixty");
        let err = RequestValidator::default().validate(&body).unwrap_err();
        assert!(err.to_string().contains("age"));
    }
}
