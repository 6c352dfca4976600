//! proptest strategies for prediction request bodies

use proptest::prelude::*;
use proptest::sample::subsequence;
use serde_json::{Map, Value};

use heart_risk::constants::FEATURE_ORDER;

/// Values inside the realistic clinical ranges
pub fn valid_features_strategy() -> impl Strategy<Value = [f64; 13]> {
    (
        (29u8..=77, 0u8..=1, 0u8..=3, 90u16..=200, 120u16..=570, 0u8..=1),
        (0u8..=1, 70u16..=210, 0u8..=1, 0u8..=65, 0u8..=2, 0u8..=3, 0u8..=3),
    )
        .prop_map(
            |(
                (age, gender, cp, trestbps, chol, fbs),
                (restecg, thalach, exang, oldpeak_tenths, slope, ca, thal),
            )| {
                [
                    f64::from(age),
                    f64::from(gender),
                    f64::from(cp),
                    f64::from(trestbps),
                    f64::from(chol),
                    f64::from(fbs),
                    f64::from(restecg),
                    f64::from(thalach),
                    f64::from(exang),
                    f64::from(oldpeak_tenths) / 10.0,
                    f64::from(slope),
                    f64::from(ca),
                    f64::from(thal),
                ]
            },
        )
}

/// Any finite numbers, including values no patient would have
pub fn arbitrary_features_strategy() -> impl Strategy<Value = [f64; 13]> {
    prop::array::uniform13(-1.0e4f64..1.0e4)
}

pub fn body_from_features(values: &[f64; 13]) -> Value {
    let mut object = Map::new();
    for (name, value) in FEATURE_ORDER.iter().zip(values) {
        object.insert((*name).to_string(), Value::from(*value));
    }
    Value::Object(object)
}

/// Non-empty set of feature names to drop from a body
pub fn missing_fields_strategy() -> impl Strategy<Value = Vec<&'static str>> {
    subsequence(FEATURE_ORDER.to_vec(), 1..=FEATURE_ORDER.len())
}

/// JSON values that are not acceptable as a feature value
pub fn non_numeric_value_strategy() -> impl Strategy<Value = Value> {
    prop_oneof![
        "[a-zA-Z ]{1,12}".prop_map(Value::String),
        any::<bool>().prop_map(Value::Bool),
        Just(Value::Null),
        Just(Value::Array(vec![Value::from(1)])),
        Just(serde_json::json!({"value": 1})),
    ]
}
