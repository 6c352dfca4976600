#![allow(dead_code, unused_imports)]

pub mod classifiers;
pub mod logs;
pub mod strategies;

pub use classifiers::*;

use axum::body::Body;
use axum::http::{HeaderMap, Request, StatusCode};
use axum::Router;
use serde_json::{json, Value};
use std::path::PathBuf;
use std::sync::Arc;
use tower::ServiceExt;

use heart_risk::config::HeartRiskConfig;
use heart_risk::health::HealthState;
use heart_risk::inference::{load_model, Classifier, InferenceService};
use heart_risk::web::{create_app, AppState};

/// Router plus the health flags it reads
pub struct TestApp {
    pub router: Router,
    pub health: Arc<HealthState>,
}

impl TestApp {
    /// App around `classifier`, not yet ready
    pub fn new(classifier: impl Classifier + 'static) -> Self {
        Self::with_config(Arc::new(classifier), &HeartRiskConfig::default())
    }

    /// App around the demo artifact shipped in `models/`
    pub fn with_demo_model() -> Self {
        let model = load_model(&demo_artifact_path()).expect("demo artifact should load");
        Self::with_config(model.classifier, &HeartRiskConfig::default())
    }

    pub fn with_config(classifier: Arc<dyn Classifier>, config: &HeartRiskConfig) -> Self {
        let health = Arc::new(HealthState::new());
        let state = AppState::new(config, InferenceService::new(classifier), None, health.clone());
        Self {
            router: create_app(Arc::new(state)),
            health,
        }
    }

    pub async fn get(&self, uri: &str) -> TestResponse {
        let request = Request::builder()
            .method("GET")
            .uri(uri)
            .body(Body::empty())
            .unwrap();
        send(&self.router, request).await
    }

    pub async fn predict(&self, body: &Value) -> TestResponse {
        self.predict_raw(body.to_string()).await
    }

    pub async fn predict_raw(&self, body: impl Into<Body>) -> TestResponse {
        let request = Request::builder()
            .method("POST")
            .uri("/predict/")
            .header("content-type", "application/json")
            .body(body.into())
            .unwrap();
        send(&self.router, request).await
    }
}

/// Collected response for assertions
pub struct TestResponse {
    pub status: StatusCode,
    pub headers: HeaderMap,
    pub body: Value,
}

impl TestResponse {
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(name).and_then(|v| v.to_str().ok())
    }

    pub fn process_time_ms(&self) -> f64 {
        self.header("x-process-time-ms")
            .expect("X-Process-Time-ms header should be present")
            .parse()
            .expect("X-Process-Time-ms should be a decimal number")
    }
}

pub async fn send(router: &Router, request: Request<Body>) -> TestResponse {
    let response = router.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let headers = response.headers().clone();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let body = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap_or_else(|_| {
            Value::String(String::from_utf8_lossy(&bytes).into_owned())
        })
    };

    TestResponse {
        status,
        headers,
        body,
    }
}

pub fn demo_artifact_path() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("models/model.json")
}

/// The 63-year-old reference patient
pub fn reference_body() -> Value {
    json!({
        "age": 63,
        "gender": 1,
        "cp": 3,
        "trestbps": 145,
        "chol": 233,
        "fbs": 1,
        "restecg": 0,
        "thalach": 150,
        "exang": 0,
        "oldpeak": 2.3,
        "slope": 0,
        "ca": 0,
        "thal": 1
    })
}

pub fn is_trace_id(value: &Value) -> bool {
    value
        .as_str()
        .is_some_and(|s| s.len() == 32 && s.chars().all(|c| matches!(c, '0'..='9' | 'a'..='f')))
}
