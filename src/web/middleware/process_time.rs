//! # Processing Time Middleware
//!
//! Measures wall-clock time from request arrival to response and reports it
//! in milliseconds via the `X-Process-Time-ms` header.

use axum::extract::Request;
use axum::http::HeaderValue;
use axum::middleware::Next;
use axum::response::Response;
use std::time::Instant;

use crate::constants::headers::PROCESS_TIME_MS;

pub async fn process_time(request: Request, next: Next) -> Response {
    let started = Instant::now();

    let mut response = next.run(request).await;

    let elapsed_ms = started.elapsed().as_secs_f64() * 1000.0;
    if let Ok(value) = HeaderValue::from_str(&format_process_time(elapsed_ms)) {
        response.headers_mut().insert(PROCESS_TIME_MS, value);
    }

    response
}

/// Decimal milliseconds with two fractional digits
pub fn format_process_time(elapsed_ms: f64) -> String {
    format!("{elapsed_ms:.2}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_process_time() {
        assert_eq!(format_process_time(0.0), "0.00");
        assert_eq!(format_process_time(1.23456), "1.23");
        assert_eq!(format_process_time(1500.0), "1500.00");
    }

    #[test]
    fn test_formatted_value_parses_back() {
        let value: f64 = format_process_time(12.345_678).parse().unwrap();
        assert!(value >= 0.0);
    }
}
