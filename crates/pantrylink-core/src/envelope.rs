//! The JSON response envelope.
//!
//! Every endpoint returns the same wire shape:
//!
//! ```json
//! { "data": <object|null>, "result": { "result": "<label>", "http_code": <int> } }
//! ```
//!
//! The transport status code is always taken from `result.http_code`, so
//! the envelope and the HTTP status can never diverge.

use http::StatusCode;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// The `result` object inside the envelope.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResultInfo {
    /// Human-readable result label (`"OK"` on success).
    pub result: String,
    /// HTTP status code, duplicated into the body for scanner clients
    /// that cannot read transport status.
    pub http_code: u16,
}

/// Response envelope returned by every API endpoint.
///
/// An `ApiResponse` is created once by the handler (or by error
/// conversion) and never mutated afterwards.
///
/// # Example
///
/// ```
/// use pantrylink_core::ApiResponse;
/// use serde_json::json;
///
/// let response = ApiResponse::ok(json!({ "mode": 2 }));
/// assert_eq!(response.result.result, "OK");
/// assert_eq!(response.result.http_code, 200);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ApiResponse {
    /// Payload, or `null` for empty and error responses.
    pub data: Option<Value>,
    /// Result label and status code.
    pub result: ResultInfo,
}

impl ApiResponse {
    /// Creates a successful envelope with a payload.
    #[must_use]
    pub fn ok(data: Value) -> Self {
        Self {
            data: Some(data),
            result: ResultInfo {
                result: "OK".to_string(),
                http_code: StatusCode::OK.as_u16(),
            },
        }
    }

    /// Creates a successful envelope with no payload.
    #[must_use]
    pub fn ok_empty() -> Self {
        Self {
            data: None,
            result: ResultInfo {
                result: "OK".to_string(),
                http_code: StatusCode::OK.as_u16(),
            },
        }
    }

    /// Creates an error envelope with the given label and status.
    #[must_use]
    pub fn error(label: impl Into<String>, status: StatusCode) -> Self {
        Self {
            data: None,
            result: ResultInfo {
                result: label.into(),
                http_code: status.as_u16(),
            },
        }
    }

    /// Returns the HTTP status code to use for the transport response.
    ///
    /// Falls back to 500 if the stored code is somehow out of range;
    /// the constructors only ever store valid codes.
    #[must_use]
    pub fn status_code(&self) -> StatusCode {
        StatusCode::from_u16(self.result.http_code)
            .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn ok_envelope_shape() {
        let response = ApiResponse::ok(json!({ "deleted": true }));
        let wire = serde_json::to_value(&response).unwrap();
        assert_eq!(
            wire,
            json!({
                "data": { "deleted": true },
                "result": { "result": "OK", "http_code": 200 }
            })
        );
    }

    #[test]
    fn ok_empty_has_null_data() {
        let response = ApiResponse::ok_empty();
        let wire = serde_json::to_value(&response).unwrap();
        assert_eq!(wire["data"], Value::Null);
        assert_eq!(wire["result"]["http_code"], 200);
    }

    #[test]
    fn error_envelope_shape() {
        let response = ApiResponse::error("API call not found", StatusCode::NOT_FOUND);
        let wire = serde_json::to_value(&response).unwrap();
        assert_eq!(
            wire,
            json!({
                "data": null,
                "result": { "result": "API call not found", "http_code": 404 }
            })
        );
    }

    #[test]
    fn transport_status_comes_from_http_code() {
        let response = ApiResponse::error("Unauthorized", StatusCode::UNAUTHORIZED);
        assert_eq!(response.status_code(), StatusCode::UNAUTHORIZED);
        assert_eq!(response.status_code().as_u16(), response.result.http_code);
    }
}
