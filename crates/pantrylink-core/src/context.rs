//! Per-request context.
//!
//! Handlers receive an explicit [`ApiRequest`] instead of reading ambient
//! global input sources. The context bundles everything a handler may
//! inspect: method, path, query string, headers, and the collected body,
//! with accessors that understand both JSON and URL-encoded payloads.

use bytes::Bytes;
use http::{HeaderMap, Method};
use serde_json::Value;
use uuid::Uuid;

/// A unique identifier for each request, using UUID v7.
///
/// UUID v7 is time-ordered, which makes it suitable for log correlation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct RequestId(Uuid);

impl RequestId {
    /// Creates a new unique request ID.
    #[must_use]
    pub fn new() -> Self {
        Self(Uuid::now_v7())
    }

    /// Returns the underlying UUID.
    #[must_use]
    pub const fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl Default for RequestId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for RequestId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Everything a handler may inspect about the incoming request.
///
/// # Example
///
/// ```
/// use pantrylink_core::ApiRequest;
/// use http::{HeaderMap, Method};
/// use bytes::Bytes;
///
/// let request = ApiRequest::new(
///     Method::POST,
///     "/api/action/scan",
///     Some("apikey=secret"),
///     HeaderMap::new(),
///     Bytes::from_static(b"barcode=4066600204404"),
/// );
///
/// assert_eq!(request.query_param("apikey").as_deref(), Some("secret"));
/// assert_eq!(request.body_field("barcode").as_deref(), Some("4066600204404"));
/// ```
#[derive(Debug, Clone)]
pub struct ApiRequest {
    /// Unique identifier for this request.
    request_id: RequestId,
    /// HTTP method as declared by the transport.
    method: Method,
    /// Request path without the query string.
    path: String,
    /// Raw query string, if any.
    query: Option<String>,
    /// Request headers.
    headers: HeaderMap,
    /// Collected request body.
    body: Bytes,
}

impl ApiRequest {
    /// Creates a new request context.
    #[must_use]
    pub fn new(
        method: Method,
        path: impl Into<String>,
        query: Option<&str>,
        headers: HeaderMap,
        body: Bytes,
    ) -> Self {
        Self {
            request_id: RequestId::new(),
            method,
            path: path.into(),
            query: query.map(ToString::to_string),
            headers,
            body,
        }
    }

    /// Returns the request ID.
    #[must_use]
    pub const fn request_id(&self) -> RequestId {
        self.request_id
    }

    /// Returns the HTTP method.
    #[must_use]
    pub const fn method(&self) -> &Method {
        &self.method
    }

    /// Returns the request path (no query string).
    #[must_use]
    pub fn path(&self) -> &str {
        &self.path
    }

    /// Returns the raw query string, if any.
    #[must_use]
    pub fn query_string(&self) -> Option<&str> {
        self.query.as_deref()
    }

    /// Returns the request headers.
    #[must_use]
    pub const fn headers(&self) -> &HeaderMap {
        &self.headers
    }

    /// Returns a header value as a string, if present and valid UTF-8.
    #[must_use]
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(name).and_then(|v| v.to_str().ok())
    }

    /// Returns the raw body bytes.
    #[must_use]
    pub const fn body(&self) -> &Bytes {
        &self.body
    }

    /// Returns the value of a query parameter.
    ///
    /// The last occurrence wins when a name is repeated, matching the
    /// original gateway's behavior.
    #[must_use]
    pub fn query_param(&self, name: &str) -> Option<String> {
        let query = self.query.as_deref()?;
        let pairs: Vec<(String, String)> = serde_urlencoded::from_str(query).ok()?;
        pairs
            .into_iter()
            .rev()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value)
    }

    /// Parses the body as a JSON value, if it is one.
    #[must_use]
    pub fn body_json(&self) -> Option<Value> {
        if self.body.is_empty() {
            return None;
        }
        serde_json::from_slice(&self.body).ok()
    }

    /// Returns a named field from the request body.
    ///
    /// A JSON object body is consulted first; a URL-encoded form body is
    /// the fallback. JSON strings, numbers, and booleans are all returned
    /// as their string form so callers can apply their own numeric
    /// validation with field-specific messages.
    #[must_use]
    pub fn body_field(&self, name: &str) -> Option<String> {
        if let Some(Value::Object(object)) = self.body_json() {
            return match object.get(name) {
                Some(Value::String(s)) => Some(s.clone()),
                Some(Value::Number(n)) => Some(n.to_string()),
                Some(Value::Bool(b)) => Some(b.to_string()),
                _ => None,
            };
        }
        self.form_field(name)
    }

    /// Returns a named field from a URL-encoded form body.
    #[must_use]
    pub fn form_field(&self, name: &str) -> Option<String> {
        if self.body.is_empty() {
            return None;
        }
        let pairs: Vec<(String, String)> = serde_urlencoded::from_bytes(&self.body).ok()?;
        pairs
            .into_iter()
            .rev()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value)
    }
}
