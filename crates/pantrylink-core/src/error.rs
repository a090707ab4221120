//! Error types for PantryLink.
//!
//! [`ApiError`] is the single error type handlers and workflows return.
//! Every variant maps to an HTTP status code and converts to the standard
//! response envelope, so errors never escape as transport-level failures.
//!
//! Upstream failures come in two flavors at the workflow layer: *hard*
//! failures abort the remaining steps and surface here as
//! [`ApiError::Upstream`]; *soft* failures never become an `ApiError` at
//! all: the workflow records them and continues (see the workflow crate's
//! step outcome types).

use http::StatusCode;
use thiserror::Error;

use crate::envelope::ApiResponse;

/// Result type alias using [`ApiError`].
pub type ApiResult<T> = Result<T, ApiError>;

/// Standard error type for PantryLink handlers and workflows.
///
/// # Example
///
/// ```
/// use pantrylink_core::ApiError;
///
/// fn require_barcode(barcode: &str) -> Result<(), ApiError> {
///     if barcode.is_empty() {
///         return Err(ApiError::validation("No barcode supplied"));
///     }
///     Ok(())
/// }
///
/// let err = require_barcode("").unwrap_err();
/// assert_eq!(err.status_code().as_u16(), 400);
/// ```
#[derive(Error, Debug)]
pub enum ApiError {
    /// Malformed or missing input.
    #[error("{message}")]
    Validation {
        /// Human-readable error message.
        message: String,
    },

    /// Missing or invalid API key.
    #[error("Unauthorized")]
    Unauthorized,

    /// A referenced entity does not exist.
    #[error("{message}")]
    NotFound {
        /// Human-readable error message.
        message: String,
    },

    /// A call to an external service failed and aborted the workflow.
    #[error("{message}")]
    Upstream {
        /// Message passed through from the failed call.
        message: String,
    },

    /// Unexpected internal fault.
    #[error("{message}")]
    Internal {
        /// Human-readable error message.
        message: String,
        /// The underlying error (not exposed to clients).
        #[source]
        source: Option<anyhow::Error>,
    },
}

impl ApiError {
    /// Creates a validation error.
    #[must_use]
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation {
            message: message.into(),
        }
    }

    /// Creates a not-found error.
    #[must_use]
    pub fn not_found(message: impl Into<String>) -> Self {
        Self::NotFound {
            message: message.into(),
        }
    }

    /// Creates an upstream (hard) failure.
    #[must_use]
    pub fn upstream(message: impl Into<String>) -> Self {
        Self::Upstream {
            message: message.into(),
        }
    }

    /// Creates an internal error.
    #[must_use]
    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal {
            message: message.into(),
            source: None,
        }
    }

    /// Creates an internal error with a source error.
    pub fn internal_with_source(
        message: impl Into<String>,
        source: impl Into<anyhow::Error>,
    ) -> Self {
        Self::Internal {
            message: message.into(),
            source: Some(source.into()),
        }
    }

    /// Returns the HTTP status code for this error.
    #[must_use]
    pub const fn status_code(&self) -> StatusCode {
        match self {
            Self::Validation { .. } => StatusCode::BAD_REQUEST,
            Self::Unauthorized => StatusCode::UNAUTHORIZED,
            Self::NotFound { .. } => StatusCode::NOT_FOUND,
            Self::Upstream { .. } | Self::Internal { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Converts this error into the standard response envelope.
    ///
    /// The envelope carries `data: null`, the error message as the result
    /// label, and this error's status code as `http_code`.
    #[must_use]
    pub fn to_envelope(&self) -> ApiResponse {
        ApiResponse::error(self.to_string(), self.status_code())
    }
}

impl From<serde_json::Error> for ApiError {
    fn from(err: serde_json::Error) -> Self {
        Self::internal_with_source("Internal server error", err)
    }
}
