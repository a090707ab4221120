//! The scan-processing contract.
//!
//! The scan endpoint validates its input and then hands the barcode to a
//! processor that decides what the scan *means*: a command barcode that
//! switches the transaction mode, or a product scan to be recorded. The
//! processor returns a human-readable result line for the scanner display.

use async_trait::async_trait;

use crate::error::ApiError;

/// A validated scan, ready for interpretation.
#[derive(Debug, Clone, PartialEq)]
pub struct ScanRequest {
    /// The scanned barcode.
    pub barcode: String,
    /// Best-before offset supplied with the scan, in days.
    pub best_before_in_days: Option<i64>,
    /// Price supplied with the scan.
    pub price: Option<f64>,
}

impl ScanRequest {
    /// Creates a scan request with no extra attributes.
    #[must_use]
    pub fn new(barcode: impl Into<String>) -> Self {
        Self {
            barcode: barcode.into(),
            best_before_in_days: None,
            price: None,
        }
    }
}

/// Interprets scans on behalf of the scan endpoint.
#[async_trait]
pub trait ScanProcessor: Send + Sync {
    /// Processes one scan and returns the display text for the scanner.
    async fn process(&self, scan: ScanRequest) -> Result<String, ApiError>;
}
