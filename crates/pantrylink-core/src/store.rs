//! The barcode-store contract.
//!
//! The store is the single source of truth for locally scanned barcodes,
//! the scan log, API keys, and the transaction mode. It is consumed
//! through this narrow interface so the server and workflows can be wired
//! with a real backend in production and a fake in tests.
//!
//! The contract is synchronous: the store owns whatever locking or
//! transaction discipline it needs to be safe under concurrent access
//! from independent requests.

use thiserror::Error;

use crate::error::ApiError;
use crate::mode::TransactionMode;
use crate::types::{BarcodeRecord, LogEntry};

/// Result type alias for store operations.
pub type StoreResult<T> = Result<T, StoreError>;

/// Error raised by a store backend.
#[derive(Debug, Error)]
pub enum StoreError {
    /// The backend failed to perform the operation.
    #[error("store error: {message}")]
    Backend {
        /// Backend-specific failure description.
        message: String,
    },
}

impl StoreError {
    /// Creates a backend error.
    #[must_use]
    pub fn backend(message: impl Into<String>) -> Self {
        Self::Backend {
            message: message.into(),
        }
    }
}

impl From<StoreError> for ApiError {
    fn from(err: StoreError) -> Self {
        Self::internal_with_source("Internal server error", err)
    }
}

/// Barcode records partitioned by resolution state.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct StoredBarcodes {
    /// Records with a looked-up name but no inventory link.
    pub known: Vec<BarcodeRecord>,
    /// Records with nothing resolved yet.
    pub unknown: Vec<BarcodeRecord>,
    /// Tare barcodes; kept out of the unresolved listing.
    pub tare: Vec<BarcodeRecord>,
}

/// Contract the gateway requires from the barcode store.
pub trait BarcodeStore: Send + Sync {
    /// Returns the record with the given store id.
    fn barcode_by_id(&self, id: i64) -> StoreResult<Option<BarcodeRecord>>;

    /// Returns the accumulated amount for a barcode, or 0 when no record
    /// exists. Absence and a zero amount are indistinguishable here; use
    /// [`Self::is_unknown_stored`] to tell them apart.
    fn stored_amount(&self, barcode: &str) -> StoreResult<f64>;

    /// Returns true if an unresolved record exists for the barcode.
    fn is_unknown_stored(&self, barcode: &str) -> StoreResult<bool>;

    /// Adds a scan to the unresolved set, accumulating the amount.
    /// Returns the record after the update.
    fn record_scan(
        &self,
        barcode: &str,
        best_before_in_days: Option<i64>,
        price: Option<f64>,
    ) -> StoreResult<BarcodeRecord>;

    /// Deletes the unresolved record for a barcode. Returns true if a
    /// record was deleted.
    fn delete_unknown(&self, barcode: &str) -> StoreResult<bool>;

    /// Deletes a record by store id. Returns true if a record was deleted.
    fn delete_barcode(&self, id: i64) -> StoreResult<bool>;

    /// Returns all stored records, partitioned by resolution state.
    fn stored_barcodes(&self) -> StoreResult<StoredBarcodes>;

    /// Appends an entry to the scan log.
    fn save_log(&self, text: &str) -> StoreResult<()>;

    /// Returns up to `limit` log entries, newest first.
    fn logs_with_id(&self, limit: usize) -> StoreResult<Vec<LogEntry>>;

    /// Returns the current transaction mode.
    fn transaction_mode(&self) -> StoreResult<TransactionMode>;

    /// Sets the transaction mode.
    fn set_transaction_mode(&self, mode: TransactionMode) -> StoreResult<()>;

    /// Returns true if the given API key is valid.
    fn is_valid_api_key(&self, key: &str) -> StoreResult<bool>;
}
