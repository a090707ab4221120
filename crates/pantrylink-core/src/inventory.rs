//! Contracts for the remote inventory service and the product lookup.
//!
//! The inventory service is the Grocy-compatible system the gateway keeps
//! in sync; the lookup is a third-party barcode database consulted for
//! display names. Both are network collaborators, so their contracts are
//! async and their failures carry only a message; the *workflow* decides
//! whether a given failure is hard or soft.

use async_trait::async_trait;
use thiserror::Error;

use crate::types::{LookupResult, NewProduct, ProductInfo};

/// A failed call to an external service.
///
/// Deliberately carries no severity: the same error type is fatal in one
/// workflow step and merely logged in another. That policy lives at the
/// call site, not here.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("{message}")]
pub struct UpstreamError {
    /// Failure description from the underlying call.
    pub message: String,
}

impl UpstreamError {
    /// Creates an upstream error.
    #[must_use]
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// Contract the gateway requires from the remote inventory service.
#[async_trait]
pub trait InventoryService: Send + Sync {
    /// Fetches a product by id. `Ok(None)` means the service answered and
    /// the product does not exist.
    async fn product_info(&self, product_id: i64) -> Result<Option<ProductInfo>, UpstreamError>;

    /// Creates a product and returns its new id.
    async fn create_product(&self, product: &NewProduct) -> Result<i64, UpstreamError>;

    /// Attaches a barcode to a product.
    async fn add_barcode(&self, product_id: i64, barcode: &str) -> Result<(), UpstreamError>;

    /// Records purchased stock against a product.
    async fn add_stock(&self, product_id: i64, amount: f64) -> Result<(), UpstreamError>;
}

/// Contract for the third-party product lookup.
#[async_trait]
pub trait ProductLookup: Send + Sync {
    /// Looks a barcode up. `None` covers both "not found" and lookup
    /// failure; the listing endpoint treats them identically.
    async fn lookup(&self, barcode: &str) -> Option<LookupResult>;
}
