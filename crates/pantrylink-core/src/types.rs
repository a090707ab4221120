//! Domain types shared across the gateway.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// How far a locally stored barcode has been resolved.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ResolutionState {
    /// Scanned but not matched to anything yet.
    Unknown,
    /// Looked up by name but still not linked to an inventory product.
    Known,
    /// A tare barcode; excluded from the unresolved listing.
    Tare,
}

/// A locally stored barcode record.
///
/// Records are owned by the store; the workflows read and delete them but
/// never keep copies alive across requests.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BarcodeRecord {
    /// Store-assigned identifier.
    pub id: i64,
    /// The scanned barcode.
    pub barcode: String,
    /// Accumulated pending quantity, never negative.
    pub amount: f64,
    /// Resolution state of this record.
    pub state: ResolutionState,
    /// Product name from a lookup, if one succeeded.
    pub name: Option<String>,
    /// Identifier of a likely inventory match, if one was inferred.
    pub possible_match: Option<i64>,
    /// Best-before offset captured at scan time, in days.
    pub best_before_in_days: Option<i64>,
    /// Price captured at scan time.
    pub price: Option<f64>,
    /// Alternative names reported by the lookup service.
    pub alt_names: Option<String>,
}

impl BarcodeRecord {
    /// Returns true if a lookup has filled in a product name.
    #[must_use]
    pub fn is_looked_up(&self) -> bool {
        self.name.is_some()
    }
}

/// A scan-log entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LogEntry {
    /// Store-assigned identifier, ascending with insertion order.
    pub id: i64,
    /// Log text.
    pub log: String,
    /// When the entry was written.
    pub created: DateTime<Utc>,
}

/// A product as reported by the remote inventory service.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProductInfo {
    /// Inventory-side product identifier.
    pub id: i64,
    /// Product name.
    pub name: String,
}

/// Attributes for creating a new product in the remote inventory.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewProduct {
    /// Product name.
    pub name: String,
    /// Whether the product is active. Always true for products created
    /// through the association workflow.
    pub active: bool,
    /// Optional storage location.
    pub location_id: Option<i64>,
    /// Optional product group.
    pub product_group_id: Option<i64>,
}

impl NewProduct {
    /// Creates an active product with just a name.
    #[must_use]
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            active: true,
            location_id: None,
            product_group_id: None,
        }
    }

    /// Sets the storage location.
    #[must_use]
    pub fn with_location(mut self, location_id: i64) -> Self {
        self.location_id = Some(location_id);
        self
    }

    /// Sets the product group.
    #[must_use]
    pub fn with_product_group(mut self, product_group_id: i64) -> Self {
        self.product_group_id = Some(product_group_id);
        self
    }
}

/// Terminal success value of the association workflows.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AssociationOutcome {
    /// The barcode that was linked.
    pub barcode: String,
    /// The product it was linked to.
    pub product_id: i64,
    /// The product's name (remote name, or the supplied name for newly
    /// created products).
    pub product_name: String,
    /// Stock actually recorded; 0 when the stock step was skipped or
    /// failed softly.
    pub stock_added: f64,
}

/// Result of a third-party product lookup.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LookupResult {
    /// Product name, if known.
    pub name: Option<String>,
    /// Brand, if known.
    pub brand: Option<String>,
    /// Image URL, if known.
    pub image_url: Option<String>,
}

impl LookupResult {
    /// Returns true if the lookup produced no useful information.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.name.is_none() && self.brand.is_none() && self.image_url.is_none()
    }
}
