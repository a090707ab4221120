//! The static operation table.
//!
//! Every endpoint is declared once in [`ROUTES`] as a
//! `(method, template, operation)` triple; the router is built from the
//! table at startup and held as read-only state for the life of the
//! process. Handlers are free functions dispatched by [`Operation`], not
//! closures capturing ambient input.

use http::Method;

use pantrylink_router::{Route, Router};

/// Identifies one API operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operation {
    /// Barcode ingestion.
    Scan,
    /// Read the transaction mode.
    GetMode,
    /// Write the transaction mode.
    SetMode,
    /// Version readback.
    SystemInfo,
    /// Command-barcode table readback.
    SystemBarcodes,
    /// Unresolved-record listing.
    ListUnknownBarcodes,
    /// Delete a record by store id.
    DeleteBarcodeById,
    /// Associate a record, addressed by store id, with a product.
    AssociateBarcodeById,
    /// Paginated scan-log readback.
    BarcodeLogs,
    /// Delete a record by barcode.
    DeleteUnknown,
    /// Associate a stored barcode with an existing product.
    AssociateBarcode,
    /// Create a product and associate a stored barcode with it.
    CreateAndAssociate,
}

/// The route table. Order matters for pattern routes: first match wins.
const ROUTES: &[(Option<Method>, &str, Operation)] = &[
    (None, "/api/action/scan", Operation::Scan),
    (None, "/api/state/getmode", Operation::GetMode),
    (None, "/api/state/setmode", Operation::SetMode),
    (None, "/api/system/info", Operation::SystemInfo),
    (None, "/api/system/barcodes", Operation::SystemBarcodes),
    (
        None,
        "/api/system/unknownbarcodes",
        Operation::ListUnknownBarcodes,
    ),
    (
        Some(Method::DELETE),
        "/api/system/unknownbarcodes/{id}",
        Operation::DeleteBarcodeById,
    ),
    (
        Some(Method::POST),
        "/api/system/unknownbarcodes/{id}/associate",
        Operation::AssociateBarcodeById,
    ),
    (None, "/api/system/barcodelogs", Operation::BarcodeLogs),
    (None, "/api/action/deleteunknown", Operation::DeleteUnknown),
    (None, "/api/action/associatebarcode", Operation::AssociateBarcode),
    (
        None,
        "/api/action/createandassociate",
        Operation::CreateAndAssociate,
    ),
];

/// Builds the router from the static table.
#[must_use]
pub fn route_table() -> Router<Operation> {
    let mut router = Router::new();
    for (method, template, operation) in ROUTES {
        router.insert(Route::new(method.clone(), *template, *operation));
    }
    router
}
