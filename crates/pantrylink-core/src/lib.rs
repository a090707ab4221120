//! Core types and collaborator contracts for PantryLink.
//!
//! PantryLink is a small HTTP gateway that sits between barcode scanners
//! and a Grocy-compatible grocery inventory. This crate defines the pieces
//! every other crate agrees on:
//!
//! - the JSON response envelope ([`ApiResponse`]) every endpoint returns
//! - the error taxonomy ([`ApiError`]) and its HTTP status mapping
//! - the per-request context ([`ApiRequest`]) handlers receive instead of
//!   reading ambient global input
//! - the domain types (barcode records, products, association outcomes)
//! - the contracts of the external collaborators: the barcode store, the
//!   remote inventory service, the third-party product lookup, and the
//!   scan processor
//!
//! The collaborators are injected as explicit handles wherever they are
//! used, so tests can substitute fakes without any global state.

pub mod context;
pub mod envelope;
pub mod error;
pub mod inventory;
pub mod mode;
pub mod scan;
pub mod store;
pub mod types;

pub use context::{ApiRequest, RequestId};
pub use envelope::{ApiResponse, ResultInfo};
pub use error::{ApiError, ApiResult};
pub use inventory::{InventoryService, ProductLookup, UpstreamError};
pub use mode::{CommandBarcodes, TransactionMode};
pub use scan::{ScanProcessor, ScanRequest};
pub use store::{BarcodeStore, StoreError, StoreResult};
pub use types::{
    AssociationOutcome, BarcodeRecord, LogEntry, LookupResult, NewProduct, ProductInfo,
    ResolutionState,
};
