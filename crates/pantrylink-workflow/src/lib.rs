//! Barcode association workflows and scan processing.
//!
//! This crate contains the multi-step operations that reconcile locally
//! stored unknown barcodes against the remote inventory service. Each
//! workflow is an ordered sequence of dependent external calls; some
//! failures abort the operation (*hard*), others are logged and swallowed
//! (*soft*). The distinction is encoded in the step result types,
//! [`StockOutcome`] and [`AttachOutcome`], so the continue-vs-abort
//! policy is visible at each call site as data, not hidden in error
//! handling.
//!
//! The workflows never retry and never roll back remote state: the
//! barcode→product link is the durable fact being established, and stock
//! recording is a best-effort convenience that can be corrected manually.

mod associate;
mod scan;

pub use associate::{AssociationWorkflow, AttachOutcome, RecordAssociation, StockOutcome};
pub use scan::ScanInterpreter;
