//! Scan interpretation.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::info;

use pantrylink_core::{
    ApiResult, BarcodeStore, CommandBarcodes, ScanProcessor, ScanRequest,
};

/// Default scan processor.
///
/// Command barcodes switch the transaction mode; anything else is
/// recorded in the unresolved set with its accumulated amount. Every scan
/// leaves a line in the scan log.
pub struct ScanInterpreter {
    store: Arc<dyn BarcodeStore>,
    commands: CommandBarcodes,
}

impl ScanInterpreter {
    /// Creates a scan interpreter over the given store and command table.
    #[must_use]
    pub fn new(store: Arc<dyn BarcodeStore>, commands: CommandBarcodes) -> Self {
        Self { store, commands }
    }
}

#[async_trait]
impl ScanProcessor for ScanInterpreter {
    async fn process(&self, scan: ScanRequest) -> ApiResult<String> {
        let result = if let Some(mode) = self.commands.mode_for(&scan.barcode) {
            self.store.set_transaction_mode(mode)?;
            format!("Scan mode is now: {mode}")
        } else {
            let record = self.store.record_scan(
                &scan.barcode,
                scan.best_before_in_days,
                scan.price,
            )?;
            format!(
                "Unknown barcode {} saved, pending amount: {}",
                record.barcode, record.amount
            )
        };

        info!(barcode = %scan.barcode, result = %result, "scan processed");
        self.store.save_log(&result)?;
        Ok(result)
    }
}
