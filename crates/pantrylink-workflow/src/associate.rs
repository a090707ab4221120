//! The barcode association workflows.

use std::sync::Arc;

use tracing::{info, warn};

use pantrylink_core::{
    ApiError, ApiResult, AssociationOutcome, BarcodeStore, InventoryService, NewProduct,
};

/// Outcome of the best-effort stock step.
///
/// Failure here is *soft*: the association already succeeded and must not
/// be rolled back, so a failed stock call contributes 0 to the reported
/// amount instead of aborting.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum StockOutcome {
    /// Stock was recorded against the product.
    Added(f64),
    /// The stored amount was zero, so no stock call was made.
    Skipped,
    /// The stock call failed; a warning was logged and the workflow
    /// continued.
    SoftFailed,
}

impl StockOutcome {
    /// The amount actually recorded.
    #[must_use]
    pub const fn amount(self) -> f64 {
        match self {
            Self::Added(amount) => amount,
            Self::Skipped | Self::SoftFailed => 0.0,
        }
    }
}

/// Outcome of a best-effort barcode attachment.
///
/// Only the create-and-associate flow uses this: once the product has
/// been created it must not be silently lost, so a failed attachment is
/// logged and the workflow continues. When associating with an *existing*
/// product, attachment failure is hard instead, as no product-side state
/// has changed yet.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AttachOutcome {
    /// The barcode was attached.
    Attached,
    /// The attachment failed; a warning was logged.
    SoftFailed,
}

/// Result of associating a record by its store id.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordAssociation {
    /// The store id of the deleted record.
    pub barcode_id: i64,
    /// The barcode that was linked.
    pub barcode: String,
    /// The product it was linked to.
    pub product_id: i64,
}

/// The association workflow engine.
///
/// Holds explicit handles to its collaborators; nothing global. Each
/// method runs one workflow to completion with the hard/soft failure
/// policy described on the individual steps.
pub struct AssociationWorkflow {
    store: Arc<dyn BarcodeStore>,
    inventory: Arc<dyn InventoryService>,
}

impl AssociationWorkflow {
    /// Creates a workflow engine over the given collaborators.
    #[must_use]
    pub fn new(store: Arc<dyn BarcodeStore>, inventory: Arc<dyn InventoryService>) -> Self {
        Self { store, inventory }
    }

    /// Associates a stored unknown barcode with an existing product.
    ///
    /// Ordered steps:
    ///
    /// 1. Read the stored amount; only *absence* of the record is an
    ///    error. A record with amount 0 proceeds with no stock to add.
    /// 2. Verify the product exists remotely.
    /// 3. Attach the barcode: hard failure, nothing to clean up yet.
    /// 4. Record pending stock if any: soft failure.
    /// 5. Delete the local record unconditionally once step 3 succeeded.
    pub async fn associate_existing(
        &self,
        barcode: &str,
        product_id: i64,
    ) -> ApiResult<AssociationOutcome> {
        let amount = self.pending_amount(barcode)?;

        let product = self
            .inventory
            .product_info(product_id)
            .await
            .map_err(|e| ApiError::upstream(format!("Failed to verify product: {e}")))?
            .ok_or_else(|| ApiError::not_found("Product not found"))?;

        self.inventory
            .add_barcode(product_id, barcode)
            .await
            .map_err(|e| ApiError::upstream(format!("Failed to add barcode: {e}")))?;

        let stock = self
            .add_stock_soft(product_id, amount, "Barcode associated but stock add failed")
            .await;

        self.store.delete_unknown(barcode)?;

        info!(barcode, product_id, stock_added = stock.amount(), "barcode associated");
        Ok(AssociationOutcome {
            barcode: barcode.to_string(),
            product_id,
            product_name: product.name,
            stock_added: stock.amount(),
        })
    }

    /// Creates a product and associates the barcode with it.
    ///
    /// Same shape as [`Self::associate_existing`], but the verify step is
    /// replaced by product creation (hard failure), and the attachment
    /// step becomes *soft*: the product now exists and must not be lost
    /// just because the barcode call failed.
    pub async fn create_and_associate(
        &self,
        barcode: &str,
        product: NewProduct,
    ) -> ApiResult<AssociationOutcome> {
        let amount = self.pending_amount(barcode)?;

        let product_id = self
            .inventory
            .create_product(&product)
            .await
            .map_err(|e| ApiError::upstream(format!("Failed to create product: {e}")))?;

        let attach = self
            .attach_soft(product_id, barcode, "Product created but barcode add failed")
            .await;

        let stock = self
            .add_stock_soft(product_id, amount, "Product created but stock add failed")
            .await;

        self.store.delete_unknown(barcode)?;

        info!(
            barcode,
            product_id,
            attached = attach == AttachOutcome::Attached,
            stock_added = stock.amount(),
            "product created and barcode associated"
        );
        Ok(AssociationOutcome {
            barcode: barcode.to_string(),
            product_id,
            product_name: product.name,
            stock_added: stock.amount(),
        })
    }

    /// Associates a stored record, addressed by store id, with an
    /// existing product. No stock step in this flow.
    pub async fn associate_record(
        &self,
        barcode_id: i64,
        product_id: i64,
    ) -> ApiResult<RecordAssociation> {
        let record = self
            .store
            .barcode_by_id(barcode_id)?
            .ok_or_else(|| ApiError::not_found("Barcode not found"))?;

        self.inventory
            .product_info(product_id)
            .await
            .map_err(|e| ApiError::upstream(format!("Failed to verify product: {e}")))?
            .ok_or_else(|| {
                ApiError::not_found(format!("Product not found with ID: {product_id}"))
            })?;

        self.inventory
            .add_barcode(product_id, &record.barcode)
            .await
            .map_err(|e| ApiError::upstream(format!("Failed to add barcode: {e}")))?;

        self.store.delete_barcode(barcode_id)?;

        info!(barcode = %record.barcode, product_id, "barcode record associated");
        Ok(RecordAssociation {
            barcode_id,
            barcode: record.barcode,
            product_id,
        })
    }

    /// Step 1 of both association flows: the stored amount, with the
    /// defensive distinction between "absent" and "present with amount
    /// 0". The latter shouldn't occur in practice but is not an error.
    fn pending_amount(&self, barcode: &str) -> ApiResult<f64> {
        let amount = self.store.stored_amount(barcode)?;
        if amount == 0.0 && !self.store.is_unknown_stored(barcode)? {
            return Err(ApiError::not_found("Barcode not found in unknown list"));
        }
        Ok(amount)
    }

    /// Best-effort stock recording. Never fails the workflow.
    async fn add_stock_soft(&self, product_id: i64, amount: f64, context: &str) -> StockOutcome {
        if amount <= 0.0 {
            return StockOutcome::Skipped;
        }
        match self.inventory.add_stock(product_id, amount).await {
            Ok(()) => StockOutcome::Added(amount),
            Err(err) => {
                self.log_soft_failure(context, &err.message);
                StockOutcome::SoftFailed
            }
        }
    }

    /// Best-effort barcode attachment. Never fails the workflow.
    async fn attach_soft(&self, product_id: i64, barcode: &str, context: &str) -> AttachOutcome {
        match self.inventory.add_barcode(product_id, barcode).await {
            Ok(()) => AttachOutcome::Attached,
            Err(err) => {
                self.log_soft_failure(context, &err.message);
                AttachOutcome::SoftFailed
            }
        }
    }

    fn log_soft_failure(&self, context: &str, message: &str) {
        warn!(context, message, "workflow step failed softly");
        // A store-log write failing must not fail the workflow either.
        if let Err(err) = self.store.save_log(&format!("Warning: {context}: {message}")) {
            warn!(error = %err, "could not write soft-failure log entry");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use async_trait::async_trait;
    use parking_lot::Mutex;

    use pantrylink_core::{ProductInfo, UpstreamError};
    use pantrylink_store::MemoryStore;

    /// Scripted inventory fake that records every call it receives.
    #[derive(Default)]
    struct FakeInventory {
        calls: Mutex<Vec<String>>,
        product: Option<ProductInfo>,
        created_id: Option<i64>,
        fail_create: bool,
        fail_add_barcode: bool,
        fail_add_stock: bool,
    }

    impl FakeInventory {
        fn with_product(id: i64, name: &str) -> Self {
            Self {
                product: Some(ProductInfo {
                    id,
                    name: name.to_string(),
                }),
                ..Self::default()
            }
        }

        fn calls(&self) -> Vec<String> {
            self.calls.lock().clone()
        }
    }

    #[async_trait]
    impl InventoryService for FakeInventory {
        async fn product_info(
            &self,
            product_id: i64,
        ) -> Result<Option<ProductInfo>, UpstreamError> {
            self.calls.lock().push(format!("product_info({product_id})"));
            Ok(self.product.clone().filter(|p| p.id == product_id))
        }

        async fn create_product(&self, product: &NewProduct) -> Result<i64, UpstreamError> {
            self.calls.lock().push(format!("create_product({})", product.name));
            if self.fail_create {
                return Err(UpstreamError::new("creation rejected"));
            }
            self.created_id.ok_or_else(|| UpstreamError::new("no ID returned"))
        }

        async fn add_barcode(&self, product_id: i64, barcode: &str) -> Result<(), UpstreamError> {
            self.calls
                .lock()
                .push(format!("add_barcode({product_id}, {barcode})"));
            if self.fail_add_barcode {
                return Err(UpstreamError::new("barcode rejected"));
            }
            Ok(())
        }

        async fn add_stock(&self, product_id: i64, amount: f64) -> Result<(), UpstreamError> {
            self.calls
                .lock()
                .push(format!("add_stock({product_id}, {amount})"));
            if self.fail_add_stock {
                return Err(UpstreamError::new("stock rejected"));
            }
            Ok(())
        }
    }

    fn workflow_with(
        inventory: FakeInventory,
    ) -> (Arc<MemoryStore>, Arc<FakeInventory>, AssociationWorkflow) {
        let store = Arc::new(MemoryStore::new());
        let inventory = Arc::new(inventory);
        let workflow = AssociationWorkflow::new(store.clone(), inventory.clone());
        (store, inventory, workflow)
    }

    fn seed_scans(store: &MemoryStore, barcode: &str, times: usize) {
        for _ in 0..times {
            store.record_scan(barcode, None, None).unwrap();
        }
    }

    #[tokio::test]
    async fn associate_existing_happy_path() {
        let (store, inventory, workflow) =
            workflow_with(FakeInventory::with_product(7, "Oat Milk"));
        seed_scans(&store, "123", 3);

        let outcome = workflow.associate_existing("123", 7).await.unwrap();

        assert_eq!(outcome.barcode, "123");
        assert_eq!(outcome.product_id, 7);
        assert_eq!(outcome.product_name, "Oat Milk");
        assert_eq!(outcome.stock_added, 3.0);
        assert!(!store.is_unknown_stored("123").unwrap());
        assert_eq!(
            inventory.calls(),
            vec![
                "product_info(7)".to_string(),
                "add_barcode(7, 123)".to_string(),
                "add_stock(7, 3)".to_string(),
            ]
        );
    }

    #[tokio::test]
    async fn missing_record_is_404_and_makes_no_remote_calls() {
        let (_store, inventory, workflow) =
            workflow_with(FakeInventory::with_product(7, "Oat Milk"));

        let err = workflow.associate_existing("123", 7).await.unwrap_err();

        assert_eq!(err.status_code().as_u16(), 404);
        assert_eq!(err.to_string(), "Barcode not found in unknown list");
        assert!(inventory.calls().is_empty());
    }

    #[tokio::test]
    async fn zero_amount_record_still_associates_with_no_stock() {
        let (store, inventory, workflow) =
            workflow_with(FakeInventory::with_product(7, "Oat Milk"));
        let mut record = store.record_scan("123", None, None).unwrap();
        store.delete_unknown("123").unwrap();
        record.amount = 0.0;
        store.insert(record);

        let outcome = workflow.associate_existing("123", 7).await.unwrap();

        assert_eq!(outcome.stock_added, 0.0);
        assert!(!store.is_unknown_stored("123").unwrap());
        // The stock step was skipped entirely.
        assert!(!inventory.calls().iter().any(|c| c.starts_with("add_stock")));
    }

    #[tokio::test]
    async fn missing_product_is_404() {
        let (store, _inventory, workflow) =
            workflow_with(FakeInventory::with_product(9, "Other"));
        seed_scans(&store, "123", 1);

        let err = workflow.associate_existing("123", 7).await.unwrap_err();

        assert_eq!(err.status_code().as_u16(), 404);
        assert_eq!(err.to_string(), "Product not found");
        // The record stays; only successful attachment deletes it.
        assert!(store.is_unknown_stored("123").unwrap());
    }

    #[tokio::test]
    async fn attach_failure_is_hard_for_existing_product() {
        let mut inventory = FakeInventory::with_product(7, "Oat Milk");
        inventory.fail_add_barcode = true;
        let (store, _inventory, workflow) = workflow_with(inventory);
        seed_scans(&store, "123", 2);

        let err = workflow.associate_existing("123", 7).await.unwrap_err();

        assert_eq!(err.status_code().as_u16(), 500);
        assert!(err.to_string().contains("barcode rejected"));
        assert!(store.is_unknown_stored("123").unwrap());
    }

    #[tokio::test]
    async fn stock_failure_is_soft_and_record_is_still_deleted() {
        let mut inventory = FakeInventory::with_product(7, "Oat Milk");
        inventory.fail_add_stock = true;
        let (store, _inventory, workflow) = workflow_with(inventory);
        seed_scans(&store, "123", 3);

        let outcome = workflow.associate_existing("123", 7).await.unwrap();

        assert_eq!(outcome.stock_added, 0.0);
        assert!(!store.is_unknown_stored("123").unwrap());
        // The soft failure left a warning in the scan log.
        let logs = store.logs_with_id(10).unwrap();
        assert!(logs.iter().any(|l| l.log.contains("stock add failed")));
    }

    #[tokio::test]
    async fn create_and_associate_happy_path() {
        let mut inventory = FakeInventory::default();
        inventory.created_id = Some(31);
        let (store, inventory, workflow) = workflow_with(inventory);
        seed_scans(&store, "456", 2);

        let outcome = workflow
            .create_and_associate("456", NewProduct::named("Rye Bread"))
            .await
            .unwrap();

        assert_eq!(outcome.product_id, 31);
        assert_eq!(outcome.product_name, "Rye Bread");
        assert_eq!(outcome.stock_added, 2.0);
        assert!(!store.is_unknown_stored("456").unwrap());
        assert_eq!(
            inventory.calls(),
            vec![
                "create_product(Rye Bread)".to_string(),
                "add_barcode(31, 456)".to_string(),
                "add_stock(31, 2)".to_string(),
            ]
        );
    }

    #[tokio::test]
    async fn create_failure_is_hard_and_record_remains() {
        let mut inventory = FakeInventory::default();
        inventory.fail_create = true;
        let (store, _inventory, workflow) = workflow_with(inventory);
        seed_scans(&store, "456", 1);

        let err = workflow
            .create_and_associate("456", NewProduct::named("Rye Bread"))
            .await
            .unwrap_err();

        assert_eq!(err.status_code().as_u16(), 500);
        assert!(err.to_string().contains("Failed to create product"));
        assert!(store.is_unknown_stored("456").unwrap());
    }

    #[tokio::test]
    async fn create_without_id_is_hard() {
        let inventory = FakeInventory::default(); // created_id: None
        let (store, _inventory, workflow) = workflow_with(inventory);
        seed_scans(&store, "456", 1);

        let err = workflow
            .create_and_associate("456", NewProduct::named("Rye Bread"))
            .await
            .unwrap_err();

        assert_eq!(err.status_code().as_u16(), 500);
        assert!(err.to_string().contains("no ID returned"));
        assert!(store.is_unknown_stored("456").unwrap());
    }

    #[tokio::test]
    async fn attach_failure_is_soft_after_creation() {
        let mut inventory = FakeInventory::default();
        inventory.created_id = Some(31);
        inventory.fail_add_barcode = true;
        let (store, _inventory, workflow) = workflow_with(inventory);
        seed_scans(&store, "456", 1);

        let outcome = workflow
            .create_and_associate("456", NewProduct::named("Rye Bread"))
            .await
            .unwrap();

        // The call reports success and the record is gone; the failure
        // was logged.
        assert_eq!(outcome.product_id, 31);
        assert!(!store.is_unknown_stored("456").unwrap());
        let logs = store.logs_with_id(10).unwrap();
        assert!(logs.iter().any(|l| l.log.contains("barcode add failed")));
    }

    #[tokio::test]
    async fn associate_record_by_id() {
        let (store, inventory, workflow) =
            workflow_with(FakeInventory::with_product(7, "Oat Milk"));
        let record = store.record_scan("789", None, None).unwrap();

        let association = workflow.associate_record(record.id, 7).await.unwrap();

        assert_eq!(association.barcode, "789");
        assert_eq!(association.product_id, 7);
        assert!(store.barcode_by_id(record.id).unwrap().is_none());
        // No stock step in the by-id flow.
        assert!(!inventory.calls().iter().any(|c| c.starts_with("add_stock")));
    }

    #[tokio::test]
    async fn associate_record_with_unknown_id_is_404() {
        let (_store, inventory, workflow) =
            workflow_with(FakeInventory::with_product(7, "Oat Milk"));

        let err = workflow.associate_record(99, 7).await.unwrap_err();

        assert_eq!(err.status_code().as_u16(), 404);
        assert!(inventory.calls().is_empty());
    }

    #[test]
    fn stock_outcome_amounts() {
        assert_eq!(StockOutcome::Added(3.0).amount(), 3.0);
        assert_eq!(StockOutcome::Skipped.amount(), 0.0);
        assert_eq!(StockOutcome::SoftFailed.amount(), 0.0);
    }
}
