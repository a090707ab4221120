//! Shared application state.

use std::sync::Arc;

use pantrylink_config::AppConfig;
use pantrylink_core::{BarcodeStore, InventoryService, ProductLookup, ScanProcessor};
use pantrylink_workflow::AssociationWorkflow;

/// Explicit handles to every collaborator the handlers use.
///
/// Built once at startup and shared read-only between requests. Handlers
/// receive this instead of reaching for singletons, which is also what
/// lets the tests wire in fakes.
pub struct AppState {
    /// Gateway configuration.
    pub config: AppConfig,
    /// The barcode store.
    pub store: Arc<dyn BarcodeStore>,
    /// The remote inventory service.
    pub inventory: Arc<dyn InventoryService>,
    /// The third-party product lookup.
    pub lookup: Arc<dyn ProductLookup>,
    /// The scan processor.
    pub scanner: Arc<dyn ScanProcessor>,
    /// The association workflow engine.
    pub workflow: AssociationWorkflow,
}

impl AppState {
    /// Creates the application state from its collaborators.
    ///
    /// The workflow engine is derived from the store and inventory
    /// handles so the two always agree.
    #[must_use]
    pub fn new(
        config: AppConfig,
        store: Arc<dyn BarcodeStore>,
        inventory: Arc<dyn InventoryService>,
        lookup: Arc<dyn ProductLookup>,
        scanner: Arc<dyn ScanProcessor>,
    ) -> Self {
        let workflow = AssociationWorkflow::new(store.clone(), inventory.clone());
        Self {
            config,
            store,
            inventory,
            lookup,
            scanner,
            workflow,
        }
    }
}
