//! Shared fakes and request builders for the server tests.

use std::sync::Arc;

use async_trait::async_trait;
use bytes::Bytes;
use http::{HeaderMap, Method};

use pantrylink_config::AppConfig;
use pantrylink_core::{
    ApiRequest, InventoryService, LookupResult, NewProduct, ProductInfo, ProductLookup,
    UpstreamError,
};
use pantrylink_store::MemoryStore;
use pantrylink_workflow::ScanInterpreter;

use crate::state::AppState;

/// Inventory fake: one existing product (id 7, "Oat Milk"), creations
/// get id 31, every call succeeds.
pub(crate) struct FakeInventory;

#[async_trait]
impl InventoryService for FakeInventory {
    async fn product_info(&self, product_id: i64) -> Result<Option<ProductInfo>, UpstreamError> {
        Ok((product_id == 7).then(|| ProductInfo {
            id: 7,
            name: "Oat Milk".to_string(),
        }))
    }

    async fn create_product(&self, _product: &NewProduct) -> Result<i64, UpstreamError> {
        Ok(31)
    }

    async fn add_barcode(&self, _product_id: i64, _barcode: &str) -> Result<(), UpstreamError> {
        Ok(())
    }

    async fn add_stock(&self, _product_id: i64, _amount: f64) -> Result<(), UpstreamError> {
        Ok(())
    }
}

/// Lookup fake: every barcode resolves to the same product info.
pub(crate) struct FakeLookup;

#[async_trait]
impl ProductLookup for FakeLookup {
    async fn lookup(&self, _barcode: &str) -> Option<LookupResult> {
        Some(LookupResult {
            name: Some("Looked Up".to_string()),
            brand: Some("Acme".to_string()),
            image_url: None,
        })
    }
}

/// Builds an [`AppState`] over a fresh in-memory store and the fakes.
pub(crate) fn state_with_config(config: AppConfig) -> (Arc<MemoryStore>, AppState) {
    let store = Arc::new(MemoryStore::new());
    for key in &config.auth.api_keys {
        store.add_api_key(key.clone());
    }
    let scanner = Arc::new(ScanInterpreter::new(
        store.clone(),
        config.barcodes.clone(),
    ));
    let state = AppState::new(
        config,
        store.clone(),
        Arc::new(FakeInventory),
        Arc::new(FakeLookup),
        scanner,
    );
    (store, state)
}

/// State with default config (no auth).
pub(crate) fn test_state() -> (Arc<MemoryStore>, AppState) {
    state_with_config(AppConfig::default())
}

/// State requiring the given API key.
pub(crate) fn test_state_with_auth(key: &str) -> (Arc<MemoryStore>, AppState) {
    let mut config = AppConfig::default();
    config.auth.require_api_key = true;
    config.auth.api_keys.push(key.to_string());
    state_with_config(config)
}

fn split_path(path_and_query: &str) -> (&str, Option<&str>) {
    match path_and_query.split_once('?') {
        Some((path, query)) => (path, Some(query)),
        None => (path_and_query, None),
    }
}

/// A GET request with no body.
pub(crate) fn request_get(path_and_query: &str) -> ApiRequest {
    let (path, query) = split_path(path_and_query);
    ApiRequest::new(Method::GET, path, query, HeaderMap::new(), Bytes::new())
}

/// A POST request with a JSON body.
pub(crate) fn request_post_json(path_and_query: &str, body: &str) -> ApiRequest {
    let (path, query) = split_path(path_and_query);
    ApiRequest::new(
        Method::POST,
        path,
        query,
        HeaderMap::new(),
        Bytes::from(body.to_string()),
    )
}

/// A GET request carrying one header.
pub(crate) fn request_with_header(path_and_query: &str, name: &str, value: &str) -> ApiRequest {
    let (path, query) = split_path(path_and_query);
    let mut headers = HeaderMap::new();
    headers.insert(
        http::header::HeaderName::from_bytes(name.as_bytes()).unwrap(),
        value.parse().unwrap(),
    );
    ApiRequest::new(Method::GET, path, query, headers, Bytes::new())
}
