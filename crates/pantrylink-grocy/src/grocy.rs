//! Client for the Grocy-compatible inventory REST API.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde_json::{json, Value};

use pantrylink_core::{InventoryService, NewProduct, ProductInfo, UpstreamError};

/// HTTP client for the remote inventory service.
///
/// Authenticates with the `GROCY-API-KEY` header. One request per
/// operation, no retries; any deadline enforcement lives in the client's
/// timeout.
#[derive(Debug, Clone)]
pub struct GrocyClient {
    client: Client,
    base_url: String,
    api_key: String,
}

impl GrocyClient {
    /// Creates a client for the given Grocy instance.
    pub fn new(
        base_url: impl Into<String>,
        api_key: impl Into<String>,
        timeout: Duration,
    ) -> Result<Self, UpstreamError> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| UpstreamError::new(format!("failed to create client: {e}")))?;

        let mut base_url = base_url.into();
        while base_url.ends_with('/') {
            base_url.pop();
        }

        Ok(Self {
            client,
            base_url,
            api_key: api_key.into(),
        })
    }

    /// Returns the configured base URL.
    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{path}", self.base_url)
    }

    async fn get_json(&self, path: &str) -> Result<(StatusCode, Value), UpstreamError> {
        let response = self
            .client
            .get(self.url(path))
            .header("GROCY-API-KEY", &self.api_key)
            .send()
            .await
            .map_err(|e| UpstreamError::new(format!("GET {path}: {e}")))?;

        let status = response.status();
        let body = response
            .json::<Value>()
            .await
            .unwrap_or(Value::Null);
        Ok((status, body))
    }

    async fn post_json(&self, path: &str, body: &Value) -> Result<(StatusCode, Value), UpstreamError> {
        let response = self
            .client
            .post(self.url(path))
            .header("GROCY-API-KEY", &self.api_key)
            .json(body)
            .send()
            .await
            .map_err(|e| UpstreamError::new(format!("POST {path}: {e}")))?;

        let status = response.status();
        let body = response
            .json::<Value>()
            .await
            .unwrap_or(Value::Null);
        Ok((status, body))
    }
}

/// Pulls an id out of a Grocy response field, which the API reports
/// either as a number or a numeric string.
fn parse_id(value: &Value) -> Option<i64> {
    match value {
        Value::Number(n) => n.as_i64(),
        Value::String(s) => s.parse().ok(),
        _ => None,
    }
}

#[async_trait]
impl InventoryService for GrocyClient {
    async fn product_info(&self, product_id: i64) -> Result<Option<ProductInfo>, UpstreamError> {
        let path = format!("/api/objects/products/{product_id}");
        let (status, body) = self.get_json(&path).await?;

        if status == StatusCode::NOT_FOUND || status == StatusCode::BAD_REQUEST {
            return Ok(None);
        }
        if !status.is_success() {
            return Err(UpstreamError::new(format!("GET {path}: HTTP {status}")));
        }

        let id = parse_id(&body["id"]).unwrap_or(product_id);
        let Some(name) = body["name"].as_str() else {
            return Ok(None);
        };

        Ok(Some(ProductInfo {
            id,
            name: name.to_string(),
        }))
    }

    async fn create_product(&self, product: &NewProduct) -> Result<i64, UpstreamError> {
        let mut payload = json!({
            "name": product.name,
            "active": i32::from(product.active),
        });
        if let Some(location_id) = product.location_id {
            payload["location_id"] = json!(location_id);
        }
        if let Some(product_group_id) = product.product_group_id {
            payload["product_group_id"] = json!(product_group_id);
        }

        let path = "/api/objects/products";
        let (status, body) = self.post_json(path, &payload).await?;
        if !status.is_success() {
            return Err(UpstreamError::new(format!("POST {path}: HTTP {status}")));
        }

        parse_id(&body["created_object_id"])
            .ok_or_else(|| UpstreamError::new("no ID returned"))
    }

    async fn add_barcode(&self, product_id: i64, barcode: &str) -> Result<(), UpstreamError> {
        let payload = json!({
            "product_id": product_id,
            "barcode": barcode,
        });

        let path = "/api/objects/product_barcodes";
        let (status, _) = self.post_json(path, &payload).await?;
        if !status.is_success() {
            return Err(UpstreamError::new(format!("POST {path}: HTTP {status}")));
        }
        Ok(())
    }

    async fn add_stock(&self, product_id: i64, amount: f64) -> Result<(), UpstreamError> {
        let payload = json!({
            "amount": amount,
            "transaction_type": "purchase",
        });

        let path = format!("/api/stock/products/{product_id}/add");
        let (status, _) = self.post_json(&path, &payload).await?;
        if !status.is_success() {
            return Err(UpstreamError::new(format!("POST {path}: HTTP {status}")));
        }
        Ok(())
    }
}
