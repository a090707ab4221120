//! Open Food Facts barcode lookup.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde_json::Value;
use tracing::debug;

use pantrylink_core::{LookupResult, ProductLookup, UpstreamError};

/// Default Open Food Facts endpoint.
pub const DEFAULT_BASE_URL: &str = "https://world.openfoodfacts.org";

/// Client for the Open Food Facts product database.
///
/// Lookup failures are expected (unknown barcodes, rate limiting) and
/// never abort a request; they just produce `None`.
#[derive(Debug, Clone)]
pub struct OpenFoodFactsClient {
    client: Client,
    base_url: String,
}

impl OpenFoodFactsClient {
    /// Creates a lookup client.
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Result<Self, UpstreamError> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| UpstreamError::new(format!("failed to create client: {e}")))?;

        let mut base_url = base_url.into();
        while base_url.ends_with('/') {
            base_url.pop();
        }

        Ok(Self { client, base_url })
    }

    async fn fetch(&self, barcode: &str) -> Result<Value, UpstreamError> {
        let url = format!("{}/api/v0/product/{barcode}.json", self.base_url);
        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|e| UpstreamError::new(format!("GET {url}: {e}")))?;

        response
            .json::<Value>()
            .await
            .map_err(|e| UpstreamError::new(format!("GET {url}: {e}")))
    }
}

/// Extracts the display fields from an Open Food Facts product document.
///
/// Name preference order: English name, then the generic product name,
/// then the generic description; image preference: front image first.
fn extract(body: &Value) -> Option<LookupResult> {
    if body["status"].as_i64() != Some(1) {
        return None;
    }

    let product = &body["product"];
    let name = ["product_name_en", "product_name", "generic_name"]
        .iter()
        .find_map(|key| non_empty_str(&product[*key]));
    let brand = non_empty_str(&product["brands"]);
    let image_url = ["image_front_url", "image_url"]
        .iter()
        .find_map(|key| non_empty_str(&product[*key]));

    let result = LookupResult {
        name,
        brand,
        image_url,
    };
    if result.is_empty() {
        None
    } else {
        Some(result)
    }
}

fn non_empty_str(value: &Value) -> Option<String> {
    value
        .as_str()
        .filter(|s| !s.is_empty())
        .map(ToString::to_string)
}

#[async_trait]
impl ProductLookup for OpenFoodFactsClient {
    async fn lookup(&self, barcode: &str) -> Option<LookupResult> {
        match self.fetch(barcode).await {
            Ok(body) => extract(&body),
            Err(err) => {
                debug!(barcode, error = %err, "product lookup failed");
                None
            }
        }
    }
}
