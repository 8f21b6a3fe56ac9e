use async_trait::async_trait;
use chrono::NaiveDate;
use reqwest::Client;
use serde::Deserialize;
#[cfg(not(target_arch = "wasm32"))]
use std::time::Duration;

use crate::errors::CoreError;
use super::traits::GoldPriceProvider;

const PROVIDER_NAME: &str = "backend";

/// The user's own backend (typically on a NAS), queried first.
///
/// - `GET {base}/gold-price` → `{"pricePerGram": 6150.25}`
/// - `GET {base}/gold-price/historical?date=YYYY-MM-DD` → same shape
pub struct BackendPriceProvider {
    client: Client,
    base_url: String,
}

impl BackendPriceProvider {
    pub fn new(base_url: impl Into<String>, timeout_secs: u64) -> Self {
        let builder = Client::builder();
        #[cfg(not(target_arch = "wasm32"))]
        let builder = builder.timeout(Duration::from_secs(timeout_secs));
        #[cfg(target_arch = "wasm32")]
        let _ = timeout_secs;
        Self {
            client: builder.build().unwrap_or_else(|_| Client::new()),
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn current_price_url(&self) -> String {
        format!("{}/gold-price", self.base_url)
    }

    pub fn historical_price_url(&self) -> String {
        format!("{}/gold-price/historical", self.base_url)
    }

    /// Extract the per-gram price from a backend response body.
    pub fn parse_price(body: &str) -> Result<f64, CoreError> {
        let resp: PriceResponse = serde_json::from_str(body).map_err(|e| CoreError::Api {
            provider: PROVIDER_NAME.into(),
            message: format!("Failed to parse price response: {e}"),
        })?;
        Ok(resp.price_per_gram)
    }

    async fn fetch(&self, request: reqwest::RequestBuilder) -> Result<f64, CoreError> {
        let resp = request.send().await?;
        let status = resp.status();
        if !status.is_success() {
            return Err(CoreError::Api {
                provider: PROVIDER_NAME.into(),
                message: format!("HTTP status {status}"),
            });
        }
        let body = resp.text().await?;
        Self::parse_price(&body)
    }
}

// ── Backend API response types ──────────────────────────────────────

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct PriceResponse {
    price_per_gram: f64,
}

#[cfg_attr(target_arch = "wasm32", async_trait(?Send))]
#[cfg_attr(not(target_arch = "wasm32"), async_trait)]
impl GoldPriceProvider for BackendPriceProvider {
    fn name(&self) -> &str {
        PROVIDER_NAME
    }

    async fn current_price_per_gram(&self) -> Result<f64, CoreError> {
        self.fetch(self.client.get(self.current_price_url())).await
    }

    async fn historical_price_per_gram(&self, date: NaiveDate) -> Result<f64, CoreError> {
        let date_str = date.format("%Y-%m-%d").to_string();
        self.fetch(
            self.client
                .get(self.historical_price_url())
                .query(&[("date", date_str.as_str())]),
        )
        .await
    }
}
