use async_trait::async_trait;
use chrono::NaiveDate;
use reqwest::Client;
use serde::Deserialize;
use std::collections::HashMap;
#[cfg(not(target_arch = "wasm32"))]
use std::time::Duration;

use crate::errors::CoreError;
use super::traits::{GoldPriceProvider, GRAMS_PER_TROY_OUNCE};

const BASE_URL: &str = "https://api.metals.dev/v1";
const PROVIDER_NAME: &str = "metals.dev";
const METAL: &str = "gold";

/// metals.dev API provider, used as the fallback gold price source.
///
/// - **Free tier**: 100 requests/month (no credit card required).
/// - **Requires**: API key (settings field `metalsDevApiKey`).
/// - Quotes are requested per troy ounce and converted to per gram.
pub struct MetalsDevProvider {
    client: Client,
    api_key: String,
    currency: String,
}

impl MetalsDevProvider {
    pub fn new(api_key: String, currency: impl Into<String>, timeout_secs: u64) -> Self {
        let builder = Client::builder();
        #[cfg(not(target_arch = "wasm32"))]
        let builder = builder.timeout(Duration::from_secs(timeout_secs));
        #[cfg(target_arch = "wasm32")]
        let _ = timeout_secs;
        Self {
            client: builder.build().unwrap_or_else(|_| Client::new()),
            api_key,
            currency: currency.into().to_uppercase(),
        }
    }

    pub fn currency(&self) -> &str {
        &self.currency
    }

    /// Per-gram gold price from a `/latest` response body.
    pub fn parse_latest(body: &str) -> Result<f64, CoreError> {
        let resp: LatestResponse = serde_json::from_str(body).map_err(|e| CoreError::Api {
            provider: PROVIDER_NAME.into(),
            message: format!("Failed to parse latest prices: {e}"),
        })?;

        resp.metals
            .get(METAL)
            .map(|per_ounce| per_ounce / GRAMS_PER_TROY_OUNCE)
            .ok_or_else(|| CoreError::PriceNotAvailable {
                provider: PROVIDER_NAME.into(),
                date: "latest".into(),
            })
    }

    /// Per-gram gold price for `date` from a `/timeseries` response body.
    pub fn parse_timeseries(body: &str, date: NaiveDate) -> Result<f64, CoreError> {
        // metals.dev timeseries returns: { "rates": { "YYYY-MM-DD": { "metals": { "gold": ... } } } }
        let parsed: serde_json::Value = serde_json::from_str(body).map_err(|e| CoreError::Api {
            provider: PROVIDER_NAME.into(),
            message: format!("Failed to parse timeseries response: {e}"),
        })?;

        let date_str = date.format("%Y-%m-%d").to_string();
        parsed
            .get("rates")
            .and_then(|rates| rates.get(&date_str))
            .and_then(|day| day.get("metals"))
            .and_then(|metals| metals.get(METAL))
            .and_then(|v| v.as_f64())
            .map(|per_ounce| per_ounce / GRAMS_PER_TROY_OUNCE)
            .ok_or_else(|| CoreError::PriceNotAvailable {
                provider: PROVIDER_NAME.into(),
                date: date_str,
            })
    }
}

// ── metals.dev API response types ───────────────────────────────────

#[derive(Deserialize)]
struct LatestResponse {
    metals: HashMap<String, f64>,
}

#[cfg_attr(target_arch = "wasm32", async_trait(?Send))]
#[cfg_attr(not(target_arch = "wasm32"), async_trait)]
impl GoldPriceProvider for MetalsDevProvider {
    fn name(&self) -> &str {
        PROVIDER_NAME
    }

    async fn current_price_per_gram(&self) -> Result<f64, CoreError> {
        let url = format!("{BASE_URL}/latest");

        let body = self
            .client
            .get(&url)
            .query(&[
                ("api_key", self.api_key.as_str()),
                ("currency", self.currency.as_str()),
                ("unit", "toz"),
            ])
            .send()
            .await?
            .text()
            .await?;

        Self::parse_latest(&body)
    }

    async fn historical_price_per_gram(&self, date: NaiveDate) -> Result<f64, CoreError> {
        let date_str = date.format("%Y-%m-%d").to_string();
        let url = format!("{BASE_URL}/timeseries");

        let body = self
            .client
            .get(&url)
            .query(&[
                ("api_key", self.api_key.as_str()),
                ("currency", self.currency.as_str()),
                ("unit", "toz"),
                ("start_date", date_str.as_str()),
                ("end_date", date_str.as_str()),
            ])
            .send()
            .await?
            .text()
            .await?;

        Self::parse_timeseries(&body, date)
    }
}
