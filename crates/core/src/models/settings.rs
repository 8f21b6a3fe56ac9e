use serde::{Deserialize, Serialize};

use crate::errors::CoreError;

/// Weight the "since last investment" price movement is multiplied by.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum SinceLastInvestmentBasis {
    /// Whole holding: how much the portfolio moved since the last buy.
    #[default]
    TotalWeight,
    /// Only the grams bought in the most recent purchase.
    LastPurchaseWeight,
}

/// Process-wide configuration, built once at startup and passed in.
///
/// Every field has a default, so an empty JSON object is a valid config.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Settings {
    /// Base URL of the self-hosted backend (e.g. "http://nas.local:8080/api").
    pub api_base_url: Option<String>,

    /// metals.dev API key; enables the metals.dev fallback provider.
    pub metals_dev_api_key: Option<String>,

    /// Quote currency requested from price providers.
    pub currency: String,

    /// How far back the historical ("monthly") price is taken.
    pub lookback_days: u32,

    /// HTTP timeout for price providers.
    pub request_timeout_secs: u64,

    pub since_last_investment_basis: SinceLastInvestmentBasis,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            api_base_url: None,
            metals_dev_api_key: None,
            currency: "INR".to_string(),
            lookback_days: 30,
            request_timeout_secs: 30,
            since_last_investment_basis: SinceLastInvestmentBasis::default(),
        }
    }
}

impl Settings {
    /// Parse and validate settings from a JSON document.
    pub fn from_json_str(json: &str) -> Result<Self, CoreError> {
        let settings: Settings = serde_json::from_str(json)?;
        settings.validate()?;
        Ok(settings)
    }

    /// Load settings from a JSON file on disk (native only, not WASM).
    #[cfg(not(target_arch = "wasm32"))]
    pub fn load_from_file(path: impl AsRef<std::path::Path>) -> Result<Self, CoreError> {
        let contents = std::fs::read_to_string(path)?;
        Self::from_json_str(&contents)
    }

    pub fn to_json_string(&self) -> Result<String, CoreError> {
        serde_json::to_string_pretty(self).map_err(|e| CoreError::Serialization(e.to_string()))
    }

    pub fn validate(&self) -> Result<(), CoreError> {
        if self.lookback_days == 0 {
            return Err(CoreError::Config("lookbackDays must be at least 1".into()));
        }
        if self.request_timeout_secs == 0 {
            return Err(CoreError::Config("requestTimeoutSecs must be at least 1".into()));
        }
        if self.currency.trim().is_empty() {
            return Err(CoreError::Config("currency must not be empty".into()));
        }
        if let Some(base) = &self.api_base_url {
            let url = reqwest::Url::parse(base)
                .map_err(|e| CoreError::Config(format!("apiBaseUrl {base:?} is not a URL: {e}")))?;
            if url.scheme() != "http" && url.scheme() != "https" {
                return Err(CoreError::Config(format!(
                    "apiBaseUrl must use http or https, got {}",
                    url.scheme()
                )));
            }
        }
        Ok(())
    }
}
