use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// The two reference prices the metrics are computed from.
///
/// A price of 0 means "not known yet"; anything that is not a finite
/// positive number is treated the same way.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PriceSnapshot {
    /// Latest price per gram
    pub current_price_per_gram: f64,

    /// Price per gram `lookback_days` ago
    pub historical_price_per_gram: f64,

    /// Day the current price was last refreshed from a provider
    #[serde(default)]
    pub current_fetched_on: Option<NaiveDate>,

    /// Day the historical price refers to, when it came from a provider
    #[serde(default)]
    pub historical_date: Option<NaiveDate>,
}

impl PriceSnapshot {
    pub fn new(current_price_per_gram: f64, historical_price_per_gram: f64) -> Self {
        Self {
            current_price_per_gram,
            historical_price_per_gram,
            current_fetched_on: None,
            historical_date: None,
        }
    }

    pub fn has_current(&self) -> bool {
        is_usable_price(self.current_price_per_gram)
    }

    pub fn has_historical(&self) -> bool {
        is_usable_price(self.historical_price_per_gram)
    }

    /// Current price, or 0 when it cannot be used for a valuation.
    pub fn current_or_zero(&self) -> f64 {
        if self.has_current() {
            self.current_price_per_gram
        } else {
            0.0
        }
    }
}

/// A price can value a holding only if it is finite and strictly positive.
pub fn is_usable_price(price: f64) -> bool {
    price.is_finite() && price > 0.0
}
