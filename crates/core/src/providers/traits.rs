use async_trait::async_trait;
use chrono::NaiveDate;

use crate::errors::CoreError;

/// Grams in one troy ounce; most public gold quotes are per troy ounce.
pub const GRAMS_PER_TROY_OUNCE: f64 = 31.1035;

/// Trait abstraction for gold price sources.
///
/// Each source (self-hosted backend, metals.dev) implements this trait.
/// If an API stops working or changes, only that one implementation is
/// replaced. The metrics never see where a price came from.
#[cfg_attr(target_arch = "wasm32", async_trait(?Send))]
#[cfg_attr(not(target_arch = "wasm32"), async_trait)]
pub trait GoldPriceProvider: Send + Sync {
    /// Human-readable name of this provider (for logs/errors).
    fn name(&self) -> &str;

    /// Latest gold price per gram in the configured currency.
    async fn current_price_per_gram(&self) -> Result<f64, CoreError>;

    /// Gold price per gram on a past date.
    async fn historical_price_per_gram(&self, date: NaiveDate) -> Result<f64, CoreError>;
}
