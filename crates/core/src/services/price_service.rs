use chrono::NaiveDate;

use crate::errors::CoreError;
use crate::models::price::is_usable_price;
use crate::models::settings::Settings;
use crate::providers::registry::PriceProviderRegistry;
use crate::providers::traits::GoldPriceProvider;

/// Fetches gold prices from the registered providers with automatic fallback.
///
/// Providers are tried in registration order. If one fails (API down,
/// rate limited, bad payload), the next one is asked. A price is only
/// accepted if it is finite and strictly positive.
pub struct PriceService {
    registry: PriceProviderRegistry,
}

impl PriceService {
    pub fn new(registry: PriceProviderRegistry) -> Self {
        Self { registry }
    }

    pub fn from_settings(settings: &Settings) -> Self {
        Self::new(PriceProviderRegistry::from_settings(settings))
    }

    pub fn has_provider(&self) -> bool {
        !self.registry.is_empty()
    }

    /// Names of the configured providers, in fallback order.
    pub fn provider_names(&self) -> Vec<String> {
        self.registry.names()
    }

    /// Latest price per gram.
    pub async fn current_price_per_gram(&self) -> Result<f64, CoreError> {
        let mut last_error = None;

        for provider in self.registry.providers() {
            let result = provider.current_price_per_gram().await;
            match Self::accept(provider, result) {
                Ok(price) => return Ok(price),
                Err(e) => last_error = Some(e),
            }
        }

        Err(last_error.unwrap_or(CoreError::NoProvider))
    }

    /// Price per gram on `date`.
    pub async fn historical_price_per_gram(&self, date: NaiveDate) -> Result<f64, CoreError> {
        let mut last_error = None;

        for provider in self.registry.providers() {
            let result = provider.historical_price_per_gram(date).await;
            match Self::accept(provider, result) {
                Ok(price) => return Ok(price),
                Err(e) => last_error = Some(e),
            }
        }

        Err(last_error.unwrap_or(CoreError::NoProvider))
    }

    /// Validate a provider's answer, logging every rejection.
    fn accept(provider: &dyn GoldPriceProvider, result: Result<f64, CoreError>) -> Result<f64, CoreError> {
        match result {
            Ok(price) if is_usable_price(price) => Ok(price),
            Ok(price) => {
                log::warn!("{} returned an invalid gold price: {price}", provider.name());
                Err(CoreError::Api {
                    provider: provider.name().to_string(),
                    message: format!("Invalid price returned: {price} (must be finite and positive)"),
                })
            }
            Err(e) => {
                log::warn!("{} failed to provide a gold price: {e}", provider.name());
                Err(e)
            }
        }
    }
}
