use crate::models::settings::Settings;

use super::backend::BackendPriceProvider;
use super::metals_dev::MetalsDevProvider;
use super::traits::GoldPriceProvider;

/// Ordered list of gold price providers; earlier entries are tried first.
pub struct PriceProviderRegistry {
    providers: Vec<Box<dyn GoldPriceProvider>>,
}

impl PriceProviderRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self {
            providers: Vec::new(),
        }
    }

    /// Create a registry with the providers the settings enable.
    pub fn from_settings(settings: &Settings) -> Self {
        let mut registry = Self::new();

        // Self-hosted backend first; needs no key
        if let Some(base) = &settings.api_base_url {
            registry.register(Box::new(BackendPriceProvider::new(
                base.clone(),
                settings.request_timeout_secs,
            )));
        }

        // metals.dev as fallback, only with an API key
        if let Some(key) = &settings.metals_dev_api_key {
            registry.register(Box::new(MetalsDevProvider::new(
                key.clone(),
                settings.currency.clone(),
                settings.request_timeout_secs,
            )));
        }

        registry
    }

    /// Register a provider at the lowest priority.
    pub fn register(&mut self, provider: Box<dyn GoldPriceProvider>) {
        self.providers.push(provider);
    }

    pub fn providers(&self) -> impl Iterator<Item = &dyn GoldPriceProvider> {
        self.providers.iter().map(|p| p.as_ref())
    }

    pub fn names(&self) -> Vec<String> {
        self.providers().map(|p| p.name().to_string()).collect()
    }

    pub fn is_empty(&self) -> bool {
        self.providers.is_empty()
    }

    pub fn len(&self) -> usize {
        self.providers.len()
    }
}

impl Default for PriceProviderRegistry {
    fn default() -> Self {
        Self::new()
    }
}
