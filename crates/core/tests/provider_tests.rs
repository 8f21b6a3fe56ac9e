// ═══════════════════════════════════════════════════════════════════
// Provider Tests : Registry, Backend, MetalsDev logic
// ═══════════════════════════════════════════════════════════════════

use async_trait::async_trait;
use chrono::NaiveDate;

use gold_tracker_core::errors::CoreError;
use gold_tracker_core::models::settings::Settings;
use gold_tracker_core::providers::backend::BackendPriceProvider;
use gold_tracker_core::providers::metals_dev::MetalsDevProvider;
use gold_tracker_core::providers::registry::PriceProviderRegistry;
use gold_tracker_core::providers::traits::{GoldPriceProvider, GRAMS_PER_TROY_OUNCE};

// ═══════════════════════════════════════════════════════════════════
// Test Helpers : Mock Providers
// ═══════════════════════════════════════════════════════════════════

/// A mock provider that always quotes the same price.
struct FixedPriceProvider {
    name: String,
    price: f64,
}

impl FixedPriceProvider {
    fn new(name: &str, price: f64) -> Self {
        Self {
            name: name.to_string(),
            price,
        }
    }
}

#[async_trait]
impl GoldPriceProvider for FixedPriceProvider {
    fn name(&self) -> &str {
        &self.name
    }

    async fn current_price_per_gram(&self) -> Result<f64, CoreError> {
        Ok(self.price)
    }

    async fn historical_price_per_gram(&self, _date: NaiveDate) -> Result<f64, CoreError> {
        Ok(self.price)
    }
}

fn make_date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

// ═══════════════════════════════════════════════════════════════════
// PriceProviderRegistry
// ═══════════════════════════════════════════════════════════════════

mod registry {
    use super::*;

    #[test]
    fn new_is_empty() {
        let registry = PriceProviderRegistry::new();
        assert!(registry.is_empty());
        assert_eq!(registry.len(), 0);
        assert!(registry.names().is_empty());
    }

    #[test]
    fn default_is_empty() {
        assert!(PriceProviderRegistry::default().is_empty());
    }

    #[test]
    fn register_keeps_order() {
        let mut registry = PriceProviderRegistry::new();
        registry.register(Box::new(FixedPriceProvider::new("first", 1.0)));
        registry.register(Box::new(FixedPriceProvider::new("second", 2.0)));
        registry.register(Box::new(FixedPriceProvider::new("third", 3.0)));

        assert_eq!(registry.len(), 3);
        assert_eq!(registry.names(), vec!["first", "second", "third"]);
    }

    #[tokio::test]
    async fn providers_iterate_in_priority_order() {
        let mut registry = PriceProviderRegistry::new();
        registry.register(Box::new(FixedPriceProvider::new("first", 1.0)));
        registry.register(Box::new(FixedPriceProvider::new("second", 2.0)));

        let mut prices = Vec::new();
        for provider in registry.providers() {
            prices.push(provider.current_price_per_gram().await.unwrap());
        }
        assert_eq!(prices, vec![1.0, 2.0]);
    }

    #[test]
    fn from_default_settings_has_no_source() {
        let registry = PriceProviderRegistry::from_settings(&Settings::default());
        assert!(registry.is_empty());
    }

    #[test]
    fn from_settings_backend_only() {
        let settings = Settings {
            api_base_url: Some("http://nas.local:8080/api".into()),
            ..Settings::default()
        };
        let registry = PriceProviderRegistry::from_settings(&settings);
        assert_eq!(registry.names(), vec!["backend"]);
    }

    #[test]
    fn from_settings_metals_dev_only() {
        let settings = Settings {
            metals_dev_api_key: Some("key".into()),
            ..Settings::default()
        };
        let registry = PriceProviderRegistry::from_settings(&settings);
        assert_eq!(registry.names(), vec!["metals.dev"]);
    }

    #[test]
    fn from_settings_backend_before_metals_dev() {
        let settings = Settings {
            api_base_url: Some("http://nas.local:8080/api".into()),
            metals_dev_api_key: Some("key".into()),
            ..Settings::default()
        };
        let registry = PriceProviderRegistry::from_settings(&settings);
        assert_eq!(registry.names(), vec!["backend", "metals.dev"]);
    }
}

// ═══════════════════════════════════════════════════════════════════
// BackendPriceProvider
// ═══════════════════════════════════════════════════════════════════

mod backend {
    use super::*;

    #[test]
    fn name() {
        let provider = BackendPriceProvider::new("http://nas.local/api", 30);
        assert_eq!(provider.name(), "backend");
    }

    #[test]
    fn trailing_slashes_are_trimmed() {
        let provider = BackendPriceProvider::new("http://nas.local/api//", 30);
        assert_eq!(provider.base_url(), "http://nas.local/api");
    }

    #[test]
    fn endpoint_urls() {
        let provider = BackendPriceProvider::new("http://nas.local/api/", 30);
        assert_eq!(provider.current_price_url(), "http://nas.local/api/gold-price");
        assert_eq!(
            provider.historical_price_url(),
            "http://nas.local/api/gold-price/historical"
        );
    }

    #[test]
    fn parse_price() {
        let price = BackendPriceProvider::parse_price(r#"{"pricePerGram": 6150.25}"#).unwrap();
        assert_eq!(price, 6150.25);
    }

    #[test]
    fn parse_price_ignores_extra_fields() {
        let body = r#"{"pricePerGram": 6150, "currency": "INR", "source": "cache"}"#;
        assert_eq!(BackendPriceProvider::parse_price(body).unwrap(), 6150.0);
    }

    #[test]
    fn parse_price_missing_field() {
        let err = BackendPriceProvider::parse_price(r#"{"price": 6150}"#).unwrap_err();
        match err {
            CoreError::Api { provider, message } => {
                assert_eq!(provider, "backend");
                assert!(message.starts_with("Failed to parse price response"));
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn parse_price_not_json() {
        let err = BackendPriceProvider::parse_price("<html>502 Bad Gateway</html>").unwrap_err();
        assert!(matches!(err, CoreError::Api { .. }));
    }

    #[test]
    fn parse_price_does_not_judge_value() {
        // Rejecting non-positive prices is the price service's job
        assert_eq!(
            BackendPriceProvider::parse_price(r#"{"pricePerGram": 0}"#).unwrap(),
            0.0
        );
    }
}

// ═══════════════════════════════════════════════════════════════════
// MetalsDevProvider
// ═══════════════════════════════════════════════════════════════════

mod metals_dev {
    use super::*;

    fn assert_close(actual: f64, expected: f64) {
        assert!(
            (actual - expected).abs() < 1e-9,
            "expected {expected}, got {actual}"
        );
    }

    #[test]
    fn name_and_currency() {
        let provider = MetalsDevProvider::new("key".into(), "inr", 30);
        assert_eq!(provider.name(), "metals.dev");
        assert_eq!(provider.currency(), "INR");
    }

    #[test]
    fn troy_ounce_constant() {
        assert_eq!(GRAMS_PER_TROY_OUNCE, 31.1035);
    }

    #[test]
    fn parse_latest_converts_to_grams() {
        let body = r#"{
            "status": "success",
            "currency": "INR",
            "unit": "toz",
            "metals": { "gold": 194358.5, "silver": 2465.1 }
        }"#;
        let price = MetalsDevProvider::parse_latest(body).unwrap();
        assert_close(price, 194358.5 / GRAMS_PER_TROY_OUNCE);
    }

    #[test]
    fn parse_latest_without_gold() {
        let body = r#"{"metals": {"silver": 2465.1}}"#;
        let err = MetalsDevProvider::parse_latest(body).unwrap_err();
        match err {
            CoreError::PriceNotAvailable { provider, date } => {
                assert_eq!(provider, "metals.dev");
                assert_eq!(date, "latest");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn parse_latest_error_payload() {
        let body = r#"{"status": "failure", "error_code": 1101, "error_message": "Invalid API key"}"#;
        let err = MetalsDevProvider::parse_latest(body).unwrap_err();
        assert!(matches!(err, CoreError::Api { ref provider, .. } if provider == "metals.dev"));
    }

    #[test]
    fn parse_timeseries_picks_requested_day() {
        let body = r#"{
            "status": "success",
            "rates": {
                "2024-05-31": { "metals": { "gold": 190000.0 } },
                "2024-06-01": { "metals": { "gold": 191000.0 } }
            }
        }"#;
        let price = MetalsDevProvider::parse_timeseries(body, make_date(2024, 6, 1)).unwrap();
        assert_close(price, 191000.0 / GRAMS_PER_TROY_OUNCE);
    }

    #[test]
    fn parse_timeseries_missing_day() {
        let body = r#"{"rates": {"2024-05-31": {"metals": {"gold": 190000.0}}}}"#;
        let err = MetalsDevProvider::parse_timeseries(body, make_date(2024, 6, 1)).unwrap_err();
        match err {
            CoreError::PriceNotAvailable { provider, date } => {
                assert_eq!(provider, "metals.dev");
                assert_eq!(date, "2024-06-01");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn parse_timeseries_non_numeric_gold() {
        let body = r#"{"rates": {"2024-06-01": {"metals": {"gold": "n/a"}}}}"#;
        assert!(matches!(
            MetalsDevProvider::parse_timeseries(body, make_date(2024, 6, 1)),
            Err(CoreError::PriceNotAvailable { .. })
        ));
    }

    #[test]
    fn parse_timeseries_not_json() {
        let err = MetalsDevProvider::parse_timeseries("oops", make_date(2024, 6, 1)).unwrap_err();
        assert!(matches!(err, CoreError::Api { .. }));
    }
}
