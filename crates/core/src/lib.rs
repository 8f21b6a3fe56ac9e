pub mod errors;
pub mod models;
pub mod providers;
pub mod services;

use chrono::{Duration, NaiveDate, NaiveDateTime, Utc};
use models::{
    analytics::{PortfolioMetrics, PurchaseRow},
    chart::CumulativePoint,
    portfolio::Portfolio,
    price::PriceSnapshot,
    purchase::{Purchase, SortField, SortState},
    settings::Settings,
};
use services::{
    analytics_service::AnalyticsService, chart_service::ChartService,
    portfolio_service::PortfolioService, price_service::PriceService,
};
use uuid::Uuid;

use errors::CoreError;

/// Main entry point for the Gold Tracker core library.
/// Holds the purchase list, the latest prices, the table sort state and
/// all services needed to derive metrics from them.
#[must_use]
pub struct GoldTracker {
    portfolio: Portfolio,
    sort: SortState,
    portfolio_service: PortfolioService,
    analytics_service: AnalyticsService,
    chart_service: ChartService,
}

/// Which prices a refresh managed to update. A leg that failed keeps
/// its previous value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct PriceRefresh {
    pub current_updated: bool,
    pub historical_updated: bool,
}

impl PriceRefresh {
    pub fn all_updated(&self) -> bool {
        self.current_updated && self.historical_updated
    }
}

impl std::fmt::Debug for GoldTracker {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GoldTracker")
            .field("purchases", &self.portfolio.purchases.len())
            .field("prices", &self.portfolio.prices)
            .field("sort", &self.sort)
            .finish()
    }
}

impl GoldTracker {
    /// Create an empty tracker with default settings.
    pub fn create_new() -> Self {
        Self::build(Portfolio::default())
    }

    /// Create an empty tracker with the given (validated) settings.
    pub fn with_settings(settings: Settings) -> Result<Self, CoreError> {
        settings.validate()?;
        Ok(Self::build(Portfolio::new(settings)))
    }

    fn build(portfolio: Portfolio) -> Self {
        let analytics_service = AnalyticsService::with_settings(&portfolio.settings);
        Self {
            portfolio,
            sort: SortState::default(),
            portfolio_service: PortfolioService::new(),
            analytics_service,
            chart_service: ChartService::new(),
        }
    }

    #[must_use]
    pub fn settings(&self) -> &Settings {
        &self.portfolio.settings
    }

    #[must_use]
    pub fn portfolio(&self) -> &Portfolio {
        &self.portfolio
    }

    // ── Purchase Management ─────────────────────────────────────────

    /// Record a new purchase. The price per gram is derived from the inputs.
    pub fn add_purchase(
        &mut self,
        weight_grams: f64,
        amount_paid: f64,
        date: NaiveDate,
    ) -> Result<Uuid, CoreError> {
        let purchase = Purchase::new(weight_grams, amount_paid, date)?;
        let id = purchase.id;
        self.portfolio_service
            .add_purchase(&mut self.portfolio, purchase)?;
        Ok(id)
    }

    /// Replace an existing purchase's fields, keeping its id.
    pub fn update_purchase(
        &mut self,
        purchase_id: Uuid,
        weight_grams: f64,
        amount_paid: f64,
        date: NaiveDate,
    ) -> Result<(), CoreError> {
        self.portfolio_service.update_purchase(
            &mut self.portfolio,
            purchase_id,
            weight_grams,
            amount_paid,
            date,
        )
    }

    /// Delete a purchase by its id, returning it.
    pub fn remove_purchase(&mut self, purchase_id: Uuid) -> Result<Purchase, CoreError> {
        self.portfolio_service
            .remove_purchase(&mut self.portfolio, purchase_id)
    }

    /// Replace the whole list, e.g. after loading it from the purchase store.
    pub fn replace_purchases(&mut self, purchases: Vec<Purchase>) -> Result<(), CoreError> {
        self.portfolio_service
            .replace_purchases(&mut self.portfolio, purchases)
    }

    /// Replace the whole list from the purchase store's JSON payload
    /// (an array of `{id, weightGrams, amountPaid, date}` records).
    pub fn load_purchases_json(&mut self, json: &str) -> Result<(), CoreError> {
        let purchases: Vec<Purchase> = serde_json::from_str(json)?;
        self.replace_purchases(purchases)
    }

    #[must_use]
    pub fn get_purchase(&self, purchase_id: Uuid) -> Option<&Purchase> {
        self.portfolio.purchases.iter().find(|p| p.id == purchase_id)
    }

    /// All purchases in insertion order.
    #[must_use]
    pub fn purchases(&self) -> &[Purchase] {
        &self.portfolio.purchases
    }

    // ── Prices ──────────────────────────────────────────────────────

    #[must_use]
    pub fn prices(&self) -> &PriceSnapshot {
        &self.portfolio.prices
    }

    /// Manually enter the current price per gram (0 clears it).
    pub fn set_current_price(&mut self, price_per_gram: f64) -> Result<(), CoreError> {
        validate_manual_price(price_per_gram)?;
        self.portfolio.prices.current_price_per_gram = price_per_gram;
        self.portfolio.prices.current_fetched_on = None;
        Ok(())
    }

    /// Manually enter the historical price per gram (0 clears it).
    pub fn set_historical_price(&mut self, price_per_gram: f64) -> Result<(), CoreError> {
        validate_manual_price(price_per_gram)?;
        self.portfolio.prices.historical_price_per_gram = price_per_gram;
        self.portfolio.prices.historical_date = None;
        Ok(())
    }

    /// Fetch the current and the lookback price from the providers.
    /// Each leg is independent; a failed leg keeps its previous price.
    pub async fn refresh_prices(&mut self, price_service: &PriceService) -> PriceRefresh {
        let today = Utc::now().date_naive();
        self.refresh_prices_on(price_service, today).await
    }

    /// [`refresh_prices`](Self::refresh_prices) with an explicit "today".
    pub async fn refresh_prices_on(
        &mut self,
        price_service: &PriceService,
        today: NaiveDate,
    ) -> PriceRefresh {
        let mut report = PriceRefresh::default();
        let prices = &mut self.portfolio.prices;

        match price_service.current_price_per_gram().await {
            Ok(price) => {
                prices.current_price_per_gram = price;
                prices.current_fetched_on = Some(today);
                report.current_updated = true;
            }
            Err(e) => log::warn!(
                "Keeping previous current gold price {}: {e}",
                prices.current_price_per_gram
            ),
        }

        let lookback_date = today - Duration::days(i64::from(self.portfolio.settings.lookback_days));
        match price_service.historical_price_per_gram(lookback_date).await {
            Ok(price) => {
                prices.historical_price_per_gram = price;
                prices.historical_date = Some(lookback_date);
                report.historical_updated = true;
            }
            Err(e) => log::warn!(
                "Keeping previous historical gold price {}: {e}",
                prices.historical_price_per_gram
            ),
        }

        report
    }

    // ── Analytics ───────────────────────────────────────────────────

    /// Portfolio-wide metrics as of now.
    #[must_use]
    pub fn metrics(&self) -> PortfolioMetrics {
        self.metrics_at(Utc::now().naive_utc())
    }

    /// Portfolio-wide metrics as of `as_of`.
    #[must_use]
    pub fn metrics_at(&self, as_of: NaiveDateTime) -> PortfolioMetrics {
        self.analytics_service.portfolio_metrics(
            &self.portfolio.purchases,
            &self.portfolio.prices,
            as_of,
        )
    }

    // ── Purchase Table ──────────────────────────────────────────────

    #[must_use]
    pub fn sort_state(&self) -> SortState {
        self.sort
    }

    /// Click on a column header: new column sorts ascending, the active one flips.
    pub fn select_sort(&mut self, field: SortField) -> SortState {
        self.sort.select(field);
        self.sort
    }

    pub fn set_sort(&mut self, sort: SortState) {
        self.sort = sort;
    }

    /// Purchase rows in the active sort order.
    #[must_use]
    pub fn sorted_rows(&self) -> Vec<PurchaseRow> {
        let prices = &self.portfolio.prices;
        let sorted = self.portfolio_service.sorted(
            &self.portfolio.purchases,
            self.sort,
            prices.current_or_zero(),
        );
        self.analytics_service.purchase_rows(sorted, prices)
    }

    // ── Charts ──────────────────────────────────────────────────────

    /// Cumulative invested / value / returns, one point per purchase.
    #[must_use]
    pub fn chart_series(&self) -> Vec<CumulativePoint> {
        self.chart_service
            .cumulative_series(&self.portfolio.purchases, &self.portfolio.prices)
    }
}

fn validate_manual_price(price_per_gram: f64) -> Result<(), CoreError> {
    if !price_per_gram.is_finite() || price_per_gram < 0.0 {
        return Err(CoreError::ValidationError(format!(
            "Price per gram must be a non-negative number, got {price_per_gram}"
        )));
    }
    Ok(())
}
