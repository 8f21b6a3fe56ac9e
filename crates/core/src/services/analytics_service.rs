use chrono::{Duration, NaiveDateTime};

use crate::errors::XirrError;
use crate::models::analytics::{AnnualizedReturn, PortfolioMetrics, PurchaseRow};
use crate::models::price::PriceSnapshot;
use crate::models::purchase::Purchase;
use crate::models::settings::{Settings, SinceLastInvestmentBasis};
use crate::services::gold_xirr;

/// Computes the dashboard metrics: totals, simple returns and XIRR.
///
/// Pure business logic over a snapshot of purchases and prices. Every
/// ratio is guarded, so the output never contains NaN or infinity.
pub struct AnalyticsService {
    lookback_days: u32,
    since_last_investment_basis: SinceLastInvestmentBasis,
}

impl AnalyticsService {
    pub fn new() -> Self {
        Self::with_settings(&Settings::default())
    }

    pub fn with_settings(settings: &Settings) -> Self {
        Self {
            lookback_days: settings.lookback_days,
            since_last_investment_basis: settings.since_last_investment_basis,
        }
    }

    /// Generate the full metric set as of `as_of`.
    ///
    /// Computes:
    /// - Total weight, total invested and average price per gram
    /// - Current value, total return and % return
    /// - Return against the historical price ("monthly")
    /// - Return since the most recent purchase
    /// - XIRR now, at the lookback date, and since the last investment
    ///
    /// Without a usable current price every figure that uses it is 0; the
    /// lookback XIRR still comes from the historical price alone.
    pub fn portfolio_metrics(
        &self,
        purchases: &[Purchase],
        prices: &PriceSnapshot,
        as_of: NaiveDateTime,
    ) -> PortfolioMetrics {
        if purchases.is_empty() {
            return PortfolioMetrics::empty(as_of);
        }

        let mut metrics = PortfolioMetrics::empty(as_of);
        metrics.purchase_count = purchases.len();

        // 1. Aggregates that need no price
        metrics.total_weight = purchases.iter().map(|p| p.weight_grams).sum();
        metrics.total_invested = purchases.iter().map(|p| p.amount_paid).sum();
        metrics.average_price_per_gram = safe_div(metrics.total_invested, metrics.total_weight);

        let last = Self::last_investment(purchases);
        metrics.last_investment_date = last.map(|p| p.date);

        // The lookback XIRR needs only the historical price
        if prices.has_historical() {
            metrics.previous_value = metrics.total_weight * prices.historical_price_per_gram;
            let lookback_date = as_of - Duration::days(i64::from(self.lookback_days));
            metrics.monthly_xirr = annualized(gold_xirr::try_gold_xirr(
                purchases,
                prices.historical_price_per_gram,
                lookback_date,
            ));
        }

        if !prices.has_current() {
            return metrics;
        }
        let current_price = prices.current_price_per_gram;

        // 2. Valuation
        metrics.current_value = metrics.total_weight * current_price;
        metrics.total_return = metrics.current_value - metrics.total_invested;
        metrics.return_pct = pct_of(metrics.total_return, metrics.total_invested);

        // 3. Against the historical valuation
        if prices.has_historical() {
            metrics.monthly_return = metrics.current_value - metrics.previous_value;
            metrics.monthly_return_pct = pct_of(metrics.monthly_return, metrics.previous_value);
        }

        // 4. Since the most recent purchase
        if let Some(last) = last {
            let delta = current_price - last.price_per_gram;
            let weight = match self.since_last_investment_basis {
                SinceLastInvestmentBasis::TotalWeight => metrics.total_weight,
                SinceLastInvestmentBasis::LastPurchaseWeight => last.weight_grams,
            };
            metrics.return_since_last_investment = delta * weight;
            metrics.return_since_last_investment_pct = pct_of(delta, last.price_per_gram);
        }

        // 5. Money-weighted returns
        metrics.total_xirr = annualized(gold_xirr::try_gold_xirr(purchases, current_price, as_of));
        if last.is_some() {
            metrics.since_last_investment_xirr =
                annualized(gold_xirr::try_gold_xirr(purchases, current_price, as_of));
        }

        metrics
    }

    /// Valuation of a single purchase at the current price.
    pub fn purchase_row(&self, purchase: &Purchase, prices: &PriceSnapshot) -> PurchaseRow {
        let current_value = purchase.current_value(prices.current_or_zero());
        let return_amount = current_value - purchase.amount_paid;

        PurchaseRow {
            purchase: purchase.clone(),
            current_value,
            return_amount,
            return_pct: pct_of(return_amount, purchase.amount_paid),
        }
    }

    pub fn purchase_rows<'a>(
        &self,
        purchases: impl IntoIterator<Item = &'a Purchase>,
        prices: &PriceSnapshot,
    ) -> Vec<PurchaseRow> {
        purchases
            .into_iter()
            .map(|p| self.purchase_row(p, prices))
            .collect()
    }

    /// The most recently dated purchase; on equal dates the one added first wins.
    pub fn last_investment(purchases: &[Purchase]) -> Option<&Purchase> {
        purchases.iter().fold(None, |latest: Option<&Purchase>, p| match latest {
            Some(l) if l.date >= p.date => Some(l),
            _ => Some(p),
        })
    }
}

impl Default for AnalyticsService {
    fn default() -> Self {
        Self::new()
    }
}

fn annualized(result: Result<f64, XirrError>) -> AnnualizedReturn {
    match result {
        Ok(rate) => AnnualizedReturn::solved(rate),
        Err(e) => {
            log::debug!("XIRR reported as 0: {e}");
            AnnualizedReturn::unsolved()
        }
    }
}

fn safe_div(numerator: f64, denominator: f64) -> f64 {
    if denominator > 0.0 && denominator.is_finite() {
        numerator / denominator
    } else {
        0.0
    }
}

fn pct_of(numerator: f64, denominator: f64) -> f64 {
    safe_div(numerator, denominator) * 100.0
}
