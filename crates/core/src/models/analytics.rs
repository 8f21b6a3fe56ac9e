use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

use super::purchase::Purchase;

/// An annualized money-weighted return, in percent.
///
/// `pct` is 0 whenever the rate could not be solved; `solved` tells a
/// genuine 0% apart from "undefined".
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnnualizedReturn {
    pub pct: f64,
    pub solved: bool,
}

impl AnnualizedReturn {
    pub fn solved(rate: f64) -> Self {
        Self {
            pct: rate * 100.0,
            solved: true,
        }
    }

    pub fn unsolved() -> Self {
        Self::default()
    }
}

/// Every portfolio-wide figure shown on the dashboard.
/// Plain numbers only; formatting belongs to the frontend.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PortfolioMetrics {
    /// Instant the valuation was computed for
    pub as_of: NaiveDateTime,

    pub purchase_count: usize,

    pub total_weight: f64,

    /// Sum of all amounts paid
    pub total_invested: f64,

    /// total_invested / total_weight
    pub average_price_per_gram: f64,

    /// total_weight × current price
    pub current_value: f64,

    /// current_value − total_invested
    pub total_return: f64,

    /// total_return / total_invested × 100
    pub return_pct: f64,

    /// total_weight × historical price
    pub previous_value: f64,

    /// current_value − previous_value
    pub monthly_return: f64,

    /// monthly_return / previous_value × 100
    pub monthly_return_pct: f64,

    /// Date of the most recent purchase, if any
    pub last_investment_date: Option<NaiveDate>,

    /// Price-per-gram movement since the most recent purchase, scaled by weight
    pub return_since_last_investment: f64,

    /// Price-per-gram movement relative to the most recent purchase price × 100
    pub return_since_last_investment_pct: f64,

    pub total_xirr: AnnualizedReturn,

    pub monthly_xirr: AnnualizedReturn,

    pub since_last_investment_xirr: AnnualizedReturn,
}

impl PortfolioMetrics {
    /// All-zero metrics for an empty portfolio.
    pub fn empty(as_of: NaiveDateTime) -> Self {
        Self {
            as_of,
            purchase_count: 0,
            total_weight: 0.0,
            total_invested: 0.0,
            average_price_per_gram: 0.0,
            current_value: 0.0,
            total_return: 0.0,
            return_pct: 0.0,
            previous_value: 0.0,
            monthly_return: 0.0,
            monthly_return_pct: 0.0,
            last_investment_date: None,
            return_since_last_investment: 0.0,
            return_since_last_investment_pct: 0.0,
            total_xirr: AnnualizedReturn::unsolved(),
            monthly_xirr: AnnualizedReturn::unsolved(),
            since_last_investment_xirr: AnnualizedReturn::unsolved(),
        }
    }
}

/// One row of the purchase table: the purchase plus its valuation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PurchaseRow {
    pub purchase: Purchase,

    /// weight_grams × current price
    pub current_value: f64,

    /// current_value − amount_paid
    pub return_amount: f64,

    /// return_amount / amount_paid × 100
    pub return_pct: f64,
}
