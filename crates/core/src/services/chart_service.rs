use crate::models::chart::CumulativePoint;
use crate::models::price::PriceSnapshot;
use crate::models::purchase::Purchase;

/// Generates chart-ready data sets from the purchase history.
///
/// Every number is computed here; a frontend only draws it.
pub struct ChartService;

impl ChartService {
    pub fn new() -> Self {
        Self
    }

    /// Running totals of money invested and of the gold's current value.
    ///
    /// Purchases are taken oldest first (same-day purchases keep their
    /// insertion order) and each one closes a point. Every weight is valued
    /// at today's price, so `returns` shows what the holding built up to
    /// that date is worth now. Without a usable price the value is 0.
    ///
    /// Single pass: O(n log n) for the sort, O(n) for the reduction.
    pub fn cumulative_series(
        &self,
        purchases: &[Purchase],
        prices: &PriceSnapshot,
    ) -> Vec<CumulativePoint> {
        let price = prices.current_or_zero();

        let mut chronological: Vec<&Purchase> = purchases.iter().collect();
        chronological.sort_by_key(|p| p.date);

        let mut invested = 0.0;
        let mut weight = 0.0;

        chronological
            .into_iter()
            .map(|purchase| {
                invested += purchase.amount_paid;
                weight += purchase.weight_grams;
                let value = weight * price;

                CumulativePoint {
                    date: purchase.date,
                    invested,
                    value,
                    returns: value - invested,
                }
            })
            .collect()
    }
}

impl Default for ChartService {
    fn default() -> Self {
        Self::new()
    }
}
