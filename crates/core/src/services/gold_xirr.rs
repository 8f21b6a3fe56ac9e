use chrono::NaiveDateTime;

use crate::errors::XirrError;
use crate::models::cash_flow::CashFlow;
use crate::models::price::is_usable_price;
use crate::models::purchase::Purchase;
use crate::services::xirr;

/// Build the cash-flow series for a gold holding valued at
/// `reference_price_per_gram` on `reference_date`.
///
/// Every purchase is an outflow on its purchase date; the whole holding is
/// one inflow, as if it were sold at the reference instant.
pub fn cash_flows(
    purchases: &[Purchase],
    reference_price_per_gram: f64,
    reference_date: NaiveDateTime,
) -> Vec<CashFlow> {
    let total_weight: f64 = purchases.iter().map(|p| p.weight_grams).sum();

    purchases
        .iter()
        .map(|p| CashFlow::new(-p.amount_paid, p.datetime()))
        .chain(std::iter::once(CashFlow::new(
            total_weight * reference_price_per_gram,
            reference_date,
        )))
        .collect()
}

/// Annualized return of the holding as a fraction, or why it is undefined.
pub fn try_gold_xirr(
    purchases: &[Purchase],
    reference_price_per_gram: f64,
    reference_date: NaiveDateTime,
) -> Result<f64, XirrError> {
    if purchases.is_empty() {
        return Err(XirrError::NoPurchases);
    }
    if !is_usable_price(reference_price_per_gram) {
        return Err(XirrError::InvalidReferencePrice(reference_price_per_gram));
    }

    xirr::solve(&cash_flows(purchases, reference_price_per_gram, reference_date))
}

/// Annualized return of the holding as a fraction (0.15 = 15%).
///
/// Any input without a defined rate yields 0.
pub fn gold_xirr(
    purchases: &[Purchase],
    reference_price_per_gram: f64,
    reference_date: NaiveDateTime,
) -> f64 {
    match try_gold_xirr(purchases, reference_price_per_gram, reference_date) {
        Ok(rate) => rate,
        Err(e) => {
            log::debug!("XIRR unavailable at {reference_date}, reporting 0: {e}");
            0.0
        }
    }
}
