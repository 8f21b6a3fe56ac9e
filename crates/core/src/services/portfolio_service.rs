use chrono::{NaiveDate, Utc};
use std::cmp::Ordering;
use std::collections::HashSet;
use uuid::Uuid;

use crate::errors::CoreError;
use crate::models::portfolio::Portfolio;
use crate::models::purchase::{Purchase, SortDirection, SortField, SortState};

/// Manages the purchase list and the order it is displayed in.
pub struct PortfolioService;

impl PortfolioService {
    pub fn new() -> Self {
        Self
    }

    /// Append a new purchase. Insertion order is kept; it is the
    /// tie-breaker for every sort.
    pub fn add_purchase(&self, portfolio: &mut Portfolio, purchase: Purchase) -> Result<(), CoreError> {
        self.validate_date(purchase.date)?;
        if portfolio.purchases.iter().any(|p| p.id == purchase.id) {
            return Err(CoreError::ValidationError(format!(
                "A purchase with id {} already exists",
                purchase.id
            )));
        }
        portfolio.purchases.push(purchase);
        Ok(())
    }

    /// Remove a purchase by its id and hand it back.
    pub fn remove_purchase(&self, portfolio: &mut Portfolio, purchase_id: Uuid) -> Result<Purchase, CoreError> {
        let idx = self.position(portfolio, purchase_id)?;
        Ok(portfolio.purchases.remove(idx))
    }

    /// Replace a purchase wholesale, keeping its id and its place in the list.
    pub fn update_purchase(
        &self,
        portfolio: &mut Portfolio,
        purchase_id: Uuid,
        weight_grams: f64,
        amount_paid: f64,
        date: NaiveDate,
    ) -> Result<(), CoreError> {
        let idx = self.position(portfolio, purchase_id)?;
        let updated = Purchase::with_id(purchase_id, weight_grams, amount_paid, date)?;
        self.validate_date(updated.date)?;
        portfolio.purchases[idx] = updated;
        Ok(())
    }

    /// Swap in a freshly loaded purchase list (e.g. after a reload from the store).
    /// The current list is left untouched if the new one has duplicate ids.
    pub fn replace_purchases(&self, portfolio: &mut Portfolio, purchases: Vec<Purchase>) -> Result<(), CoreError> {
        let mut seen = HashSet::with_capacity(purchases.len());
        for purchase in &purchases {
            if !seen.insert(purchase.id) {
                return Err(CoreError::ValidationError(format!(
                    "Duplicate purchase id {} in loaded data",
                    purchase.id
                )));
            }
        }
        portfolio.purchases = purchases;
        Ok(())
    }

    /// Purchases in table order.
    ///
    /// Ties on the sort key fall back to insertion order, and descending is
    /// the exact reverse of ascending (ties included), so the order is total.
    pub fn sorted<'a>(
        &self,
        purchases: &'a [Purchase],
        sort: SortState,
        current_price_per_gram: f64,
    ) -> Vec<&'a Purchase> {
        let mut indexed: Vec<(usize, &Purchase)> = purchases.iter().enumerate().collect();
        indexed.sort_by(|(ia, a), (ib, b)| {
            let ord = compare_by(sort.field, a, b, current_price_per_gram).then(ia.cmp(ib));
            match sort.direction {
                SortDirection::Asc => ord,
                SortDirection::Desc => ord.reverse(),
            }
        });
        indexed.into_iter().map(|(_, p)| p).collect()
    }

    fn position(&self, portfolio: &Portfolio, purchase_id: Uuid) -> Result<usize, CoreError> {
        portfolio
            .purchases
            .iter()
            .position(|p| p.id == purchase_id)
            .ok_or_else(|| CoreError::PurchaseNotFound(purchase_id.to_string()))
    }

    /// Reject dates in the future (allow +1 day tolerance for timezone differences).
    fn validate_date(&self, date: NaiveDate) -> Result<(), CoreError> {
        let today = Utc::now().date_naive();
        if let Some(tomorrow) = today.succ_opt() {
            if date > tomorrow {
                return Err(CoreError::ValidationError(format!(
                    "Purchase date {date} is in the future"
                )));
            }
        }
        Ok(())
    }
}

impl Default for PortfolioService {
    fn default() -> Self {
        Self::new()
    }
}

fn compare_by(field: SortField, a: &Purchase, b: &Purchase, price: f64) -> Ordering {
    match field {
        SortField::Date => a.date.cmp(&b.date),
        SortField::Weight => a.weight_grams.total_cmp(&b.weight_grams),
        SortField::AmountPaid => a.amount_paid.total_cmp(&b.amount_paid),
        SortField::PricePerGram => a.price_per_gram.total_cmp(&b.price_per_gram),
        SortField::CurrentValue => a.current_value(price).total_cmp(&b.current_value(price)),
        SortField::Return => a.return_amount(price).total_cmp(&b.return_amount(price)),
    }
}
