use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::errors::CoreError;

/// A single gold purchase.
///
/// `price_per_gram` is always derived from `amount_paid / weight_grams`;
/// records coming from the purchase store are re-derived on load, so a
/// stale or hand-edited `pricePerGram` never reaches the metrics.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", try_from = "PurchaseRecord")]
pub struct Purchase {
    /// Unique identifier
    pub id: Uuid,

    /// Weight bought, in grams (always positive)
    pub weight_grams: f64,

    /// Total amount paid, in the quote currency (always positive)
    pub amount_paid: f64,

    /// Purchase date (daily granularity)
    pub date: NaiveDate,

    /// amount_paid / weight_grams
    pub price_per_gram: f64,
}

/// Wire shape of a purchase as delivered by the purchase store.
#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct PurchaseRecord {
    id: Uuid,
    #[serde(alias = "grams")]
    weight_grams: f64,
    amount_paid: f64,
    date: NaiveDate,
}

impl TryFrom<PurchaseRecord> for Purchase {
    type Error = CoreError;

    fn try_from(record: PurchaseRecord) -> Result<Self, Self::Error> {
        Purchase::with_id(record.id, record.weight_grams, record.amount_paid, record.date)
    }
}

impl Purchase {
    /// Create a purchase with a fresh id.
    pub fn new(weight_grams: f64, amount_paid: f64, date: NaiveDate) -> Result<Self, CoreError> {
        Self::with_id(Uuid::new_v4(), weight_grams, amount_paid, date)
    }

    /// Create a purchase with a known id (reload or full replacement).
    pub fn with_id(
        id: Uuid,
        weight_grams: f64,
        amount_paid: f64,
        date: NaiveDate,
    ) -> Result<Self, CoreError> {
        if !weight_grams.is_finite() || weight_grams <= 0.0 {
            return Err(CoreError::ValidationError(format!(
                "Weight must be a positive number of grams, got {weight_grams}"
            )));
        }
        if !amount_paid.is_finite() || amount_paid <= 0.0 {
            return Err(CoreError::ValidationError(format!(
                "Amount paid must be a positive number, got {amount_paid}"
            )));
        }

        Ok(Self {
            id,
            weight_grams,
            amount_paid,
            date,
            price_per_gram: amount_paid / weight_grams,
        })
    }

    /// The purchase date as an instant (midnight), used for cash-flow day counts.
    pub fn datetime(&self) -> NaiveDateTime {
        self.date.and_time(NaiveTime::MIN)
    }

    /// Value of this purchase's gold at `price_per_gram`.
    pub fn current_value(&self, price_per_gram: f64) -> f64 {
        self.weight_grams * price_per_gram
    }

    /// Absolute gain/loss at `price_per_gram`.
    pub fn return_amount(&self, price_per_gram: f64) -> f64 {
        self.current_value(price_per_gram) - self.amount_paid
    }
}

/// Column a purchase listing can be sorted by.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum SortField {
    Date,
    Weight,
    AmountPaid,
    PricePerGram,
    /// weight × current price
    CurrentValue,
    /// current value − amount paid
    Return,
}

impl std::fmt::Display for SortField {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SortField::Date => write!(f, "Date"),
            SortField::Weight => write!(f, "Weight"),
            SortField::AmountPaid => write!(f, "Amount Paid"),
            SortField::PricePerGram => write!(f, "Price/Gram"),
            SortField::CurrentValue => write!(f, "Current Value"),
            SortField::Return => write!(f, "Return"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum SortDirection {
    Asc,
    Desc,
}

impl SortDirection {
    pub fn flipped(self) -> Self {
        match self {
            SortDirection::Asc => SortDirection::Desc,
            SortDirection::Desc => SortDirection::Asc,
        }
    }
}

/// Active sort column and direction of the purchase table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SortState {
    pub field: SortField,
    pub direction: SortDirection,
}

impl Default for SortState {
    /// Newest purchases first.
    fn default() -> Self {
        Self {
            field: SortField::Date,
            direction: SortDirection::Desc,
        }
    }
}

impl SortState {
    pub fn new(field: SortField, direction: SortDirection) -> Self {
        Self { field, direction }
    }

    /// Apply a column selection: a new column starts ascending,
    /// the active column flips direction.
    pub fn select(&mut self, field: SortField) {
        if self.field == field {
            self.direction = self.direction.flipped();
        } else {
            self.field = field;
            self.direction = SortDirection::Asc;
        }
    }
}
