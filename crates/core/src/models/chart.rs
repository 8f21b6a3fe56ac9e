use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// A single point of the cumulative investment chart.
///
/// The core generates these; the frontend just renders them.
/// One point per purchase, in chronological order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CumulativePoint {
    /// Date of the purchase that closes this point
    pub date: NaiveDate,

    /// Sum of amounts paid up to and including this purchase
    pub invested: f64,

    /// Cumulative weight valued at the current price
    pub value: f64,

    /// value − invested
    pub returns: f64,
}
