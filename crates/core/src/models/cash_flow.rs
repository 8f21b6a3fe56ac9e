use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

/// A dated, signed amount: negative for money going in (a purchase),
/// positive for money coming back (the valued holding).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CashFlow {
    pub amount: f64,
    pub date: NaiveDateTime,
}

impl CashFlow {
    pub fn new(amount: f64, date: NaiveDateTime) -> Self {
        Self { amount, date }
    }

    pub fn is_outflow(&self) -> bool {
        self.amount < 0.0
    }

    pub fn is_inflow(&self) -> bool {
        self.amount > 0.0
    }
}
