use serde::{Deserialize, Serialize};

use super::price::PriceSnapshot;
use super::purchase::Purchase;
use super::settings::Settings;

/// The in-memory aggregate: the purchase list (in insertion order),
/// the latest known prices, and the settings they were fetched with.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Portfolio {
    pub purchases: Vec<Purchase>,

    pub prices: PriceSnapshot,

    pub settings: Settings,
}

impl Portfolio {
    pub fn new(settings: Settings) -> Self {
        Self {
            purchases: Vec::new(),
            prices: PriceSnapshot::default(),
            settings,
        }
    }
}
