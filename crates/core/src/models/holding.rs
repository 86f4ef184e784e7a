use serde::{Deserialize, Serialize};

use super::asset::AssetInfo;

/// One portfolio position in a single asset.
///
/// `cost_basis` is the value-weighted average purchase price per unit:
/// repeat purchases of the same asset are merged, never stored as lots.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Holding {
    /// Stable market-data identifier — unique key within the portfolio
    pub asset_id: String,

    /// Ticker symbol (e.g., "BTC")
    pub symbol: String,

    /// Human-readable name (e.g., "Bitcoin")
    pub name: String,

    /// Units held; fractional down to at least 8 decimal places
    pub quantity: f64,

    /// Average purchase price per unit in USD
    pub cost_basis: f64,

    /// Latest known market price per unit in USD; 0 until the first refresh
    #[serde(default)]
    pub current_price: f64,

    /// Display icon URL — not used in computation
    #[serde(default)]
    pub image: Option<String>,
}

impl Holding {
    /// Create a fresh holding from a resolved catalog entry.
    /// The current price stays at 0 until the next price refresh.
    pub fn new(asset: &AssetInfo, quantity: f64, cost_basis: f64) -> Self {
        Self {
            asset_id: asset.id.clone(),
            symbol: asset.symbol.clone(),
            name: asset.name.clone(),
            quantity,
            cost_basis,
            current_price: 0.0,
            image: asset.image.clone(),
        }
    }

    /// Value paid for this position.
    pub fn invested(&self) -> f64 {
        self.quantity * self.cost_basis
    }

    /// Value at the latest known market price.
    pub fn current_value(&self) -> f64 {
        self.quantity * self.current_price
    }
}
