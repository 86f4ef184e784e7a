use serde::{Deserialize, Serialize};

/// One entry of the asset catalog: a coin the user can add to the portfolio.
///
/// External market-data shapes are normalized into this type at the provider
/// boundary, so the rest of the library never depends on provider field names.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AssetInfo {
    /// Stable market-data identifier (e.g., "bitcoin") — unique catalog key
    pub id: String,

    /// Ticker symbol, uppercased (e.g., "BTC")
    pub symbol: String,

    /// Human-readable name (e.g., "Bitcoin")
    pub name: String,

    /// Rank by market capitalization, if known
    #[serde(default)]
    pub market_cap_rank: Option<u32>,

    /// Display icon URL — never used in computation
    #[serde(default)]
    pub image: Option<String>,
}

impl AssetInfo {
    pub fn new(
        id: impl Into<String>,
        symbol: impl Into<String>,
        name: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            symbol: symbol.into().to_uppercase(),
            name: name.into(),
            market_cap_rank: None,
            image: None,
        }
    }

    /// Built-in catalog used when the market-data API is unreachable,
    /// so portfolio entry keeps working offline.
    pub fn fallback_catalog() -> Vec<AssetInfo> {
        let defaults = [
            ("bitcoin", "BTC", "Bitcoin"),
            ("ethereum", "ETH", "Ethereum"),
            ("binancecoin", "BNB", "Binance Coin"),
            ("ripple", "XRP", "Ripple"),
            ("cardano", "ADA", "Cardano"),
            ("solana", "SOL", "Solana"),
            ("polkadot", "DOT", "Polkadot"),
            ("chainlink", "LINK", "Chainlink"),
            ("litecoin", "LTC", "Litecoin"),
            ("bitcoin-cash", "BCH", "Bitcoin Cash"),
        ];
        defaults
            .iter()
            .map(|(id, symbol, name)| AssetInfo::new(*id, *symbol, *name))
            .collect()
    }
}
