use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use std::collections::HashMap;
#[cfg(not(target_arch = "wasm32"))]
use std::time::Duration;

use super::traits::MarketDataProvider;
use crate::errors::CoreError;
use crate::models::asset::AssetInfo;
use crate::models::quote::PriceQuote;

const BASE_URL: &str = "https://api.coingecko.com/api/v3";

/// CoinGecko API provider for the asset catalog and current prices.
///
/// - **Free**: no API key required (public endpoints, rate limited).
/// - **Endpoint**: `/coins/markets` serves both the top-N catalog and
///   id-filtered current quotes, so one client covers both needs.
///
/// CoinGecko uses lowercase ids like "bitcoin", "ethereum"; those ids are
/// the portfolio's asset keys.
pub struct CoinGeckoProvider {
    client: Client,
}

impl CoinGeckoProvider {
    pub fn new() -> Self {
        let builder = Client::builder();
        #[cfg(not(target_arch = "wasm32"))]
        let builder = builder.timeout(Duration::from_secs(30));
        Self {
            client: builder.build().unwrap_or_else(|_| Client::new()),
        }
    }

    async fn markets(&self, query: &str) -> Result<Vec<MarketEntry>, CoreError> {
        let url = format!(
            "{BASE_URL}/coins/markets?vs_currency=usd&order=market_cap_desc&sparkline=false&{query}"
        );
        let entries: Vec<MarketEntry> = self
            .client
            .get(&url)
            .send()
            .await?
            .json()
            .await
            .map_err(|e| CoreError::Api {
                provider: "CoinGecko".into(),
                message: format!("Failed to parse markets response: {e}"),
            })?;
        Ok(entries)
    }
}

impl Default for CoinGeckoProvider {
    fn default() -> Self {
        Self::new()
    }
}

// ── CoinGecko API response types ────────────────────────────────────

#[derive(Deserialize)]
struct MarketEntry {
    id: String,
    symbol: String,
    name: String,
    current_price: Option<f64>,
    market_cap_rank: Option<u32>,
    image: Option<String>,
}

#[cfg_attr(target_arch = "wasm32", async_trait(?Send))]
#[cfg_attr(not(target_arch = "wasm32"), async_trait)]
impl MarketDataProvider for CoinGeckoProvider {
    fn name(&self) -> &str {
        "CoinGecko"
    }

    async fn top_assets(&self, limit: usize) -> Result<Vec<AssetInfo>, CoreError> {
        let entries = self
            .markets(&format!("per_page={limit}&page=1"))
            .await?;

        let assets = entries
            .into_iter()
            .map(|e| {
                let mut asset = AssetInfo::new(e.id, e.symbol, e.name);
                asset.market_cap_rank = e.market_cap_rank;
                asset.image = e.image;
                asset
            })
            .collect();

        Ok(assets)
    }

    async fn quotes(&self, ids: &[String]) -> Result<HashMap<String, PriceQuote>, CoreError> {
        if ids.is_empty() {
            return Ok(HashMap::new());
        }

        let joined = ids.join(",");
        let entries = self
            .markets(&format!("ids={joined}&per_page={}&page=1", ids.len()))
            .await?;

        // Entries with no price (just-listed or stale assets) are omitted;
        // the applicator treats missing ids as "keep the previous price".
        let quotes = entries
            .into_iter()
            .filter_map(|e| {
                let price = e.current_price?;
                Some((
                    e.id,
                    PriceQuote {
                        price,
                        image: e.image,
                    },
                ))
            })
            .collect();

        Ok(quotes)
    }
}
