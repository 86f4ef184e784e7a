use std::collections::HashMap;
use std::sync::Arc;

use crate::errors::CoreError;
use crate::models::portfolio::Portfolio;
use crate::models::quote::PriceQuote;
use crate::providers::traits::MarketDataProvider;

/// Fetches market quotes and applies them onto portfolio holdings.
pub struct PriceService {
    provider: Arc<dyn MarketDataProvider>,
}

impl PriceService {
    pub fn new(provider: Arc<dyn MarketDataProvider>) -> Self {
        Self { provider }
    }

    pub fn provider_name(&self) -> &str {
        self.provider.name()
    }

    /// Fetch current quotes for the given asset ids.
    ///
    /// Partial responses are valid. Quotes with a non-finite or negative
    /// price are discarded rather than applied.
    pub async fn fetch_quotes(
        &self,
        ids: &[String],
    ) -> Result<HashMap<String, PriceQuote>, CoreError> {
        if ids.is_empty() {
            return Ok(HashMap::new());
        }
        let mut quotes = self.provider.quotes(ids).await?;
        quotes.retain(|_, q| q.price.is_finite() && q.price >= 0.0);
        Ok(quotes)
    }

    /// Apply fetched quotes onto the portfolio by asset-id lookup.
    ///
    /// Matched holdings get `current_price` and `image` overwritten; holdings
    /// with no matching quote keep their previous price (stale-price policy —
    /// the provider may omit delisted or unmapped assets). Quote ids with no
    /// matching holding are ignored, so a response that arrives after a
    /// holding was removed can never resurrect it.
    ///
    /// Each holding update is independently atomic; no-op on an empty
    /// portfolio or an empty map. Returns the number of holdings updated.
    pub fn apply_quotes(portfolio: &mut Portfolio, quotes: &HashMap<String, PriceQuote>) -> usize {
        if portfolio.is_empty() || quotes.is_empty() {
            return 0;
        }

        let mut updated = 0;
        for holding in &mut portfolio.holdings {
            if let Some(quote) = quotes.get(&holding.asset_id) {
                holding.current_price = quote.price;
                holding.image = quote.image.clone();
                updated += 1;
            }
        }
        updated
    }
}
