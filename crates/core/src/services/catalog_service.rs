use std::collections::HashMap;
use std::sync::Arc;

use crate::models::asset::AssetInfo;
use crate::providers::traits::MarketDataProvider;

/// Loads the top-N asset catalog used to validate and display holdings.
pub struct CatalogService {
    provider: Arc<dyn MarketDataProvider>,
}

impl CatalogService {
    pub fn new(provider: Arc<dyn MarketDataProvider>) -> Self {
        Self { provider }
    }

    /// Fetch the top `limit` assets by market cap, keyed by asset id.
    ///
    /// On any provider failure (or an empty response) the built-in fallback
    /// catalog is returned instead, so portfolio entry keeps working offline.
    /// The second element reports whether the fallback was used.
    pub async fn load_catalog(&self, limit: usize) -> (HashMap<String, AssetInfo>, bool) {
        match self.provider.top_assets(limit).await {
            Ok(assets) if !assets.is_empty() => (Self::index(assets), false),
            _ => (Self::fallback(), true),
        }
    }

    /// The built-in offline catalog of ~10 well-known assets, keyed by id.
    pub fn fallback() -> HashMap<String, AssetInfo> {
        Self::index(AssetInfo::fallback_catalog())
    }

    fn index(assets: Vec<AssetInfo>) -> HashMap<String, AssetInfo> {
        assets.into_iter().map(|a| (a.id.clone(), a)).collect()
    }
}
