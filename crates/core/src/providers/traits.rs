use async_trait::async_trait;
use std::collections::HashMap;

use crate::errors::CoreError;
use crate::models::asset::AssetInfo;
use crate::models::locale::Locale;
use crate::models::quote::PriceQuote;

/// Trait abstraction for the market-data collaborator.
///
/// The live implementation talks to CoinGecko. If that API stops working or
/// changes, only the one implementation is replaced — the rest of the
/// codebase is untouched, and tests substitute mocks.
#[cfg_attr(target_arch = "wasm32", async_trait(?Send))]
#[cfg_attr(not(target_arch = "wasm32"), async_trait)]
pub trait MarketDataProvider: Send + Sync {
    /// Human-readable name of this provider (for errors).
    fn name(&self) -> &str;

    /// Top assets by market capitalization, normalized into `AssetInfo`.
    async fn top_assets(&self, limit: usize) -> Result<Vec<AssetInfo>, CoreError>;

    /// Current quotes for the given asset ids.
    ///
    /// Partial responses are valid: ids the provider does not know (delisted
    /// or unmapped assets) are simply absent from the returned map.
    async fn quotes(&self, ids: &[String]) -> Result<HashMap<String, PriceQuote>, CoreError>;
}

/// Trait abstraction for the advice-generation collaborator.
#[cfg_attr(target_arch = "wasm32", async_trait(?Send))]
#[cfg_attr(not(target_arch = "wasm32"), async_trait)]
pub trait AdviceProvider: Send + Sync {
    /// Human-readable name of this provider (for errors).
    fn name(&self) -> &str;

    /// Turn a rendered portfolio report into free-text advice.
    ///
    /// Failures must surface as errors. Callers never substitute fabricated
    /// advice for a failed response — that would break the trust contract of
    /// the feature.
    async fn roast(&self, report: &str, locale: Locale) -> Result<String, CoreError>;
}
