pub mod errors;
pub mod models;
pub mod providers;
pub mod services;
pub mod storage;

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use errors::CoreError;
use models::{
    analysis::{Analysis, HoldingValuation, PortfolioTotals},
    asset::AssetInfo,
    event::ChangeEvent,
    holding::Holding,
    locale::Locale,
    portfolio::Portfolio,
    settings::Settings,
};
use providers::coingecko::CoinGeckoProvider;
use providers::openrouter::OpenRouterProvider;
use providers::traits::{AdviceProvider, MarketDataProvider};
use services::{
    analytics_service::AnalyticsService, catalog_service::CatalogService,
    portfolio_service::PortfolioService, price_service::PriceService,
    report_service::ReportService,
};
use storage::manager::StorageManager;

/// Settings key under which the advice-provider API key is stored.
const ADVICE_KEY: &str = "openrouter";

/// Default number of catalog entries fetched from the market-data API.
const DEFAULT_CATALOG_LIMIT: usize = 100;

/// Default period of the background price refresh. The free market-data API
/// is rate-limited, so refreshes are spaced out.
#[cfg(not(target_arch = "wasm32"))]
pub const DEFAULT_REFRESH_INTERVAL: std::time::Duration = std::time::Duration::from_secs(30);

/// Callback invoked after every portfolio mutation.
pub type ChangeListener = Box<dyn Fn(&ChangeEvent) + Send + Sync>;

/// Main entry point for the crypto-roast core library.
///
/// Owns the portfolio state and every service that operates on it. UI layers
/// call the operations below and subscribe to [`ChangeEvent`]s instead of
/// co-owning the data.
#[must_use]
pub struct CryptoRoast {
    portfolio: Portfolio,
    settings: Settings,
    /// Resolved asset catalog, keyed by asset id. Starts as the built-in
    /// fallback so purchases work before (or without) a catalog fetch.
    catalog: HashMap<String, AssetInfo>,
    catalog_live: bool,
    portfolio_service: PortfolioService,
    price_service: PriceService,
    catalog_service: CatalogService,
    analytics_service: AnalyticsService,
    report_service: ReportService,
    advice: Option<Box<dyn AdviceProvider>>,
    listeners: Vec<ChangeListener>,
    /// Overlap guard: at most one price refresh in flight at a time.
    refreshing: AtomicBool,
    /// Tracks whether any mutation has occurred since the last save/load.
    dirty: bool,
}

impl std::fmt::Debug for CryptoRoast {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CryptoRoast")
            .field("holdings", &self.portfolio.len())
            .field("catalog", &self.catalog.len())
            .field("catalog_live", &self.catalog_live)
            .field("settings", &self.settings)
            .field("dirty", &self.dirty)
            .finish()
    }
}

impl CryptoRoast {
    /// Create a brand new empty portfolio with default settings and the
    /// live CoinGecko market-data provider.
    pub fn create_new() -> Self {
        Self::build(Portfolio::default(), Settings::default())
    }

    /// Load a tracker from the persisted JSON holding array.
    ///
    /// Malformed records are dropped, not repaired; returns the tracker and
    /// how many records were discarded.
    pub fn load_from_json(data: &str) -> (Self, usize) {
        let (portfolio, dropped) = StorageManager::load_from_json(data);
        (Self::build(portfolio, Settings::default()), dropped)
    }

    /// Serialize the current holdings for persistence.
    /// Clears the unsaved-changes flag on success.
    pub fn save_to_json(&mut self) -> Result<String, CoreError> {
        let json = StorageManager::save_to_json(&self.portfolio)?;
        self.dirty = false;
        Ok(json)
    }

    /// Build with a custom market-data provider. Used by tests and by
    /// frontends that proxy the market API through their own backend.
    pub fn with_market_provider(
        portfolio: Portfolio,
        settings: Settings,
        market: Arc<dyn MarketDataProvider>,
    ) -> Self {
        let advice = settings
            .api_keys
            .get(ADVICE_KEY)
            .map(|key| Box::new(OpenRouterProvider::new(key.clone())) as Box<dyn AdviceProvider>);

        Self {
            portfolio,
            settings,
            catalog: CatalogService::fallback(),
            catalog_live: false,
            portfolio_service: PortfolioService::new(),
            price_service: PriceService::new(Arc::clone(&market)),
            catalog_service: CatalogService::new(market),
            analytics_service: AnalyticsService::new(),
            report_service: ReportService::new(),
            advice,
            listeners: Vec::new(),
            refreshing: AtomicBool::new(false),
            dirty: false,
        }
    }

    /// Replace the advice provider directly (tests, custom backends).
    pub fn set_advice_provider(&mut self, provider: Box<dyn AdviceProvider>) {
        self.advice = Some(provider);
    }

    pub fn has_advice_provider(&self) -> bool {
        self.advice.is_some()
    }

    // ── Catalog ─────────────────────────────────────────────────────

    /// Refresh the asset catalog from the market-data API.
    ///
    /// On failure the current catalog stays in place (the built-in fallback
    /// at minimum), so portfolio entry keeps working offline.
    /// Returns `true` when live data was loaded.
    pub async fn load_catalog(&mut self) -> bool {
        self.load_catalog_with_limit(DEFAULT_CATALOG_LIMIT).await
    }

    pub async fn load_catalog_with_limit(&mut self, limit: usize) -> bool {
        let (catalog, used_fallback) = self.catalog_service.load_catalog(limit).await;
        if used_fallback {
            return false;
        }
        self.catalog = catalog;
        self.catalog_live = true;
        self.notify(&ChangeEvent::CatalogLoaded(self.catalog.len()));
        true
    }

    pub fn lookup_asset(&self, asset_id: &str) -> Option<&AssetInfo> {
        self.catalog.get(asset_id)
    }

    pub fn catalog_size(&self) -> usize {
        self.catalog.len()
    }

    /// Whether the catalog was loaded from the API (vs. the offline fallback).
    pub fn catalog_is_live(&self) -> bool {
        self.catalog_live
    }

    /// Catalog entries sorted by market-cap rank (unranked last), for pickers.
    pub fn top_assets(&self, n: usize) -> Vec<&AssetInfo> {
        let mut assets: Vec<&AssetInfo> = self.catalog.values().collect();
        assets.sort_by(|a, b| {
            let ra = a.market_cap_rank.unwrap_or(u32::MAX);
            let rb = b.market_cap_rank.unwrap_or(u32::MAX);
            ra.cmp(&rb).then_with(|| a.id.cmp(&b.id))
        });
        assets.truncate(n);
        assets
    }

    // ── Holdings ────────────────────────────────────────────────────

    /// Record a purchase: merge into an existing holding (value-weighted
    /// average cost basis) or append a new one.
    ///
    /// Fails with `UnknownAsset` when the id does not resolve in the catalog
    /// and `InvalidInput` for non-positive quantity/price; the portfolio is
    /// unchanged on any error.
    pub fn add_purchase(
        &mut self,
        asset_id: &str,
        quantity: f64,
        price: f64,
    ) -> Result<(), CoreError> {
        let asset = self
            .catalog
            .get(asset_id)
            .cloned()
            .ok_or_else(|| CoreError::UnknownAsset(asset_id.to_string()))?;

        self.portfolio_service
            .add_purchase(&mut self.portfolio, &asset, quantity, price)?;
        self.dirty = true;
        self.notify(&ChangeEvent::HoldingAdded(asset.id));
        Ok(())
    }

    /// Remove the holding at `index`, returning it.
    /// Confirmation prompts are a UI concern.
    pub fn remove_holding(&mut self, index: usize) -> Result<Holding, CoreError> {
        let removed = self
            .portfolio_service
            .remove_holding(&mut self.portfolio, index)?;
        self.dirty = true;
        self.notify(&ChangeEvent::HoldingRemoved(removed.asset_id.clone()));
        Ok(removed)
    }

    /// Remove every holding. Never happens automatically.
    pub fn clear_portfolio(&mut self) {
        if self.portfolio.is_empty() {
            return;
        }
        self.portfolio.clear();
        self.dirty = true;
        self.notify(&ChangeEvent::PortfolioCleared);
    }

    pub fn holdings(&self) -> &[Holding] {
        &self.portfolio.holdings
    }

    pub fn holding_count(&self) -> usize {
        self.portfolio.len()
    }

    pub fn is_empty(&self) -> bool {
        self.portfolio.is_empty()
    }

    /// Returns `true` if the portfolio has been modified since the last
    /// save or load.
    #[must_use]
    pub fn has_unsaved_changes(&self) -> bool {
        self.dirty
    }

    // ── Prices ──────────────────────────────────────────────────────

    /// Refresh current prices for all held assets.
    ///
    /// At most one refresh is in flight at a time; a call that arrives while
    /// one is outstanding is dropped, not queued (the market API is
    /// rate-limited), and reports 0 updates. A failed fetch leaves every
    /// price unchanged and surfaces the error. Quotes are applied per
    /// holding by asset id, so holdings removed while the request was in
    /// flight are never resurrected.
    ///
    /// Returns the number of holdings whose price was updated.
    pub async fn refresh_prices(&mut self) -> Result<usize, CoreError> {
        if self.portfolio.is_empty() {
            return Ok(0);
        }
        if self.refreshing.swap(true, Ordering::SeqCst) {
            return Ok(0);
        }

        let ids = self.portfolio.asset_ids();
        let result = self.price_service.fetch_quotes(&ids).await;
        self.refreshing.store(false, Ordering::SeqCst);

        let quotes = result?;
        let updated = PriceService::apply_quotes(&mut self.portfolio, &quotes);
        if updated > 0 {
            self.dirty = true;
        }
        self.notify(&ChangeEvent::PricesRefreshed(updated));
        Ok(updated)
    }

    // ── Analytics ───────────────────────────────────────────────────

    /// Aggregate invested/current/P&L totals.
    #[must_use]
    pub fn totals(&self) -> PortfolioTotals {
        self.analytics_service.valuate_all(&self.portfolio)
    }

    /// Per-holding valuations, in portfolio order.
    #[must_use]
    pub fn valuations(&self) -> Vec<HoldingValuation> {
        self.portfolio
            .holdings
            .iter()
            .map(|h| self.analytics_service.valuate(h))
            .collect()
    }

    /// Classify the portfolio into an immutable analysis snapshot.
    #[must_use]
    pub fn analyze(&self) -> Analysis {
        self.analytics_service.classify(&self.portfolio)
    }

    /// Render the textual analysis report for the given locale.
    #[must_use]
    pub fn build_report(&self, locale: Locale) -> String {
        let analysis = self.analyze();
        self.report_service
            .render(&analysis, &self.portfolio, locale)
    }

    // ── Roast ───────────────────────────────────────────────────────

    /// Request Dobby's roast of the current portfolio.
    ///
    /// Fails with `NoProvider` when no advice API key is configured and with
    /// `InvalidInput` on an empty portfolio. Provider failures surface as
    /// errors — no fallback text is ever substituted for a failed response.
    pub async fn request_roast(&self, locale: Locale) -> Result<String, CoreError> {
        if self.portfolio.is_empty() {
            return Err(CoreError::InvalidInput("portfolio is empty".into()));
        }
        let advice = self
            .advice
            .as_deref()
            .ok_or_else(|| CoreError::NoProvider("advice".to_string()))?;

        let report = self.build_report(locale);
        advice.roast(&report, locale).await
    }

    // ── Settings ────────────────────────────────────────────────────

    #[must_use]
    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    #[must_use]
    pub fn locale(&self) -> Locale {
        self.settings.locale
    }

    pub fn set_locale(&mut self, locale: Locale) {
        self.settings.locale = locale;
    }

    /// Set an API key for a provider (e.g., "openrouter").
    /// Rebuilds the advice client so the new key takes effect immediately.
    pub fn set_api_key(&mut self, provider: impl Into<String>, key: impl Into<String>) {
        let provider = provider.into();
        let key = key.into();
        self.settings.api_keys.insert(provider.clone(), key.clone());
        if provider == ADVICE_KEY {
            self.advice = Some(Box::new(OpenRouterProvider::new(key)));
        }
    }

    /// Remove an API key. Drops the advice client when its key is removed.
    pub fn remove_api_key(&mut self, provider: &str) -> bool {
        let removed = self.settings.api_keys.remove(provider).is_some();
        if removed && provider == ADVICE_KEY {
            self.advice = None;
        }
        removed
    }

    // ── Observers ───────────────────────────────────────────────────

    /// Register a listener called after every state mutation.
    pub fn subscribe(&mut self, listener: ChangeListener) {
        self.listeners.push(listener);
    }

    fn notify(&self, event: &ChangeEvent) {
        for listener in &self.listeners {
            listener(event);
        }
    }

    // ── Internal ────────────────────────────────────────────────────

    fn build(portfolio: Portfolio, settings: Settings) -> Self {
        let market: Arc<dyn MarketDataProvider> = Arc::new(CoinGeckoProvider::new());
        Self::with_market_provider(portfolio, settings, market)
    }
}

// ── Periodic refresh (native only) ──────────────────────────────────

/// Handle to the background price-refresh task. The task is aborted when
/// the handle is dropped or `cancel` is called.
#[cfg(not(target_arch = "wasm32"))]
pub struct RefreshTask {
    handle: tokio::task::JoinHandle<()>,
}

#[cfg(not(target_arch = "wasm32"))]
impl RefreshTask {
    pub fn cancel(self) {
        self.handle.abort();
    }
}

#[cfg(not(target_arch = "wasm32"))]
impl Drop for RefreshTask {
    fn drop(&mut self) {
        self.handle.abort();
    }
}

/// Spawn the periodic price refresh: ticks immediately and then on a fixed
/// interval, refreshing only while the portfolio is non-empty. Fetch
/// failures degrade to stale prices and the task keeps ticking.
#[cfg(not(target_arch = "wasm32"))]
pub fn spawn_periodic_refresh(
    tracker: Arc<tokio::sync::RwLock<CryptoRoast>>,
    period: std::time::Duration,
) -> RefreshTask {
    let handle = tokio::spawn(async move {
        let mut interval = tokio::time::interval(period);
        interval.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Skip);
        loop {
            interval.tick().await;
            let mut guard = tracker.write().await;
            if guard.is_empty() {
                continue;
            }
            let _ = guard.refresh_prices().await;
        }
    });
    RefreshTask { handle }
}
