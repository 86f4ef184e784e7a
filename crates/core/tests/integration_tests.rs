// ═══════════════════════════════════════════════════════════════════
// Integration Tests — the CryptoRoast facade with mock providers
// ═══════════════════════════════════════════════════════════════════

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use crypto_roast_core::errors::CoreError;
use crypto_roast_core::models::asset::AssetInfo;
use crypto_roast_core::models::event::ChangeEvent;
use crypto_roast_core::models::locale::Locale;
use crypto_roast_core::models::portfolio::Portfolio;
use crypto_roast_core::models::quote::PriceQuote;
use crypto_roast_core::models::settings::Settings;
use crypto_roast_core::providers::traits::{AdviceProvider, MarketDataProvider};
use crypto_roast_core::CryptoRoast;

// ═══════════════════════════════════════════════════════════════════
// Mock Providers (for testing without real API calls)
// ═══════════════════════════════════════════════════════════════════

struct MockMarket {
    assets: Vec<AssetInfo>,
    quotes: HashMap<String, PriceQuote>,
    fail: bool,
}

impl MockMarket {
    fn new() -> Self {
        Self {
            assets: Vec::new(),
            quotes: HashMap::new(),
            fail: false,
        }
    }

    fn offline() -> Self {
        Self {
            fail: true,
            ..Self::new()
        }
    }

    fn with_quote(mut self, id: &str, price: f64) -> Self {
        self.quotes.insert(id.to_string(), PriceQuote::new(price));
        self
    }

    fn with_asset(mut self, id: &str, symbol: &str, name: &str, rank: u32) -> Self {
        let mut asset = AssetInfo::new(id, symbol, name);
        asset.market_cap_rank = Some(rank);
        self.assets.push(asset);
        self
    }
}

#[async_trait]
impl MarketDataProvider for MockMarket {
    fn name(&self) -> &str {
        "Mock"
    }

    async fn top_assets(&self, limit: usize) -> Result<Vec<AssetInfo>, CoreError> {
        if self.fail {
            return Err(CoreError::Network("mock offline".into()));
        }
        Ok(self.assets.iter().take(limit).cloned().collect())
    }

    async fn quotes(&self, ids: &[String]) -> Result<HashMap<String, PriceQuote>, CoreError> {
        if self.fail {
            return Err(CoreError::Network("mock offline".into()));
        }
        Ok(ids
            .iter()
            .filter_map(|id| self.quotes.get(id).map(|q| (id.clone(), q.clone())))
            .collect())
    }
}

struct MockAdvice {
    fail: bool,
    last_report: Mutex<Option<String>>,
}

impl MockAdvice {
    fn new(fail: bool) -> Self {
        Self {
            fail,
            last_report: Mutex::new(None),
        }
    }
}

#[async_trait]
impl AdviceProvider for MockAdvice {
    fn name(&self) -> &str {
        "MockAdvice"
    }

    async fn roast(&self, report: &str, locale: Locale) -> Result<String, CoreError> {
        if self.fail {
            return Err(CoreError::Api {
                provider: "MockAdvice".into(),
                message: "HTTP 500".into(),
            });
        }
        if let Ok(mut last) = self.last_report.lock() {
            *last = Some(report.to_string());
        }
        Ok(format!("[{locale}] your portfolio is a disaster"))
    }
}

fn tracker_with(market: MockMarket) -> CryptoRoast {
    CryptoRoast::with_market_provider(Portfolio::new(), Settings::default(), Arc::new(market))
}

// ── Purchases through the facade ────────────────────────────────────

mod purchases {
    use super::*;

    #[test]
    fn fallback_catalog_allows_offline_purchases() {
        let mut tracker = tracker_with(MockMarket::offline());

        tracker
            .add_purchase("bitcoin", 0.5, 40000.0)
            .expect("bitcoin is in the fallback catalog");
        assert_eq!(tracker.holding_count(), 1);
        assert_eq!(tracker.holdings()[0].symbol, "BTC");
    }

    #[test]
    fn unknown_asset_is_rejected() {
        let mut tracker = tracker_with(MockMarket::new());

        let err = tracker
            .add_purchase("dogcoin", 1.0, 1.0)
            .expect_err("not in any catalog");
        assert!(matches!(err, CoreError::UnknownAsset(id) if id == "dogcoin"));
        assert!(tracker.is_empty());
    }

    #[test]
    fn remove_returns_holding_and_shrinks_portfolio() {
        let mut tracker = tracker_with(MockMarket::new());
        tracker.add_purchase("bitcoin", 1.0, 100.0).expect("valid");
        tracker.add_purchase("ethereum", 2.0, 50.0).expect("valid");

        let removed = tracker.remove_holding(0).expect("valid index");
        assert_eq!(removed.asset_id, "bitcoin");
        assert_eq!(tracker.holding_count(), 1);
    }

    #[test]
    fn clear_empties_the_portfolio() {
        let mut tracker = tracker_with(MockMarket::new());
        tracker.add_purchase("bitcoin", 1.0, 100.0).expect("valid");

        tracker.clear_portfolio();
        assert!(tracker.is_empty());
    }
}

// ── Catalog loading ─────────────────────────────────────────────────

mod catalog {
    use super::*;

    #[tokio::test]
    async fn successful_load_replaces_fallback() {
        let market = MockMarket::new()
            .with_asset("dogecoin", "doge", "Dogecoin", 8)
            .with_asset("bitcoin", "btc", "Bitcoin", 1);
        let mut tracker = tracker_with(market);
        assert!(!tracker.catalog_is_live());

        let live = tracker.load_catalog().await;
        assert!(live);
        assert!(tracker.catalog_is_live());
        assert_eq!(tracker.catalog_size(), 2);
        assert!(tracker.lookup_asset("dogecoin").is_some());
        // Fallback-only entries are gone after a live load.
        assert!(tracker.lookup_asset("litecoin").is_none());
    }

    #[tokio::test]
    async fn failed_load_keeps_current_catalog() {
        let mut tracker = tracker_with(MockMarket::offline());

        let live = tracker.load_catalog().await;
        assert!(!live);
        assert!(!tracker.catalog_is_live());
        assert_eq!(tracker.catalog_size(), 10);
        assert!(tracker.lookup_asset("bitcoin").is_some());
    }

    #[tokio::test]
    async fn top_assets_sorted_by_market_cap_rank() {
        let market = MockMarket::new()
            .with_asset("solana", "sol", "Solana", 5)
            .with_asset("bitcoin", "btc", "Bitcoin", 1)
            .with_asset("ethereum", "eth", "Ethereum", 2);
        let mut tracker = tracker_with(market);
        tracker.load_catalog().await;

        let top: Vec<&str> = tracker.top_assets(2).iter().map(|a| a.id.as_str()).collect();
        assert_eq!(top, vec!["bitcoin", "ethereum"]);
    }
}

// ── Price refresh ───────────────────────────────────────────────────

mod refresh {
    use super::*;

    #[tokio::test]
    async fn applies_fetched_quotes() {
        let market = MockMarket::new().with_quote("bitcoin", 65000.0);
        let mut tracker = tracker_with(market);
        tracker.add_purchase("bitcoin", 0.5, 40000.0).expect("valid");

        let updated = tracker.refresh_prices().await.expect("mock quotes");
        assert_eq!(updated, 1);
        assert_eq!(tracker.holdings()[0].current_price, 65000.0);
    }

    #[tokio::test]
    async fn partial_response_keeps_stale_prices() {
        let market = MockMarket::new().with_quote("bitcoin", 65000.0);
        let mut tracker = tracker_with(market);
        tracker.add_purchase("bitcoin", 0.5, 40000.0).expect("valid");
        tracker.add_purchase("ethereum", 2.0, 2000.0).expect("valid");

        let updated = tracker.refresh_prices().await.expect("mock quotes");
        assert_eq!(updated, 1);
        assert_eq!(tracker.holdings()[1].current_price, 0.0);
    }

    #[tokio::test]
    async fn failed_fetch_surfaces_error_and_keeps_prices() {
        let mut tracker = tracker_with(MockMarket::offline());
        tracker.add_purchase("bitcoin", 0.5, 40000.0).expect("valid");

        let err = tracker.refresh_prices().await.expect_err("mock is offline");
        assert!(matches!(err, CoreError::Network(_)));
        assert_eq!(tracker.holdings()[0].current_price, 0.0);
    }

    #[tokio::test]
    async fn empty_portfolio_skips_the_provider() {
        // An offline provider would error if contacted.
        let mut tracker = tracker_with(MockMarket::offline());

        let updated = tracker.refresh_prices().await.expect("no fetch happens");
        assert_eq!(updated, 0);
    }

    #[tokio::test]
    async fn refresh_after_failure_recovers() {
        let mut tracker = tracker_with(MockMarket::offline());
        tracker.add_purchase("bitcoin", 0.5, 40000.0).expect("valid");
        tracker.refresh_prices().await.expect_err("mock is offline");

        // The overlap guard must be released after a failed refresh.
        let err = tracker.refresh_prices().await.expect_err("still offline");
        assert!(matches!(err, CoreError::Network(_)));
    }
}

// ── Analytics & report ──────────────────────────────────────────────

mod analytics {
    use super::*;

    #[tokio::test]
    async fn totals_follow_refreshed_prices() {
        let market = MockMarket::new()
            .with_quote("bitcoin", 30000.0)
            .with_quote("ethereum", 2000.0);
        let mut tracker = tracker_with(market);
        tracker.add_purchase("bitcoin", 0.2, 30000.0).expect("valid");
        tracker.add_purchase("ethereum", 3.0, 2000.0).expect("valid");
        tracker.refresh_prices().await.expect("mock quotes");

        let totals = tracker.totals();
        assert_eq!(totals.invested, 12000.0);
        assert_eq!(totals.current, 12000.0);
        assert_eq!(totals.pnl, 0.0);
        assert_eq!(totals.pnl_pct, 0.0);
    }

    #[test]
    fn valuations_are_in_portfolio_order() {
        let mut tracker = tracker_with(MockMarket::new());
        tracker.add_purchase("bitcoin", 1.0, 100.0).expect("valid");
        tracker.add_purchase("ethereum", 1.0, 50.0).expect("valid");

        let valuations = tracker.valuations();
        assert_eq!(valuations.len(), 2);
        assert_eq!(valuations[0].invested, 100.0);
        assert_eq!(valuations[1].invested, 50.0);
    }

    #[test]
    fn build_report_reflects_holdings() {
        let mut tracker = tracker_with(MockMarket::new());
        tracker.add_purchase("bitcoin", 1.0, 100.0).expect("valid");

        let report = tracker.build_report(Locale::En);
        assert!(report.contains("1. Bitcoin (BTC)"));
        assert!(report.contains("Coins held: 1"));
    }
}

// ── Roast ───────────────────────────────────────────────────────────

mod roast {
    use super::*;

    #[tokio::test]
    async fn empty_portfolio_is_rejected() {
        let tracker = tracker_with(MockMarket::new());

        let err = tracker
            .request_roast(Locale::En)
            .await
            .expect_err("nothing to roast");
        assert!(matches!(err, CoreError::InvalidInput(_)));
    }

    #[tokio::test]
    async fn missing_provider_is_reported() {
        let mut tracker = tracker_with(MockMarket::new());
        tracker.add_purchase("bitcoin", 1.0, 100.0).expect("valid");
        assert!(!tracker.has_advice_provider());

        let err = tracker
            .request_roast(Locale::En)
            .await
            .expect_err("no advice provider");
        assert!(matches!(err, CoreError::NoProvider(which) if which == "advice"));
    }

    #[tokio::test]
    async fn roast_sends_the_rendered_report() {
        let mut tracker = tracker_with(MockMarket::new());
        tracker.add_purchase("bitcoin", 1.0, 100.0).expect("valid");

        let advice = Arc::new(MockAdvice::new(false));
        struct Shared(Arc<MockAdvice>);
        #[async_trait]
        impl AdviceProvider for Shared {
            fn name(&self) -> &str {
                self.0.name()
            }
            async fn roast(&self, report: &str, locale: Locale) -> Result<String, CoreError> {
                self.0.roast(report, locale).await
            }
        }
        tracker.set_advice_provider(Box::new(Shared(Arc::clone(&advice))));

        let text = tracker.request_roast(Locale::En).await.expect("mock advice");
        assert!(text.contains("disaster"));

        let sent = advice.last_report.lock().expect("not poisoned").clone();
        assert!(sent.is_some_and(|r| r.contains("1. Bitcoin (BTC)")));
    }

    #[tokio::test]
    async fn provider_failure_surfaces_without_fallback_text() {
        let mut tracker = tracker_with(MockMarket::new());
        tracker.add_purchase("bitcoin", 1.0, 100.0).expect("valid");
        tracker.set_advice_provider(Box::new(MockAdvice::new(true)));

        let err = tracker
            .request_roast(Locale::En)
            .await
            .expect_err("mock advice fails");
        assert!(matches!(err, CoreError::Api { .. }));
    }
}

// ── Settings & API keys ─────────────────────────────────────────────

mod settings {
    use super::*;

    #[test]
    fn locale_defaults_to_korean_and_is_mutable() {
        let mut tracker = tracker_with(MockMarket::new());
        assert_eq!(tracker.locale(), Locale::Ko);

        tracker.set_locale(Locale::En);
        assert_eq!(tracker.locale(), Locale::En);
    }

    #[test]
    fn openrouter_key_enables_the_advice_provider() {
        let mut tracker = tracker_with(MockMarket::new());
        assert!(!tracker.has_advice_provider());

        tracker.set_api_key("openrouter", "sk-test");
        assert!(tracker.has_advice_provider());
        assert_eq!(
            tracker.settings().api_keys.get("openrouter").map(String::as_str),
            Some("sk-test")
        );
    }

    #[test]
    fn removing_the_key_drops_the_provider() {
        let mut tracker = tracker_with(MockMarket::new());
        tracker.set_api_key("openrouter", "sk-test");

        assert!(tracker.remove_api_key("openrouter"));
        assert!(!tracker.has_advice_provider());
        assert!(!tracker.remove_api_key("openrouter"));
    }

    #[test]
    fn unrelated_keys_do_not_enable_advice() {
        let mut tracker = tracker_with(MockMarket::new());
        tracker.set_api_key("weather", "sk-test");
        assert!(!tracker.has_advice_provider());
    }

    #[test]
    fn advice_provider_built_from_initial_settings() {
        let mut settings = Settings::default();
        settings
            .api_keys
            .insert("openrouter".to_string(), "sk-test".to_string());
        let tracker = CryptoRoast::with_market_provider(
            Portfolio::new(),
            settings,
            Arc::new(MockMarket::new()),
        );
        assert!(tracker.has_advice_provider());
    }
}

// ── Persistence & dirty tracking ────────────────────────────────────

mod persistence {
    use super::*;

    #[test]
    fn new_tracker_has_no_unsaved_changes() {
        let tracker = tracker_with(MockMarket::new());
        assert!(!tracker.has_unsaved_changes());
    }

    #[test]
    fn mutations_mark_dirty_and_save_clears_it() {
        let mut tracker = tracker_with(MockMarket::new());
        tracker.add_purchase("bitcoin", 1.0, 100.0).expect("valid");
        assert!(tracker.has_unsaved_changes());

        tracker.save_to_json().expect("serializable");
        assert!(!tracker.has_unsaved_changes());

        tracker.remove_holding(0).expect("valid index");
        assert!(tracker.has_unsaved_changes());
    }

    #[test]
    fn save_then_load_round_trips_through_the_facade() {
        let mut tracker = tracker_with(MockMarket::new());
        tracker.add_purchase("bitcoin", 0.5, 40000.0).expect("valid");
        tracker.add_purchase("ethereum", 3.0, 2000.0).expect("valid");
        let json = tracker.save_to_json().expect("serializable");

        let (loaded, dropped) = CryptoRoast::load_from_json(&json);
        assert_eq!(dropped, 0);
        assert_eq!(loaded.holding_count(), 2);
        assert!(!loaded.has_unsaved_changes());
    }

    #[test]
    fn corrupt_blob_loads_as_empty() {
        let (loaded, dropped) = CryptoRoast::load_from_json("garbage");
        assert!(loaded.is_empty());
        assert_eq!(dropped, 0);
    }
}

// ── Change events ───────────────────────────────────────────────────

mod events {
    use super::*;

    fn recording_tracker(market: MockMarket) -> (CryptoRoast, Arc<Mutex<Vec<ChangeEvent>>>) {
        let mut tracker = tracker_with(market);
        let events = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&events);
        tracker.subscribe(Box::new(move |event| {
            if let Ok(mut log) = sink.lock() {
                log.push(event.clone());
            }
        }));
        (tracker, events)
    }

    #[test]
    fn mutations_emit_events_in_order() {
        let (mut tracker, events) = recording_tracker(MockMarket::new());

        tracker.add_purchase("bitcoin", 1.0, 100.0).expect("valid");
        tracker.add_purchase("ethereum", 1.0, 50.0).expect("valid");
        tracker.remove_holding(1).expect("valid index");
        tracker.clear_portfolio();

        let log = events.lock().expect("not poisoned");
        assert_eq!(
            *log,
            vec![
                ChangeEvent::HoldingAdded("bitcoin".into()),
                ChangeEvent::HoldingAdded("ethereum".into()),
                ChangeEvent::HoldingRemoved("ethereum".into()),
                ChangeEvent::PortfolioCleared,
            ]
        );
    }

    #[test]
    fn clearing_an_empty_portfolio_emits_nothing() {
        let (mut tracker, events) = recording_tracker(MockMarket::new());
        tracker.clear_portfolio();
        assert!(events.lock().expect("not poisoned").is_empty());
    }

    #[test]
    fn failed_mutations_emit_nothing() {
        let (mut tracker, events) = recording_tracker(MockMarket::new());
        tracker.add_purchase("dogcoin", 1.0, 1.0).expect_err("unknown");
        tracker.remove_holding(0).expect_err("out of range");
        assert!(events.lock().expect("not poisoned").is_empty());
    }

    #[tokio::test]
    async fn refresh_and_catalog_load_emit_events() {
        let market = MockMarket::new()
            .with_asset("bitcoin", "btc", "Bitcoin", 1)
            .with_quote("bitcoin", 65000.0);
        let (mut tracker, events) = recording_tracker(market);

        tracker.add_purchase("bitcoin", 1.0, 100.0).expect("valid");
        tracker.load_catalog().await;
        tracker.refresh_prices().await.expect("mock quotes");

        let log = events.lock().expect("not poisoned");
        assert_eq!(
            *log,
            vec![
                ChangeEvent::HoldingAdded("bitcoin".into()),
                ChangeEvent::CatalogLoaded(1),
                ChangeEvent::PricesRefreshed(1),
            ]
        );
    }
}

// ── Background refresh ──────────────────────────────────────────────

mod background {
    use super::*;
    use crypto_roast_core::spawn_periodic_refresh;
    use std::time::Duration;
    use tokio::sync::RwLock;

    #[tokio::test]
    async fn periodic_task_refreshes_prices() {
        let market = MockMarket::new().with_quote("bitcoin", 65000.0);
        let mut tracker = tracker_with(market);
        tracker.add_purchase("bitcoin", 0.5, 40000.0).expect("valid");

        let shared = Arc::new(RwLock::new(tracker));
        let task = spawn_periodic_refresh(Arc::clone(&shared), Duration::from_millis(10));

        tokio::time::sleep(Duration::from_millis(100)).await;
        task.cancel();

        let guard = shared.read().await;
        assert_eq!(guard.holdings()[0].current_price, 65000.0);
    }

    #[tokio::test]
    async fn periodic_task_skips_empty_portfolio() {
        // An offline provider would poison prices if contacted; it never is.
        let shared = Arc::new(RwLock::new(tracker_with(MockMarket::offline())));
        let task = spawn_periodic_refresh(Arc::clone(&shared), Duration::from_millis(10));

        tokio::time::sleep(Duration::from_millis(50)).await;
        drop(task);

        let guard = shared.read().await;
        assert!(guard.is_empty());
    }
}
