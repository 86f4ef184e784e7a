use crate::models::analysis::{
    Analysis, BehaviorTrait, Diversification, HoldingValuation, PerformerSnapshot,
    PortfolioTotals, RiskLevel,
};
use crate::models::holding::Holding;
use crate::models::portfolio::Portfolio;

/// Case-insensitive substrings that mark a holding as a meme asset.
/// Matched against both symbol and name. Used only for risk classification,
/// not as a factual category.
const MEME_MARKERS: [&str; 10] = [
    "doge", "shib", "pepe", "floki", "elon", "moon", "safe", "baby", "bonk", "wif",
];

/// Threshold for the large-gain / large-loss behavior flags, in percent.
const LARGE_PNL_PCT: f64 = 50.0;

/// Computes valuations and classifies the portfolio.
///
/// Pure functions of the portfolio state: no I/O, no clock, no randomness.
/// Values are computed in double precision; rounding happens only at the
/// presentation boundary (see `ReportService`).
pub struct AnalyticsService;

impl AnalyticsService {
    pub fn new() -> Self {
        Self
    }

    /// Valuate a single holding.
    ///
    /// A degenerate zero-invested holding reports 0% rather than dividing
    /// by zero — cost basis is always positive in practice, but the guard
    /// is mandatory.
    pub fn valuate(&self, holding: &Holding) -> HoldingValuation {
        let invested = holding.invested();
        let current = holding.current_value();
        let pnl = current - invested;
        let pnl_pct = if invested > 0.0 {
            (pnl / invested) * 100.0
        } else {
            0.0
        };
        HoldingValuation {
            invested,
            current,
            pnl,
            pnl_pct,
        }
    }

    /// Aggregate valuation: plain sums across holdings, with the same
    /// zero-invested guard on the percentage.
    pub fn valuate_all(&self, portfolio: &Portfolio) -> PortfolioTotals {
        let mut invested = 0.0;
        let mut current = 0.0;
        for holding in &portfolio.holdings {
            invested += holding.invested();
            current += holding.current_value();
        }
        let pnl = current - invested;
        let pnl_pct = if invested > 0.0 {
            (pnl / invested) * 100.0
        } else {
            0.0
        };
        PortfolioTotals {
            invested,
            current,
            pnl,
            pnl_pct,
        }
    }

    /// Whether a holding matches the meme-asset heuristic.
    pub fn is_meme(holding: &Holding) -> bool {
        let symbol = holding.symbol.to_lowercase();
        let name = holding.name.to_lowercase();
        MEME_MARKERS
            .iter()
            .any(|marker| symbol.contains(marker) || name.contains(marker))
    }

    /// Classify the portfolio into an immutable analysis snapshot.
    pub fn classify(&self, portfolio: &Portfolio) -> Analysis {
        let coin_count = portfolio.len();
        let totals = self.valuate_all(portfolio);

        let mut meme_count = 0;
        let mut best: Option<(usize, f64)> = None;
        let mut worst: Option<(usize, f64)> = None;

        for (idx, holding) in portfolio.holdings.iter().enumerate() {
            if Self::is_meme(holding) {
                meme_count += 1;
            }

            // Strict comparisons keep the first occurrence on ties.
            let pct = self.valuate(holding).pnl_pct;
            if best.map_or(true, |(_, b)| pct > b) {
                best = Some((idx, pct));
            }
            if worst.map_or(true, |(_, w)| pct < w) {
                worst = Some((idx, pct));
            }
        }

        let diversification = if coin_count >= 10 {
            Diversification::High
        } else if coin_count >= 5 {
            Diversification::Medium
        } else {
            Diversification::Low
        };

        // First matching rule wins; meme fraction outranks coin count.
        let meme = meme_count as f64;
        let count = coin_count as f64;
        let risk = if meme > 0.5 * count {
            RiskLevel::Extreme
        } else if meme > 0.3 * count {
            RiskLevel::High
        } else if coin_count < 3 {
            RiskLevel::High
        } else if coin_count >= 5 {
            RiskLevel::Medium
        } else {
            RiskLevel::Low
        };

        let mut traits = Vec::new();
        if coin_count == 1 {
            traits.push(BehaviorTrait::SingleAssetConcentration);
        }
        if meme_count > 0 {
            traits.push(BehaviorTrait::MemeExposure);
        }
        if coin_count > 20 {
            traits.push(BehaviorTrait::OverDiversification);
        }
        if worst.is_some_and(|(_, pct)| pct < -LARGE_PNL_PCT) {
            traits.push(BehaviorTrait::LargeUnrealizedLoss);
        }
        if best.is_some_and(|(_, pct)| pct > LARGE_PNL_PCT) {
            traits.push(BehaviorTrait::LargeUnrealizedGain);
        }

        Analysis {
            coin_count,
            totals,
            diversification,
            risk,
            meme_count,
            best: best.map(|(idx, pct)| Self::snapshot(&portfolio.holdings[idx], pct)),
            worst: worst.map(|(idx, pct)| Self::snapshot(&portfolio.holdings[idx], pct)),
            traits,
        }
    }

    fn snapshot(holding: &Holding, pnl_pct: f64) -> PerformerSnapshot {
        PerformerSnapshot {
            symbol: holding.symbol.clone(),
            name: holding.name.clone(),
            pnl_pct,
        }
    }
}

impl Default for AnalyticsService {
    fn default() -> Self {
        Self::new()
    }
}
