use serde::{Deserialize, Serialize};

/// Valuation of a single holding. All values in USD, unrounded.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct HoldingValuation {
    /// quantity × cost basis
    pub invested: f64,
    /// quantity × current price
    pub current: f64,
    /// current − invested
    pub pnl: f64,
    /// pnl / invested × 100; 0 when nothing was invested
    pub pnl_pct: f64,
}

/// Aggregate valuation across the whole portfolio (plain sums).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PortfolioTotals {
    pub invested: f64,
    pub current: f64,
    pub pnl: f64,
    pub pnl_pct: f64,
}

/// Diversification tier, derived from holding count alone.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Diversification {
    Low,
    Medium,
    High,
}

impl std::fmt::Display for Diversification {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Diversification::Low => write!(f, "low"),
            Diversification::Medium => write!(f, "medium"),
            Diversification::High => write!(f, "high"),
        }
    }
}

/// Risk tier, derived from holding count and meme-asset fraction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RiskLevel {
    Low,
    Medium,
    High,
    Extreme,
}

impl std::fmt::Display for RiskLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RiskLevel::Low => write!(f, "low"),
            RiskLevel::Medium => write!(f, "medium"),
            RiskLevel::High => write!(f, "high"),
            RiskLevel::Extreme => write!(f, "extreme"),
        }
    }
}

/// Non-exclusive investor-behavior flags.
///
/// The classifier evaluates these in declaration order and includes every
/// flag that applies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BehaviorTrait {
    /// The whole portfolio is a single asset
    SingleAssetConcentration,
    /// At least one meme asset is held
    MemeExposure,
    /// More than 20 distinct assets
    OverDiversification,
    /// Worst performer sits below −50%
    LargeUnrealizedLoss,
    /// Some holding sits above +50%
    LargeUnrealizedGain,
}

/// Reference to the best- or worst-performing holding.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PerformerSnapshot {
    pub symbol: String,
    pub name: String,
    pub pnl_pct: f64,
}

/// Immutable classification snapshot of a portfolio at a point in time.
///
/// Recomputed on demand, never persisted, and fully deterministic for
/// identical input — no clock, no randomness.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Analysis {
    /// Number of distinct holdings
    pub coin_count: usize,

    /// Aggregate invested/current/P&L values
    pub totals: PortfolioTotals,

    pub diversification: Diversification,

    pub risk: RiskLevel,

    /// Holdings matching the meme-asset heuristic
    pub meme_count: usize,

    /// Best performer by P&L percentage; `None` when the portfolio is empty
    pub best: Option<PerformerSnapshot>,

    /// Worst performer by P&L percentage; `None` when the portfolio is empty
    pub worst: Option<PerformerSnapshot>,

    /// Behavior flags, in evaluation order
    pub traits: Vec<BehaviorTrait>,
}
