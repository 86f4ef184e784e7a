use serde_json::Value;

use crate::errors::CoreError;
use crate::models::holding::Holding;
use crate::models::portfolio::Portfolio;

/// High-level persistence: the portfolio is stored as a single JSON array of
/// holding records — the same layout the browser frontend keeps in its local
/// store.
pub struct StorageManager;

impl StorageManager {
    /// Serialize the portfolio's holdings to a JSON array string.
    pub fn save_to_json(portfolio: &Portfolio) -> Result<String, CoreError> {
        serde_json::to_string(&portfolio.holdings)
            .map_err(|e| CoreError::Serialization(format!("Failed to serialize portfolio: {e}")))
    }

    /// Load a portfolio from a persisted JSON array.
    ///
    /// Sanitation, not repair: records missing any of `asset_id`, `symbol`,
    /// `name`, a numeric `quantity`, or a numeric `cost_basis` are dropped;
    /// a blob that is not a JSON array yields an empty portfolio. A missing
    /// `current_price` loads as 0 (pre-first-refresh state).
    ///
    /// Returns the portfolio together with the number of records dropped.
    pub fn load_from_json(data: &str) -> (Portfolio, usize) {
        let records = match serde_json::from_str::<Value>(data) {
            Ok(Value::Array(records)) => records,
            _ => return (Portfolio::default(), 0),
        };

        let total = records.len();
        let holdings: Vec<Holding> = records.into_iter().filter_map(Self::sanitize).collect();
        let dropped = total - holdings.len();

        (Portfolio { holdings }, dropped)
    }

    /// serde enforces field presence and types; the extra checks reject
    /// records that would be structurally valid but semantically useless.
    fn sanitize(record: Value) -> Option<Holding> {
        let holding: Holding = serde_json::from_value(record).ok()?;
        if holding.asset_id.is_empty() || holding.symbol.is_empty() || holding.name.is_empty() {
            return None;
        }
        if !holding.quantity.is_finite() || !holding.cost_basis.is_finite() {
            return None;
        }
        Some(holding)
    }
}
