use crate::errors::CoreError;
use crate::models::asset::AssetInfo;
use crate::models::holding::Holding;
use crate::models::portfolio::Portfolio;

/// Merges purchases into the portfolio and removes holdings.
///
/// Pure business logic — no I/O, no API calls. Easy to test.
pub struct PortfolioService;

impl PortfolioService {
    pub fn new() -> Self {
        Self
    }

    /// Merge a purchase into the portfolio.
    ///
    /// If a holding for the asset already exists, its quantity grows and its
    /// cost basis becomes the value-weighted average of the old and new lots:
    /// `(old_qty*old_cost + add_qty*add_price) / (old_qty + add_qty)`.
    /// Symbol and name are refreshed from the resolved catalog entry.
    /// Otherwise a new holding is appended with `current_price = 0`.
    ///
    /// Rejects non-finite or non-positive quantity/price; the portfolio is
    /// left unchanged on any error.
    pub fn add_purchase(
        &self,
        portfolio: &mut Portfolio,
        asset: &AssetInfo,
        quantity: f64,
        price: f64,
    ) -> Result<(), CoreError> {
        Self::validate_positive("quantity", quantity)?;
        Self::validate_positive("price", price)?;

        match portfolio.position_of(&asset.id) {
            Some(idx) => {
                let existing = &mut portfolio.holdings[idx];
                let total_quantity = existing.quantity + quantity;
                let total_value = existing.quantity * existing.cost_basis + quantity * price;
                existing.quantity = total_quantity;
                existing.cost_basis = total_value / total_quantity;
                existing.symbol = asset.symbol.clone();
                existing.name = asset.name.clone();
            }
            None => portfolio.holdings.push(Holding::new(asset, quantity, price)),
        }

        Ok(())
    }

    /// Remove the holding at `index`, returning it.
    /// (Asking the user for confirmation is a UI concern, not handled here.)
    pub fn remove_holding(
        &self,
        portfolio: &mut Portfolio,
        index: usize,
    ) -> Result<Holding, CoreError> {
        if index >= portfolio.holdings.len() {
            return Err(CoreError::IndexOutOfRange {
                index,
                len: portfolio.holdings.len(),
            });
        }
        Ok(portfolio.holdings.remove(index))
    }

    fn validate_positive(field: &str, value: f64) -> Result<(), CoreError> {
        if !value.is_finite() || value <= 0.0 {
            return Err(CoreError::InvalidInput(format!(
                "{field} must be a positive number, got {value}"
            )));
        }
        Ok(())
    }
}

impl Default for PortfolioService {
    fn default() -> Self {
        Self::new()
    }
}
