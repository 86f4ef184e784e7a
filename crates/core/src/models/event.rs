/// State-change notification emitted by the facade after a mutation.
///
/// UI layers subscribe and re-render on these; they never co-own the
/// portfolio data.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ChangeEvent {
    /// A purchase was merged into or appended to the portfolio (asset id)
    HoldingAdded(String),
    /// A holding was removed (asset id)
    HoldingRemoved(String),
    /// All holdings were removed at once
    PortfolioCleared,
    /// A price refresh completed; payload is the number of holdings updated
    PricesRefreshed(usize),
    /// The asset catalog was loaded from the API; payload is the catalog size
    CatalogLoaded(usize),
}
