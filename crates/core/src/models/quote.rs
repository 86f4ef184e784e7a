use serde::{Deserialize, Serialize};

/// One entry of a price-refresh response, keyed by asset id.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PriceQuote {
    /// Current market price per unit in USD
    pub price: f64,

    /// Display icon URL, if the provider sent one
    #[serde(default)]
    pub image: Option<String>,
}

impl PriceQuote {
    pub fn new(price: f64) -> Self {
        Self { price, image: None }
    }

    pub fn with_image(price: f64, image: impl Into<String>) -> Self {
        Self {
            price,
            image: Some(image.into()),
        }
    }
}
