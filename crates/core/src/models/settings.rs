use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use super::locale::Locale;

/// User-configurable settings held by the facade.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Settings {
    /// Preferred language for reports and roasts.
    pub locale: Locale,

    /// Optional API keys for providers that require them.
    /// Keys: provider name (e.g., "openrouter"). Values: the API key string.
    pub api_keys: HashMap<String, String>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            locale: Locale::default(),
            api_keys: HashMap::new(),
        }
    }
}
