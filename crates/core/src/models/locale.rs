use serde::{Deserialize, Serialize};

/// Report and advice language.
///
/// Selects section labels and the advice prompt only — numeric formatting
/// is identical across locales.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Locale {
    En,
    Ko,
}

impl Locale {
    /// BCP-47-ish tag sent to the advice API.
    pub fn tag(&self) -> &'static str {
        match self {
            Locale::En => "en",
            Locale::Ko => "ko",
        }
    }

    pub fn from_tag(tag: &str) -> Option<Locale> {
        match tag {
            "en" => Some(Locale::En),
            "ko" => Some(Locale::Ko),
            _ => None,
        }
    }
}

impl Default for Locale {
    fn default() -> Self {
        Locale::Ko
    }
}

impl std::fmt::Display for Locale {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.tag())
    }
}
