//! Supported content languages.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Language tag carried by every request.
///
/// Wire format: two-letter lowercase code (`en`, `ru`, `tg`). Localized rows are
/// stored with the same code in their `language_code` column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Locale {
    #[default]
    En,
    Ru,
    Tg,
}

#[derive(Debug, thiserror::Error)]
#[error("unsupported locale: {0}")]
pub struct UnsupportedLocale(pub String);

impl Locale {
    pub const ALL: [Locale; 3] = [Locale::En, Locale::Ru, Locale::Tg];

    pub fn code(self) -> &'static str {
        match self {
            Self::En => "en",
            Self::Ru => "ru",
            Self::Tg => "tg",
        }
    }

    /// Resolve a locale from an `Accept-Language` style value.
    ///
    /// Only the primary subtag of the first entry is considered
    /// (`"ru-RU,ru;q=0.9"` → `ru`). Returns `None` when it is not supported.
    pub fn from_accept_language(value: &str) -> Option<Self> {
        let first = value.split(',').next()?.split(';').next()?.trim();
        let primary = first.split(['-', '_']).next()?;
        primary.parse().ok()
    }
}

impl FromStr for Locale {
    type Err = UnsupportedLocale;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "en" => Ok(Self::En),
            "ru" => Ok(Self::Ru),
            "tg" => Ok(Self::Tg),
            _ => Err(UnsupportedLocale(s.to_owned())),
        }
    }
}

impl fmt::Display for Locale {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}
