use serde::{Deserialize, Serialize};
use std::fmt;

/// Base language code, used whenever a caller does not pick one.
pub const DEFAULT_LANGUAGE_CODE: &str = "tr";

/// Languages the catalog can localize into.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    #[default]
    Tr,
    En,
}

impl Language {
    /// Resolves a language code. Unknown or missing codes resolve to the
    /// default language instead of failing.
    pub fn from_code(code: Option<&str>) -> Self {
        match code.map(|c| c.trim().to_lowercase()).as_deref() {
            Some("en") => Language::En,
            _ => Language::Tr,
        }
    }

    pub fn code(&self) -> &'static str {
        match self {
            Language::Tr => "tr",
            Language::En => "en",
        }
    }

    /// Category label used when a use-case key has no mapping.
    pub fn fallback_category(&self) -> &'static str {
        match self {
            Language::Tr => "Genel",
            Language::En => "General",
        }
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_code() {
        assert_eq!(Language::from_code(Some("en")), Language::En);
        assert_eq!(Language::from_code(Some(" EN ")), Language::En);
        assert_eq!(Language::from_code(Some("tr")), Language::Tr);
        assert_eq!(Language::from_code(Some("de")), Language::Tr);
        assert_eq!(Language::from_code(Some("")), Language::Tr);
        assert_eq!(Language::from_code(None), Language::Tr);
    }

    #[test]
    fn test_default_matches_base_code() {
        assert_eq!(Language::default().code(), DEFAULT_LANGUAGE_CODE);
    }
}
