//! App locale → graph locale mapping.

use serde::{Deserialize, Serialize};

/// A locale as the content graph spells it (`en`, `sv`, `nl_BE`).
///
/// The graph's locale enum cannot contain hyphens, so region subtags are
/// joined with an underscore. Nothing else is validated: the value is passed
/// through to the query as-is.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct GraphLocale(String);

impl GraphLocale {
    /// Map an application locale identifier. Blank input maps to `None`.
    pub fn from_app_locale(locale: &str) -> Option<Self> {
        let trimmed = locale.trim();
        if trimmed.is_empty() {
            return None;
        }
        Some(Self(trimmed.replace('-', "_")))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for GraphLocale {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn maps_region_subtags() {
        assert_eq!(GraphLocale::from_app_locale("nl-BE").unwrap().as_str(), "nl_BE");
        assert_eq!(GraphLocale::from_app_locale("en").unwrap().as_str(), "en");
    }

    #[test]
    fn blank_is_none() {
        assert!(GraphLocale::from_app_locale("").is_none());
        assert!(GraphLocale::from_app_locale("  ").is_none());
    }

    #[test]
    fn serializes_as_plain_string() {
        let locale = GraphLocale::from_app_locale("sv").unwrap();
        assert_eq!(serde_json::to_string(&locale).unwrap(), "\"sv\"");
    }
}
