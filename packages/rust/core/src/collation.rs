//! Locale-aware string ordering for display names.

use std::cmp::Ordering;

use icu_collator::{Collator, CollatorOptions};
use icu_locid::Locale;
use tracing::warn;

use sitenav_shared::{Result, SitenavError};

/// Compares strings under one locale's collation rules.
///
/// Not `Send`: build one where the sort happens rather than holding it across
/// an `.await`.
pub struct LocaleCollator {
    locale: String,
    collator: Option<Collator>,
}

impl LocaleCollator {
    /// Collator for a BCP 47 tag (`sv`, `en-GB`). Unknown or malformed tags fail.
    pub fn for_locale(tag: &str) -> Result<Self> {
        let locale: Locale = tag
            .parse()
            .map_err(|e| SitenavError::validation(format!("invalid locale '{tag}': {e:?}")))?;

        let collator = Collator::try_new(&locale.into(), CollatorOptions::new()).map_err(|e| {
            SitenavError::validation(format!("no collation data for '{tag}': {e:?}"))
        })?;

        Ok(Self {
            locale: tag.to_string(),
            collator: Some(collator),
        })
    }

    /// Collator for `requested`, or for `fallback` when none was requested or
    /// the requested one cannot be built.
    ///
    /// If neither can be built the result compares by code point, which still
    /// gives a total order.
    pub fn with_fallback(requested: Option<&str>, fallback: &str) -> Self {
        if let Some(tag) = requested.filter(|t| !t.trim().is_empty()) {
            match Self::for_locale(tag) {
                Ok(collator) => return collator,
                Err(e) => warn!(error = %e, fallback, "falling back to default collation"),
            }
        }

        Self::for_locale(fallback).unwrap_or_else(|e| {
            warn!(error = %e, "no usable collation, comparing by code point");
            Self {
                locale: fallback.to_string(),
                collator: None,
            }
        })
    }

    /// The tag this collator was built for.
    pub fn locale(&self) -> &str {
        &self.locale
    }

    pub fn compare(&self, a: &str, b: &str) -> Ordering {
        match &self.collator {
            Some(collator) => collator.compare(a, b),
            None => a.cmp(b),
        }
    }
}

impl std::fmt::Debug for LocaleCollator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LocaleCollator")
            .field("locale", &self.locale)
            .field("icu", &self.collator.is_some())
            .finish()
    }
}
