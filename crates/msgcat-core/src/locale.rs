//! Locale keys and helpers

use std::fmt;

/// Locale whose table is stored under the bare catalog name
pub const DEFAULT_LOCALE: &str = "en";

/// Identifies one locale table of one catalog
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CatalogKey {
    catalog: String,
    locale: String,
}

impl CatalogKey {
    /// Key for `catalog` in `locale`
    pub fn new(catalog: impl Into<String>, locale: impl Into<String>) -> Self {
        Self {
            catalog: catalog.into(),
            locale: locale.into(),
        }
    }

    /// Key for the default locale table of `catalog`
    pub fn default_for(catalog: impl Into<String>) -> Self {
        Self::new(catalog, DEFAULT_LOCALE)
    }

    pub fn catalog(&self) -> &str {
        &self.catalog
    }

    pub fn locale(&self) -> &str {
        &self.locale
    }

    pub fn is_default(&self) -> bool {
        is_default_locale(Some(&self.locale))
    }
}

/// `catalog` for the default locale, `catalog-locale` otherwise
impl fmt::Display for CatalogKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_default() {
            f.write_str(&self.catalog)
        } else {
            write!(f, "{}-{}", self.catalog, self.locale)
        }
    }
}

/// True when no locale was requested or the default one was
pub fn is_default_locale(locale: Option<&str>) -> bool {
    match locale {
        None => true,
        Some(code) => code == DEFAULT_LOCALE,
    }
}

/// Primary language subtag of the first entry in an `Accept-Language` value.
///
/// `"de-DE,de;q=0.9,en;q=0.8"` yields `"de"`; wildcards and empty values
/// yield `None`.
pub fn from_accept_language(header: &str) -> Option<String> {
    let first = header.split(',').next()?;
    let tag = first.split(';').next()?.trim();
    let primary = tag.split(['-', '_']).next()?.trim();

    if primary.is_empty() || primary == "*" || !primary.chars().all(|c| c.is_ascii_alphabetic()) {
        return None;
    }

    Some(primary.to_ascii_lowercase())
}
