//! Message resolution against loaded catalogs

use crate::catalog::{CatalogStore, MessageTemplate};
use crate::error::{CatalogError, CatalogResult};
use crate::insert::{validate_named_inserts, validate_positional_inserts, NamedInserts, PositionalInserts};
use crate::locale::is_default_locale;
use crate::template::Substitution;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::path::Path;
use tracing::{debug, info};

/// A catalog message with all inserts applied
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResolvedMessage {
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub action: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub detail: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    /// Merged insert context; only present for verbose resolution
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub named_inserts: Option<NamedInserts>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Everything needed to resolve one message
#[derive(Debug, Clone, Default)]
pub struct MessageRequest {
    catalog: String,
    code: String,
    named: NamedInserts,
    positional: PositionalInserts,
    locale: Option<String>,
    verbose: bool,
}

impl MessageRequest {
    /// Request `code` from `catalog` in the default locale, without inserts
    pub fn new(catalog: impl Into<String>, code: impl Into<String>) -> Self {
        Self {
            catalog: catalog.into(),
            code: code.into(),
            ..Default::default()
        }
    }

    pub fn named_inserts(mut self, named: NamedInserts) -> Self {
        self.named = named;
        self
    }

    pub fn positional_inserts(mut self, positional: PositionalInserts) -> Self {
        self.positional = positional;
        self
    }

    pub fn locale(mut self, locale: impl Into<String>) -> Self {
        self.locale = Some(locale.into());
        self
    }

    /// Keep the merged insert context in the result
    pub fn verbose(mut self, verbose: bool) -> Self {
        self.verbose = verbose;
        self
    }
}

/// Resolves message codes against a [`CatalogStore`]
#[derive(Debug)]
pub struct MessageCatalogManager {
    store: CatalogStore,
}

impl MessageCatalogManager {
    /// Load the catalog index at `index_path` and every local catalog in it
    pub fn new<P: AsRef<Path>>(index_path: P) -> CatalogResult<Self> {
        let store = CatalogStore::load(index_path)?;
        info!("MessageCatalogManager initialized from {:?}", store.index_path());
        Ok(Self::from_store(store))
    }

    /// Wrap an already loaded store
    pub fn from_store(store: CatalogStore) -> Self {
        Self { store }
    }

    pub fn store(&self) -> &CatalogStore {
        &self.store
    }

    /// See [`CatalogStore::check_catalog`]
    pub fn check_catalog(&self, catalog: &str) -> CatalogResult<()> {
        self.store.check_catalog(catalog)
    }

    /// Resolve `code` from `catalog`.
    ///
    /// A non-default `locale` is tried first; when its table or the code is
    /// missing, the default locale table is used. Caller `named` inserts are
    /// overridden by the template's own `namedInserts` on key collisions.
    pub fn get_message(
        &self,
        catalog: &str,
        code: &str,
        named: &NamedInserts,
        positional: &PositionalInserts,
        locale: Option<&str>,
        verbose: bool,
    ) -> CatalogResult<ResolvedMessage> {
        self.check_catalog(catalog)?;

        let template = self
            .find_template(catalog, code, locale)
            .ok_or_else(|| CatalogError::MessageNotFound {
                code: code.to_string(),
                catalog: catalog.to_string(),
            })?
            .clone();

        let MessageTemplate {
            message,
            action,
            detail,
            named_inserts: template_inserts,
            url,
            extra,
        } = template;

        let context = match &template_inserts {
            Some(defaults) => named.clone().merged_with(defaults),
            None => named.clone(),
        };

        let message = message
            .filter(|text| !text.is_empty())
            .ok_or_else(|| CatalogError::MessageMissingTextProperty {
                code: code.to_string(),
                catalog: catalog.to_string(),
            })?;

        let substitution = Substitution::compile(&context, positional)?;

        Ok(ResolvedMessage {
            message: substitution.apply(&message),
            action: action.map(|text| substitution.apply(&text)),
            detail: detail.map(|text| substitution.apply(&text)),
            url,
            named_inserts: verbose.then_some(context),
            extra,
        })
    }

    /// Resolve a [`MessageRequest`]
    pub fn resolve(&self, request: &MessageRequest) -> CatalogResult<ResolvedMessage> {
        self.get_message(
            &request.catalog,
            &request.code,
            &request.named,
            &request.positional,
            request.locale.as_deref(),
            request.verbose,
        )
    }

    /// Resolve with untyped inserts, validating their shape first
    pub fn get_message_from_json(
        &self,
        catalog: &str,
        code: &str,
        named: Option<&Value>,
        positional: Option<&Value>,
        locale: Option<&str>,
        verbose: bool,
    ) -> CatalogResult<ResolvedMessage> {
        self.check_catalog(catalog)?;
        if self.find_template(catalog, code, locale).is_none() {
            return Err(CatalogError::MessageNotFound {
                code: code.to_string(),
                catalog: catalog.to_string(),
            });
        }
        let named = validate_named_inserts(named)?;
        let positional = validate_positional_inserts(positional)?;
        self.get_message(catalog, code, &named, &positional, locale, verbose)
    }

    /// True when `code` resolves in `locale`, directly or through fallback
    pub fn has_message(&self, catalog: &str, code: &str, locale: Option<&str>) -> bool {
        self.check_catalog(catalog).is_ok() && self.find_template(catalog, code, locale).is_some()
    }

    fn find_template(&self, catalog: &str, code: &str, locale: Option<&str>) -> Option<&MessageTemplate> {
        let from_default = || self.store.default_table(catalog).and_then(|table| table.get(code));

        let locale = match locale {
            Some(locale) if !is_default_locale(Some(locale)) => locale,
            _ => return from_default(),
        };

        match self.store.table(catalog, locale) {
            Some(table) => table.get(code).or_else(|| {
                debug!(
                    "Message '{}' not in catalog {} for locale {}, falling back to default locale",
                    code, catalog, locale
                );
                from_default()
            }),
            None => {
                debug!(
                    "No {} table for catalog {}, falling back to default locale",
                    locale, catalog
                );
                from_default()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::fs;
    use tempfile::TempDir;

    fn manager_with(catalog: Value) -> (TempDir, MessageCatalogManager) {
        let dir = TempDir::new().unwrap();
        fs::write(
            dir.path().join("index.json"),
            r#"{"cat": {"url": "file://./cat.json"}}"#,
        )
        .unwrap();
        fs::write(dir.path().join("cat.json"), catalog.to_string()).unwrap();
        let manager = MessageCatalogManager::new(dir.path().join("index.json")).unwrap();
        (dir, manager)
    }

    #[test]
    fn test_empty_message_counts_as_missing() {
        let (_dir, manager) = manager_with(json!({"en": {"E": {"message": "", "action": "x"}}}));
        let err = manager
            .get_message("cat", "E", &NamedInserts::new(), &PositionalInserts::new(), None, false)
            .unwrap_err();
        assert!(matches!(err, CatalogError::MessageMissingTextProperty { .. }));
    }

    #[test]
    fn test_default_lookup_does_not_consult_other_locales() {
        let (_dir, manager) = manager_with(json!({
            "en": {},
            "de": {"ONLY_DE": {"message": "nur deutsch"}}
        }));
        let err = manager.resolve(&MessageRequest::new("cat", "ONLY_DE")).unwrap_err();
        assert!(matches!(err, CatalogError::MessageNotFound { .. }));

        let resolved = manager.resolve(&MessageRequest::new("cat", "ONLY_DE").locale("de")).unwrap();
        assert_eq!(resolved.message, "nur deutsch");
    }

    #[test]
    fn test_extra_fields_survive_and_cache_is_not_mutated() {
        let (_dir, manager) = manager_with(json!({
            "en": {"X": {"message": "hello {who}", "severity": "warning"}}
        }));
        let named: NamedInserts = [("who", "world")].into_iter().collect();
        let first = manager.resolve(&MessageRequest::new("cat", "X").named_inserts(named)).unwrap();
        assert_eq!(first.message, "hello world");
        assert_eq!(first.extra.get("severity"), Some(&json!("warning")));

        let second = manager.resolve(&MessageRequest::new("cat", "X")).unwrap();
        assert_eq!(second.message, "hello {who}");
    }

    #[test]
    fn test_json_inserts_are_validated() {
        let (_dir, manager) = manager_with(json!({"en": {"X": {"message": "{0}"}}}));
        let err = manager
            .get_message_from_json("cat", "X", Some(&json!("bad")), None, None, false)
            .unwrap_err();
        assert!(err.is_insert_error());

        let resolved = manager
            .get_message_from_json("cat", "X", None, Some(&json!([true])), None, false)
            .unwrap();
        assert_eq!(resolved.message, "true");
    }

    #[test]
    fn test_has_message_follows_fallback() {
        let (_dir, manager) = manager_with(json!({"en": {"X": {"message": "x"}}}));
        assert!(manager.has_message("cat", "X", Some("ro")));
        assert!(!manager.has_message("cat", "Y", None));
        assert!(!manager.has_message("missing", "X", None));
    }
}
