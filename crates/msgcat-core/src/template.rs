//! Placeholder substitution for catalog templates

use crate::error::{CatalogError, CatalogResult, InsertLocation};
use crate::insert::{NamedInserts, PositionalInserts};
use regex::{NoExpand, Regex, RegexBuilder};
use std::borrow::Cow;

/// Compiled size cap for one placeholder pattern
const PLACEHOLDER_SIZE_LIMIT: usize = 1 << 16;

/// Inserts compiled into placeholder patterns, reusable across templates.
///
/// Positional placeholders (`{0}`, `{1}`, ...) are replaced first, then named
/// ones (`{key}`) in insertion order. Matching is case-insensitive and purely
/// textual: a placeholder with no matching insert is left as it is, and
/// inserts the template never mentions are ignored.
#[derive(Debug, Clone)]
pub struct Substitution {
    rules: Vec<(Regex, String)>,
}

impl Substitution {
    /// Compile one pattern per insert.
    ///
    /// Fails with [`CatalogError::InvalidInsertType`] when a key cannot be
    /// turned into a placeholder pattern.
    pub fn compile(named: &NamedInserts, positional: &PositionalInserts) -> CatalogResult<Self> {
        let mut rules = Vec::with_capacity(named.len() + positional.len());

        for (index, value) in positional.iter().enumerate() {
            let pattern = placeholder_regex(&index.to_string(), || InsertLocation::Index(index))?;
            rules.push((pattern, value.to_string()));
        }

        for (key, value) in named.iter() {
            let pattern = placeholder_regex(key, || InsertLocation::Key(key.to_string()))?;
            rules.push((pattern, value.to_string()));
        }

        Ok(Self { rules })
    }

    /// Substitute every insert into `template`
    pub fn apply(&self, template: &str) -> String {
        let mut text = Cow::Borrowed(template);
        for (pattern, replacement) in &self.rules {
            text = Cow::Owned(pattern.replace_all(&text, NoExpand(replacement)).into_owned());
        }
        text.into_owned()
    }
}

/// Substitute inserts into `template`; see [`Substitution`]
pub fn apply_inserts(
    template: &str,
    named: &NamedInserts,
    positional: &PositionalInserts,
) -> CatalogResult<String> {
    Ok(Substitution::compile(named, positional)?.apply(template))
}

/// True when `template` contains at least one `{...}` token
pub fn has_placeholders(template: &str) -> bool {
    placeholder_names(template).next().is_some()
}

/// Names of the `{...}` tokens in `template`, in order of appearance
pub fn placeholder_names(template: &str) -> impl Iterator<Item = &str> {
    template
        .split('{')
        .skip(1)
        .filter_map(|chunk| chunk.split_once('}').map(|(name, _)| name))
        .filter(|name| !name.is_empty())
}

fn placeholder_regex(token: &str, location: impl FnOnce() -> InsertLocation) -> CatalogResult<Regex> {
    RegexBuilder::new(&format!(r"\{{{}\}}", regex::escape(token)))
        .case_insensitive(true)
        .size_limit(PLACEHOLDER_SIZE_LIMIT)
        .build()
        .map_err(|e| CatalogError::InvalidInsertType {
            location: location(),
            reason: e.to_string(),
        })
}
