//! Catalog index and message table loading
//!
//! A catalog index maps catalog names to a `url`. Entries with a `file://`
//! url point at a document (relative to the index file) keyed by locale,
//! then by message code. All local catalogs are read once when the store is
//! built; the store is immutable afterwards.

use crate::error::{CatalogError, CatalogResult};
use crate::insert::NamedInserts;
use crate::locale::{CatalogKey, DEFAULT_LOCALE};
use regex::Regex;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::{BTreeMap, HashMap};
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::LazyLock;
use tracing::{debug, info, warn};

/// Prefix of catalog urls that are loaded from disk
pub const FILE_SCHEME: &str = "file://";

static FILE_URL_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)^file://").expect("Invalid file url regex pattern"));

static REMOTE_URL_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)^https?://").expect("Invalid remote url regex pattern"));

/// A message entry as written in a catalog file
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MessageTemplate {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub action: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub detail: Option<String>,
    /// Catalog-declared insert defaults
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub named_inserts: Option<NamedInserts>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    /// Any other fields, carried through resolution untouched
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Message templates of one catalog in one locale, keyed by code
pub type CatalogTable = HashMap<String, MessageTemplate>;

/// Where an index entry says its catalog lives
#[derive(Debug, Clone, PartialEq)]
pub enum CatalogSource {
    /// `file://` url, relative to the index directory
    Local(String),
    /// `http://` or `https://` url
    Remote(String),
    /// String url with any other scheme
    Unsupported(String),
    /// Missing or non-string url; holds its rendered form
    NotAString(String),
}

impl CatalogSource {
    /// Classify an index entry's `url` value
    pub fn classify(url: Option<&Value>) -> Self {
        match url {
            Some(Value::String(url)) if FILE_URL_REGEX.is_match(url) => Self::Local(url.clone()),
            Some(Value::String(url)) if REMOTE_URL_REGEX.is_match(url) => Self::Remote(url.clone()),
            Some(Value::String(url)) => Self::Unsupported(url.clone()),
            Some(other) => Self::NotAString(other.to_string()),
            None => Self::NotAString("undefined".to_string()),
        }
    }
}

/// Loaded catalogs, immutable after construction
#[derive(Debug)]
pub struct CatalogStore {
    index_path: PathBuf,
    index: BTreeMap<String, CatalogSource>,
    tables: HashMap<CatalogKey, CatalogTable>,
}

impl CatalogStore {
    /// Read the index at `index_path` and every local catalog it names
    pub fn load<P: AsRef<Path>>(index_path: P) -> CatalogResult<Self> {
        let index_path = index_path.as_ref().to_path_buf();
        let root = index_path
            .parent()
            .map(Path::to_path_buf)
            .unwrap_or_else(|| PathBuf::from("."));

        debug!("Loading catalog index: {:?}", index_path);
        let content = fs::read_to_string(&index_path).map_err(|source| CatalogError::IndexLoad {
            path: index_path.clone(),
            source,
        })?;
        let raw: Map<String, Value> = parse_document(&index_path, &content)?;

        let index: BTreeMap<String, CatalogSource> = raw
            .iter()
            .map(|(name, entry)| (name.clone(), CatalogSource::classify(entry.get("url"))))
            .collect();

        let mut tables = HashMap::new();
        for (name, source) in &index {
            match source {
                CatalogSource::Local(url) => {
                    let path = local_catalog_path(&root, url);
                    let locales = load_catalog_file(name, &path)?;
                    for (locale, table) in locales {
                        debug!("Cached {} messages for {}", table.len(), CatalogKey::new(name.as_str(), locale.as_str()));
                        tables.insert(CatalogKey::new(name.as_str(), locale), table);
                    }
                    info!("Loaded catalog {} from {:?}", name, path);
                }
                other => {
                    warn!("Catalog {} is not local and will not be loaded: {:?}", name, other);
                }
            }
        }

        info!(
            "Catalog store ready: {} catalogs indexed, {} locale tables cached",
            index.len(),
            tables.len()
        );

        Ok(Self {
            index_path,
            index,
            tables,
        })
    }

    /// Check that `catalog` is indexed with a loadable local url.
    ///
    /// Checks presence, then url type, then scheme.
    pub fn check_catalog(&self, catalog: &str) -> CatalogResult<()> {
        match self.index.get(catalog) {
            None => Err(CatalogError::CatalogNotFound {
                catalog: catalog.to_string(),
            }),
            Some(CatalogSource::NotAString(url)) => Err(CatalogError::InvalidIndexUrlType {
                catalog: catalog.to_string(),
                url: url.clone(),
            }),
            Some(CatalogSource::Local(_)) => Ok(()),
            Some(CatalogSource::Remote(_)) => Err(CatalogError::RemoteNotSupported {
                catalog: catalog.to_string(),
            }),
            Some(CatalogSource::Unsupported(_)) => Err(CatalogError::InvalidIndexUrl {
                catalog: catalog.to_string(),
            }),
        }
    }

    /// Table for `catalog` in `locale`, if one was loaded
    pub fn table(&self, catalog: &str, locale: &str) -> Option<&CatalogTable> {
        self.tables.get(&CatalogKey::new(catalog, locale))
    }

    /// Table for `catalog` in the default locale
    pub fn default_table(&self, catalog: &str) -> Option<&CatalogTable> {
        self.table(catalog, DEFAULT_LOCALE)
    }

    /// Names of every indexed catalog, local or not
    pub fn catalog_names(&self) -> impl Iterator<Item = &str> {
        self.index.keys().map(String::as_str)
    }

    /// Locales loaded for `catalog`, sorted
    pub fn locales(&self, catalog: &str) -> Vec<&str> {
        let mut locales: Vec<&str> = self
            .tables
            .keys()
            .filter(|key| key.catalog() == catalog)
            .map(CatalogKey::locale)
            .collect();
        locales.sort_unstable();
        locales
    }

    pub fn index_path(&self) -> &Path {
        &self.index_path
    }
}

/// Resolve a `file://` url against the index directory.
///
/// Leading `./` and `/` are dropped so the path stays relative to `root`.
/// A directory resolves to the `index.json` inside it.
fn local_catalog_path(root: &Path, url: &str) -> PathBuf {
    let rest = url.get(FILE_SCHEME.len()..).unwrap_or_default();
    let relative = rest.trim_start_matches("./").trim_start_matches('/');
    let path = root.join(relative);
    if path.is_dir() {
        path.join("index.json")
    } else {
        path
    }
}

fn load_catalog_file(catalog: &str, path: &Path) -> CatalogResult<BTreeMap<String, CatalogTable>> {
    let content = fs::read_to_string(path).map_err(|source| CatalogError::CatalogLoad {
        catalog: catalog.to_string(),
        path: path.to_path_buf(),
        source,
    })?;
    let locales: BTreeMap<String, CatalogTable> = parse_document(path, &content)?;

    if !locales.contains_key(DEFAULT_LOCALE) {
        return Err(CatalogError::MissingDefaultLocale {
            catalog: catalog.to_string(),
        });
    }

    Ok(locales)
}

/// Parse YAML for `.yaml`/`.yml` files, JSON otherwise
fn parse_document<T: DeserializeOwned>(path: &Path, content: &str) -> CatalogResult<T> {
    let is_yaml = path
        .extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| ext.eq_ignore_ascii_case("yaml") || ext.eq_ignore_ascii_case("yml"))
        .unwrap_or(false);

    let parsed = if is_yaml {
        serde_yaml::from_str(content).map_err(|e| e.to_string())
    } else {
        serde_json::from_str(content).map_err(|e| e.to_string())
    };

    parsed.map_err(|message| CatalogError::Parse {
        path: path.to_path_buf(),
        message,
    })
}
