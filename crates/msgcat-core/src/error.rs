//! Error types for catalog operations

use std::fmt;
use std::path::PathBuf;
use thiserror::Error;

/// Which side of an insert set a validation failure refers to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InsertKind {
    /// Inserts addressed by `{key}`
    Named,
    /// Inserts addressed by `{0}`, `{1}`, ...
    Positional,
}

impl fmt::Display for InsertKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Named => f.write_str("named inserts must be an object"),
            Self::Positional => f.write_str("positional inserts must be an array"),
        }
    }
}

/// Location of an individual insert value that failed validation
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InsertLocation {
    /// Named insert with the given key
    Key(String),
    /// Positional insert at the given index
    Index(usize),
}

impl fmt::Display for InsertLocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Key(key) => write!(f, "namedInserts '{}'", key),
            Self::Index(index) => write!(f, "positionalInserts value with index: '{}'", index),
        }
    }
}

/// Errors raised while loading catalogs or resolving messages
#[derive(Error, Debug)]
pub enum CatalogError {
    /// No entry for the catalog in the index
    #[error("Catalog {catalog} not found")]
    CatalogNotFound { catalog: String },

    /// Index entry url is missing or not a string
    #[error("Catalog Index Url not a string: {url} for catalog {catalog}")]
    InvalidIndexUrlType { catalog: String, url: String },

    /// Index entry url uses a remote scheme
    #[error("Remote catalogs not yet supported for catalog {catalog}")]
    RemoteNotSupported { catalog: String },

    /// Index entry url uses an unknown scheme
    #[error("Invalid Catalog Index Url for catalog {catalog}")]
    InvalidIndexUrl { catalog: String },

    /// Code not present in the selected table or the default one
    #[error("Message {code} not found in catalog {catalog}")]
    MessageNotFound { code: String, catalog: String },

    /// Template has no message text
    #[error("Message {code} found in catalog {catalog} but without message property")]
    MessageMissingTextProperty { code: String, catalog: String },

    /// Inserts are not a mapping / sequence
    #[error("{kind} if defined")]
    InvalidInsertsShape { kind: InsertKind },

    /// An insert value has no supported representation
    #[error("{location} is of unsupported type: {reason}")]
    InvalidInsertType {
        location: InsertLocation,
        reason: String,
    },

    /// The index file could not be read
    #[error("Failed to read catalog index {}: {source}", .path.display())]
    IndexLoad {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A catalog data file could not be read
    #[error("Failed to read catalog {catalog} from {}: {source}", .path.display())]
    CatalogLoad {
        catalog: String,
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A catalog document could not be parsed
    #[error("Failed to parse {}: {message}", .path.display())]
    Parse { path: PathBuf, message: String },

    /// Catalog file has no table for the default locale
    #[error("Catalog {catalog} has no default locale table")]
    MissingDefaultLocale { catalog: String },
}

impl CatalogError {
    /// True for errors caused by the caller's inserts rather than catalog data
    pub fn is_insert_error(&self) -> bool {
        matches!(
            self,
            Self::InvalidInsertsShape { .. } | Self::InvalidInsertType { .. }
        )
    }
}

/// Result type for catalog operations
pub type CatalogResult<T> = Result<T, CatalogError>;
