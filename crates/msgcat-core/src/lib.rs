//! Message catalogs for error codes
//!
//! This crate resolves message codes against locale-aware catalogs and
//! substitutes inserts into the catalog templates. It includes:
//!
//! - Catalog index and table loading ([`CatalogStore`])
//! - Locale fallback to the default `en` table
//! - Validation of named and positional inserts
//! - `{key}` / `{0}` placeholder substitution
//! - Formatting of [`CatalogedError`] values
//!
//! # Example
//!
//! ```rust,no_run
//! use msgcat_core::{named_inserts, MessageCatalogManager, MessageRequest};
//!
//! # fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let manager = MessageCatalogManager::new("catalogs/catalog-index.json")?;
//!
//! let request = MessageRequest::new("exampleLocal", "0002")
//!     .named_inserts(named_inserts!["id" => "test-id"]?)
//!     .locale("de");
//! let message = manager.resolve(&request)?;
//! println!("{}", message.message);
//! # Ok(())
//! # }
//! ```

pub mod catalog;
pub mod cataloged_error;
pub mod error;
pub mod formatter;
pub mod insert;
pub mod locale;
pub mod manager;
pub mod template;

pub use catalog::{CatalogSource, CatalogStore, CatalogTable, MessageTemplate};
pub use cataloged_error::CatalogedError;
pub use error::{CatalogError, CatalogResult, InsertKind, InsertLocation};
pub use insert::{validate_named_inserts, validate_positional_inserts, InsertValue, NamedInserts, PositionalInserts};
pub use locale::{CatalogKey, DEFAULT_LOCALE};
pub use manager::{MessageCatalogManager, MessageRequest, ResolvedMessage};
pub use template::{apply_inserts, Substitution};
