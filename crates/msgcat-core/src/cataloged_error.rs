//! Errors that carry a catalog message code
//!
//! A [`CatalogedError`] is the value an application returns (or sends in a
//! response body) when a failure should be explained with a catalog message.
//! It is plain data: the catalog, the code, a debug message and the inserts
//! to apply when the code is resolved.

use crate::error::{CatalogError, CatalogResult};
use crate::insert::{validate_named_inserts, validate_positional_inserts, NamedInserts, PositionalInserts};
use serde::ser::{Serialize, SerializeStruct, Serializer};
use serde_json::Value;
use thiserror::Error;

/// Code and catalog used when none was supplied
pub const DEFAULT_CODE: &str = "DEFAULT";

/// An error identified by a catalog message code
#[derive(Error, Debug, Clone, PartialEq)]
#[error("{message}")]
pub struct CatalogedError {
    message_code: String,
    catalog: String,
    message: String,
    named_inserts: NamedInserts,
    positional_inserts: PositionalInserts,
}

impl CatalogedError {
    /// Create an error for `message_code` in `catalog`.
    ///
    /// Empty code or catalog fall back to `"DEFAULT"`.
    pub fn new(
        message_code: impl Into<String>,
        catalog: impl Into<String>,
        message: impl Into<String>,
        named_inserts: NamedInserts,
        positional_inserts: PositionalInserts,
    ) -> Self {
        Self {
            message_code: or_default(message_code.into()),
            catalog: or_default(catalog.into()),
            message: message.into(),
            named_inserts,
            positional_inserts,
        }
    }

    /// Create an error without inserts
    pub fn simple(
        message_code: impl Into<String>,
        catalog: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self::new(
            message_code,
            catalog,
            message,
            NamedInserts::new(),
            PositionalInserts::new(),
        )
    }

    /// Decode a wire payload.
    ///
    /// Accepts the legacy `messageNumber` when `messageCode` is absent and the
    /// legacy `inserts` array when `positionalInserts` is absent. Insert
    /// shapes are validated.
    pub fn from_payload(payload: &Value) -> CatalogResult<Self> {
        let text = |field: &str| payload.get(field).and_then(scalar_text);

        let message_code = text("messageCode").or_else(|| text("messageNumber"));
        let catalog = text("catalog");
        let message = text("message").unwrap_or_default();

        let named = validate_named_inserts(payload.get("namedInserts"))?;
        let positional = validate_positional_inserts(
            payload
                .get("positionalInserts")
                .filter(|v| !v.is_null())
                .or_else(|| payload.get("inserts")),
        )?;

        Ok(Self::new(
            message_code.unwrap_or_default(),
            catalog.unwrap_or_default(),
            message,
            named,
            positional,
        ))
    }

    /// True when `payload` exposes a catalog and a message code
    pub fn looks_cataloged(payload: &Value) -> bool {
        let present = |field: &str| payload.get(field).map(|v| !v.is_null()).unwrap_or(false);
        present("catalog") && (present("messageCode") || present("messageNumber"))
    }

    pub fn message_code(&self) -> &str {
        &self.message_code
    }

    /// Legacy name for [`CatalogedError::message_code`]
    pub fn message_number(&self) -> &str {
        &self.message_code
    }

    pub fn catalog(&self) -> &str {
        &self.catalog
    }

    /// Debug text, not the catalog message
    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn named_inserts(&self) -> &NamedInserts {
        &self.named_inserts
    }

    pub fn positional_inserts(&self) -> &PositionalInserts {
        &self.positional_inserts
    }

    /// Copy with the named inserts replaced
    pub fn with_named_inserts(mut self, named_inserts: NamedInserts) -> Self {
        self.named_inserts = named_inserts;
        self
    }

    /// Copy with the positional inserts replaced
    pub fn with_positional_inserts(mut self, positional_inserts: PositionalInserts) -> Self {
        self.positional_inserts = positional_inserts;
        self
    }
}

/// Wire form: both `messageCode` and the legacy `messageNumber` are written
impl Serialize for CatalogedError {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut state = serializer.serialize_struct("CatalogedError", 6)?;
        state.serialize_field("messageCode", &self.message_code)?;
        state.serialize_field("messageNumber", &self.message_code)?;
        state.serialize_field("catalog", &self.catalog)?;
        state.serialize_field("message", &self.message)?;
        state.serialize_field("namedInserts", &self.named_inserts)?;
        state.serialize_field("positionalInserts", &self.positional_inserts)?;
        state.end()
    }
}

impl TryFrom<&Value> for CatalogedError {
    type Error = CatalogError;

    fn try_from(payload: &Value) -> Result<Self, Self::Error> {
        Self::from_payload(payload)
    }
}

fn or_default(value: String) -> String {
    if value.is_empty() {
        DEFAULT_CODE.to_string()
    } else {
        value
    }
}

/// Strings as they are, numbers and booleans in text form
fn scalar_text(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}
