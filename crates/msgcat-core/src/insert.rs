//! Insert values and their validation
//!
//! Inserts are the values substituted into `{key}` and `{N}` placeholders.
//! Every value is one of a closed set of kinds ([`InsertValue`]); anything
//! that cannot be represented as one of them is rejected before it reaches
//! a template.

use crate::error::{CatalogError, CatalogResult, InsertKind, InsertLocation};
use serde::de::{Deserializer, MapAccess, Visitor};
use serde::ser::{SerializeMap, Serializer};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Number, Value};
use std::fmt;

/// A single insert value
#[derive(Debug, Clone, PartialEq, Default)]
pub enum InsertValue {
    /// No value supplied (`null`)
    #[default]
    Absent,
    /// Text
    String(String),
    /// Integer or floating point number
    Number(Number),
    /// `true` / `false`
    Boolean(bool),
    /// Object or array
    Struct(Value),
}

impl InsertValue {
    /// Convert any serializable value into an insert.
    ///
    /// Fails when the value has no data representation, e.g. a type whose
    /// `Serialize` impl refuses or a map keyed by non-strings.
    pub fn from_serialize<T: Serialize + ?Sized>(value: &T) -> Result<Self, serde_json::Error> {
        serde_json::to_value(value).map(Self::from)
    }

    /// Back to a document value
    pub fn to_value(&self) -> Value {
        match self {
            Self::Absent => Value::Null,
            Self::String(s) => Value::String(s.clone()),
            Self::Number(n) => Value::Number(n.clone()),
            Self::Boolean(b) => Value::Bool(*b),
            Self::Struct(v) => v.clone(),
        }
    }

    /// Name of the kind, for diagnostics
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Absent => "absent",
            Self::String(_) => "string",
            Self::Number(_) => "number",
            Self::Boolean(_) => "boolean",
            Self::Struct(_) => "struct",
        }
    }
}

impl From<Value> for InsertValue {
    fn from(value: Value) -> Self {
        match value {
            Value::Null => Self::Absent,
            Value::String(s) => Self::String(s),
            Value::Number(n) => Self::Number(n),
            Value::Bool(b) => Self::Boolean(b),
            other @ (Value::Array(_) | Value::Object(_)) => Self::Struct(other),
        }
    }
}

impl From<&str> for InsertValue {
    fn from(value: &str) -> Self {
        Self::String(value.to_string())
    }
}

impl From<String> for InsertValue {
    fn from(value: String) -> Self {
        Self::String(value)
    }
}

impl From<bool> for InsertValue {
    fn from(value: bool) -> Self {
        Self::Boolean(value)
    }
}

impl From<i64> for InsertValue {
    fn from(value: i64) -> Self {
        Self::Number(value.into())
    }
}

impl From<u64> for InsertValue {
    fn from(value: u64) -> Self {
        Self::Number(value.into())
    }
}

impl From<i32> for InsertValue {
    fn from(value: i32) -> Self {
        Self::Number(value.into())
    }
}

/// Renders the natural text form used during substitution.
///
/// Arrays join their elements with `,`; objects render as `[object Object]`.
impl fmt::Display for InsertValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Struct(value) => write_struct(f, value),
            Self::Absent => f.write_str("null"),
            Self::String(s) => f.write_str(s),
            Self::Boolean(b) => write!(f, "{}", b),
            Self::Number(n) => write_number(f, n),
        }
    }
}

fn write_number(f: &mut fmt::Formatter<'_>, n: &Number) -> fmt::Result {
    match n.as_f64() {
        Some(x) if !n.is_i64() && !n.is_u64() && x.is_finite() && x.fract() == 0.0 && x.abs() < 1e15 => {
            write!(f, "{}", x as i64)
        }
        _ => write!(f, "{}", n),
    }
}

fn write_struct(f: &mut fmt::Formatter<'_>, value: &Value) -> fmt::Result {
    match value {
        Value::Array(items) => {
            for (i, item) in items.iter().enumerate() {
                if i > 0 {
                    f.write_str(",")?;
                }
                // nulls inside arrays render empty
                if !item.is_null() {
                    write_struct(f, item)?;
                }
            }
            Ok(())
        }
        Value::Object(_) => f.write_str("[object Object]"),
        scalar => write!(f, "{}", InsertValue::from(scalar.clone())),
    }
}

impl Serialize for InsertValue {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Self::Absent => serializer.serialize_unit(),
            Self::String(s) => serializer.serialize_str(s),
            Self::Number(n) => n.serialize(serializer),
            Self::Boolean(b) => serializer.serialize_bool(*b),
            Self::Struct(v) => v.serialize(serializer),
        }
    }
}

impl<'de> Deserialize<'de> for InsertValue {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        Value::deserialize(deserializer).map(Self::from)
    }
}

/// Inserts addressed by name, kept in insertion order.
///
/// Substitution runs in this order, so a value containing another
/// placeholder is expanded by inserts that come after it.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct NamedInserts(Vec<(String, InsertValue)>);

impl NamedInserts {
    /// Empty set
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a value, validating that it can be represented as an insert
    pub fn insert<T: Serialize + ?Sized>(
        &mut self,
        key: impl Into<String>,
        value: &T,
    ) -> CatalogResult<&mut Self> {
        let key = key.into();
        let value = InsertValue::from_serialize(value).map_err(|e| CatalogError::InvalidInsertType {
            location: InsertLocation::Key(key.clone()),
            reason: e.to_string(),
        })?;
        self.set(key, value);
        Ok(self)
    }

    /// Builder form of [`NamedInserts::insert`]
    pub fn with<T: Serialize + ?Sized>(
        mut self,
        key: impl Into<String>,
        value: &T,
    ) -> CatalogResult<Self> {
        self.insert(key, value)?;
        Ok(self)
    }

    /// Add an already typed value.
    ///
    /// An existing key keeps its position and takes the new value.
    pub fn set(&mut self, key: impl Into<String>, value: impl Into<InsertValue>) {
        let key = key.into();
        let value = value.into();
        match self.0.iter_mut().find(|(existing, _)| *existing == key) {
            Some((_, slot)) => *slot = value,
            None => self.0.push((key, value)),
        }
    }

    pub fn get(&self, key: &str) -> Option<&InsertValue> {
        self.0.iter().find(|(existing, _)| existing == key).map(|(_, value)| value)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &InsertValue)> {
        self.0.iter().map(|(key, value)| (key.as_str(), value))
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(|(key, _)| key.as_str())
    }

    /// Overlay `other` on top of `self`; keys in `other` win
    pub fn merged_with(mut self, other: &Self) -> Self {
        for (key, value) in other.iter() {
            self.set(key, value.clone());
        }
        self
    }

    /// Document form, in insertion order
    pub fn to_value(&self) -> Value {
        Value::Object(
            self.0
                .iter()
                .map(|(key, value)| (key.clone(), value.to_value()))
                .collect(),
        )
    }
}

impl<K: Into<String>, V: Into<InsertValue>> FromIterator<(K, V)> for NamedInserts {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut inserts = Self::new();
        for (key, value) in iter {
            inserts.set(key, value);
        }
        inserts
    }
}

impl Serialize for NamedInserts {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.0.len()))?;
        for (key, value) in &self.0 {
            map.serialize_entry(key, value)?;
        }
        map.end()
    }
}

impl<'de> Deserialize<'de> for NamedInserts {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct OrderedVisitor;

        impl<'de> Visitor<'de> for OrderedVisitor {
            type Value = NamedInserts;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("a map of named inserts")
            }

            fn visit_map<A: MapAccess<'de>>(self, mut access: A) -> Result<Self::Value, A::Error> {
                let mut inserts = NamedInserts::new();
                while let Some((key, value)) = access.next_entry::<String, InsertValue>()? {
                    inserts.set(key, value);
                }
                Ok(inserts)
            }
        }

        deserializer.deserialize_map(OrderedVisitor)
    }
}

/// Inserts addressed by index
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PositionalInserts(Vec<InsertValue>);

impl PositionalInserts {
    /// Empty list
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a value, validating that it can be represented as an insert
    pub fn push<T: Serialize + ?Sized>(&mut self, value: &T) -> CatalogResult<&mut Self> {
        let index = self.0.len();
        let value = InsertValue::from_serialize(value).map_err(|e| CatalogError::InvalidInsertType {
            location: InsertLocation::Index(index),
            reason: e.to_string(),
        })?;
        self.0.push(value);
        Ok(self)
    }

    /// Builder form of [`PositionalInserts::push`]
    pub fn with<T: Serialize + ?Sized>(mut self, value: &T) -> CatalogResult<Self> {
        self.push(value)?;
        Ok(self)
    }

    pub fn get(&self, index: usize) -> Option<&InsertValue> {
        self.0.get(index)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &InsertValue> {
        self.0.iter()
    }
}

impl<V: Into<InsertValue>> FromIterator<V> for PositionalInserts {
    fn from_iter<I: IntoIterator<Item = V>>(iter: I) -> Self {
        Self(iter.into_iter().map(Into::into).collect())
    }
}

/// Validate untyped named inserts.
///
/// `None` and `null` mean no inserts; any other non-object fails.
pub fn validate_named_inserts(raw: Option<&Value>) -> CatalogResult<NamedInserts> {
    match raw {
        None | Some(Value::Null) => Ok(NamedInserts::new()),
        Some(Value::Object(map)) => Ok(named_from_map(map)),
        Some(_) => Err(CatalogError::InvalidInsertsShape {
            kind: InsertKind::Named,
        }),
    }
}

/// Validate untyped positional inserts.
///
/// `None` and `null` mean no inserts; any other non-array fails.
pub fn validate_positional_inserts(raw: Option<&Value>) -> CatalogResult<PositionalInserts> {
    match raw {
        None | Some(Value::Null) => Ok(PositionalInserts::new()),
        Some(Value::Array(items)) => Ok(items.iter().cloned().map(InsertValue::from).collect()),
        Some(_) => Err(CatalogError::InvalidInsertsShape {
            kind: InsertKind::Positional,
        }),
    }
}

fn named_from_map(map: &Map<String, Value>) -> NamedInserts {
    map.iter()
        .map(|(k, v)| (k.clone(), InsertValue::from(v.clone())))
        .collect()
}

/// Build [`NamedInserts`] from `key => value` pairs, validating each value.
///
/// Evaluates to `CatalogResult<NamedInserts>`.
#[macro_export]
macro_rules! named_inserts {
    () => {
        Ok::<_, $crate::CatalogError>($crate::NamedInserts::new())
    };
    ($($key:expr => $value:expr),+ $(,)?) => {{
        (|| {
            let mut inserts = $crate::NamedInserts::new();
            $(
                inserts.insert($key, &$value)?;
            )+
            Ok::<_, $crate::CatalogError>(inserts)
        })()
    }};
}

/// Build [`PositionalInserts`] from a list of values, validating each one.
///
/// Evaluates to `CatalogResult<PositionalInserts>`.
#[macro_export]
macro_rules! positional_inserts {
    () => {
        Ok::<_, $crate::CatalogError>($crate::PositionalInserts::new())
    };
    ($($value:expr),+ $(,)?) => {{
        (|| {
            let mut inserts = $crate::PositionalInserts::new();
            $(
                inserts.push(&$value)?;
            )+
            Ok::<_, $crate::CatalogError>(inserts)
        })()
    }};
}
