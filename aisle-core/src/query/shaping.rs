//! Field shaping: project a record down to the fields a caller asked for
//!
//! Types opt in by listing their fields, in declaration order, as
//! [`FieldAccessor`]s. Shaped output always follows that declared order, not
//! the order fields were requested in, and stays a mutable ordered map so
//! links can be appended afterwards.

use crate::error::{CatalogError, Result};
use serde::Serialize;
use serde_json::{Map, Value};
use std::fmt;

/// A named getter for one public field of `T`
pub struct FieldAccessor<T> {
    name: &'static str,
    get: fn(&T) -> Value,
}

impl<T> FieldAccessor<T> {
    pub const fn new(name: &'static str, get: fn(&T) -> Value) -> Self {
        Self { name, get }
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn value(&self, item: &T) -> Value {
        (self.get)(item)
    }
}

impl<T> Clone for FieldAccessor<T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T> Copy for FieldAccessor<T> {}

impl<T> fmt::Debug for FieldAccessor<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("FieldAccessor").field(&self.name).finish()
    }
}

/// A type whose public fields can be shaped
pub trait Shape: Sized + 'static {
    /// Every public field, in canonical declaration order
    fn accessors() -> &'static [FieldAccessor<Self>];

    fn field_names() -> Vec<&'static str> {
        Self::accessors().iter().map(FieldAccessor::name).collect()
    }
}

/// Which fields a caller asked for
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum FieldSpec {
    #[default]
    All,
    Selected(Vec<String>),
}

impl FieldSpec {
    /// Parse a comma separated field list; absent or blank means all fields.
    pub fn parse(raw: Option<&str>) -> Result<Self> {
        let Some(raw) = raw.filter(|raw| !raw.trim().is_empty()) else {
            return Ok(FieldSpec::All);
        };

        let mut selected = Vec::new();
        for token in raw.split(',') {
            let token = token.trim();
            if token.is_empty() {
                return Err(CatalogError::InvalidFields(format!(
                    "empty field name in '{raw}'"
                )));
            }
            selected.push(token.to_string());
        }
        Ok(FieldSpec::Selected(selected))
    }

    pub fn includes(&self, name: &str) -> bool {
        match self {
            FieldSpec::All => true,
            FieldSpec::Selected(selected) => {
                selected.iter().any(|field| field.eq_ignore_ascii_case(name))
            }
        }
    }

    /// Parse and check every requested name against `T`'s declared fields.
    pub fn validate_for<T: Shape>(raw: Option<&str>) -> Result<Self> {
        let spec = Self::parse(raw)?;
        if let FieldSpec::Selected(selected) = &spec {
            let declared = T::accessors();
            if let Some(unknown) = selected
                .iter()
                .find(|field| !declared.iter().any(|a| a.name().eq_ignore_ascii_case(field)))
            {
                return Err(CatalogError::InvalidFields(format!(
                    "'{unknown}' is not a field of this resource"
                )));
            }
        }
        Ok(spec)
    }
}

/// True when every name in the comma separated `fields` is declared by `T`
pub fn type_has_properties<T: Shape>(fields: &str) -> bool {
    FieldSpec::validate_for::<T>(Some(fields)).is_ok()
}

/// An ordered field name to value map produced by shaping
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
#[serde(transparent)]
pub struct ShapedRecord(Map<String, Value>);

impl ShapedRecord {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a key, e.g. `links`. Existing keys keep their position.
    pub fn insert(&mut self, key: impl Into<String>, value: Value) {
        self.0.insert(key.into(), value);
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn into_map(self) -> Map<String, Value> {
        self.0
    }
}

impl From<ShapedRecord> for Value {
    fn from(record: ShapedRecord) -> Self {
        Value::Object(record.0)
    }
}

/// Shape one record
pub fn shape<T: Shape>(item: &T, fields: &FieldSpec) -> ShapedRecord {
    let mut record = ShapedRecord::new();
    for accessor in T::accessors() {
        if fields.includes(accessor.name()) {
            record.insert(accessor.name(), accessor.value(item));
        }
    }
    record
}

/// Shape every record of a sequence
pub fn shape_all<T: Shape>(items: &[T], fields: &FieldSpec) -> Vec<ShapedRecord> {
    items.iter().map(|item| shape(item, fields)).collect()
}
