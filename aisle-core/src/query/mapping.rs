//! Property mappings from public sort keys to storage fields
//!
//! A mapping belongs to a (source, destination) type pair, typically an
//! entity and its transfer shape. All mappings are registered once while
//! the process starts and are read-only afterwards; the registry is passed
//! around explicitly rather than living in a global.

use crate::error::{CatalogError, Result};
use crate::query::sorting::SortExpression;
use indexmap::IndexMap;
use std::any::{TypeId, type_name};
use std::collections::HashMap;

/// Storage fields behind one public key
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PropertyMappingValue {
    destination_properties: Vec<String>,
    revert: bool,
}

impl PropertyMappingValue {
    pub fn new<I, S>(destination_properties: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            destination_properties: destination_properties.into_iter().map(Into::into).collect(),
            revert: false,
        }
    }

    /// Invert the requested direction for this key
    pub fn reverted(mut self) -> Self {
        self.revert = true;
        self
    }

    pub fn destination_properties(&self) -> &[String] {
        &self.destination_properties
    }

    pub fn revert(&self) -> bool {
        self.revert
    }
}

/// Case-insensitive map of public key to [`PropertyMappingValue`]
#[derive(Debug, Clone, Default)]
pub struct PropertyMapping {
    entries: IndexMap<String, PropertyMappingValue>,
}

impl PropertyMapping {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, key: &str, value: PropertyMappingValue) -> Self {
        self.insert(key, value);
        self
    }

    pub fn insert(&mut self, key: &str, value: PropertyMappingValue) {
        self.entries.insert(key.to_lowercase(), value);
    }

    pub fn get(&self, key: &str) -> Option<&PropertyMappingValue> {
        self.entries.get(&key.trim().to_lowercase())
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.get(key).is_some()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// True when every key of `expression` is mapped. Blank is always valid.
    pub fn is_valid_sort_expression(&self, expression: &str) -> bool {
        self.validate_sort_expression(expression).is_ok()
    }

    /// Parse `expression` and check every key against this mapping.
    ///
    /// One unknown key rejects the whole expression.
    pub fn validate_sort_expression(&self, expression: &str) -> Result<SortExpression> {
        let parsed = SortExpression::parse(expression)?;
        if let Some(unknown) = parsed.keys().find(|key| !self.contains_key(key)) {
            return Err(CatalogError::InvalidSortKey(format!(
                "'{unknown}' is not a sortable field"
            )));
        }
        Ok(parsed)
    }
}

#[derive(Debug)]
struct RegisteredMapping {
    source: &'static str,
    destination: &'static str,
    mapping: PropertyMapping,
}

/// Registry of mappings keyed by (source type, destination type)
#[derive(Debug, Default)]
pub struct PropertyMappingRegistry {
    mappings: HashMap<(TypeId, TypeId), RegisteredMapping>,
}

impl PropertyMappingRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register the mapping for `S -> D`. A second registration for the same
    /// pair is a configuration error.
    pub fn register<S: 'static, D: 'static>(&mut self, mapping: PropertyMapping) -> Result<()> {
        let key = (TypeId::of::<S>(), TypeId::of::<D>());
        if let Some(existing) = self.mappings.get(&key) {
            return Err(CatalogError::Configuration(format!(
                "property mapping {} -> {} registered twice",
                existing.source, existing.destination
            )));
        }

        tracing::debug!(
            source = type_name::<S>(),
            destination = type_name::<D>(),
            keys = mapping.len(),
            "registered property mapping"
        );

        self.mappings.insert(
            key,
            RegisteredMapping {
                source: type_name::<S>(),
                destination: type_name::<D>(),
                mapping,
            },
        );
        Ok(())
    }

    pub fn mapping<S: 'static, D: 'static>(&self) -> Result<&PropertyMapping> {
        self.mappings
            .get(&(TypeId::of::<S>(), TypeId::of::<D>()))
            .map(|registered| &registered.mapping)
            .ok_or_else(|| {
                CatalogError::Configuration(format!(
                    "no property mapping registered for {} -> {}",
                    type_name::<S>(),
                    type_name::<D>()
                ))
            })
    }

    pub fn is_valid_sort_expression<S: 'static, D: 'static>(&self, expression: &str) -> Result<bool> {
        Ok(self.mapping::<S, D>()?.is_valid_sort_expression(expression))
    }

    pub fn validate_sort_expression<S: 'static, D: 'static>(
        &self,
        expression: &str,
    ) -> Result<SortExpression> {
        self.mapping::<S, D>()?.validate_sort_expression(expression)
    }

    pub fn len(&self) -> usize {
        self.mappings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.mappings.is_empty()
    }
}
