//! Strategy pattern for composable sorting
//!
//! A sort expression is compiled against a property mapping into a chain of
//! single field sorts. The chain runs its strategies from last to first with
//! a stable sort, so the first clause ends up as the primary key and ties at
//! every level keep their input order.

use super::{SortDirection, SortExpression, SortValue, Sortable, utils};
use crate::error::{CatalogError, Result};
use crate::query::mapping::PropertyMapping;
use std::fmt;
use std::marker::PhantomData;

/// A sorting strategy that can be composed
pub trait SortStrategy<T>: Send + Sync {
    /// Apply this sorting strategy to the given items
    fn sort(&self, items: &mut [T]);
}

/// Single storage field sort
pub struct FieldSort<T> {
    field: &'static str,
    reverse: bool,
    _phantom: PhantomData<fn(&T)>,
}

impl<T> FieldSort<T> {
    pub fn new(field: &'static str, reverse: bool) -> Self {
        Self {
            field,
            reverse,
            _phantom: PhantomData,
        }
    }
}

impl<T> fmt::Debug for FieldSort<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FieldSort")
            .field("field", &self.field)
            .field("reverse", &self.reverse)
            .finish()
    }
}

impl<T> SortStrategy<T> for FieldSort<T>
where
    T: Sortable + Clone,
{
    fn sort(&self, items: &mut [T]) {
        // Extract keys once
        let mut keys: Vec<(usize, Option<SortValue>)> = items
            .iter()
            .enumerate()
            .map(|(i, item)| (i, item.sort_value(self.field)))
            .collect();

        keys.sort_by(|a, b| utils::compare_keys(a.1.as_ref(), b.1.as_ref(), self.reverse));

        let order: Vec<_> = keys.into_iter().map(|(i, _)| i).collect();
        utils::apply_order(items, &order);
    }
}

/// Multi-field sort with stable sorting
pub struct ChainedSort<T> {
    strategies: Vec<Box<dyn SortStrategy<T>>>,
}

impl<T> ChainedSort<T> {
    pub fn new() -> Self {
        Self {
            strategies: Vec::new(),
        }
    }

    /// Add a sorting strategy to the chain
    pub fn then_by(mut self, strategy: impl SortStrategy<T> + 'static) -> Self {
        self.strategies.push(Box::new(strategy));
        self
    }

    pub fn len(&self) -> usize {
        self.strategies.len()
    }

    pub fn is_empty(&self) -> bool {
        self.strategies.is_empty()
    }
}

impl<T> Default for ChainedSort<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> fmt::Debug for ChainedSort<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ChainedSort")
            .field("strategies", &self.strategies.len())
            .finish()
    }
}

impl<T> SortStrategy<T> for ChainedSort<T> {
    fn sort(&self, items: &mut [T]) {
        // Apply strategies in reverse order so the primary sort wins
        for strategy in self.strategies.iter().rev() {
            strategy.sort(items);
        }
    }
}

/// A sort expression resolved against a mapping for entity type `T`
pub struct SortPlan<T> {
    chain: ChainedSort<T>,
    fields: Vec<(&'static str, SortDirection)>,
}

impl<T> SortPlan<T>
where
    T: Sortable + Clone + 'static,
{
    /// Resolve every clause through `mapping`.
    ///
    /// A key missing from the mapping is the caller's fault
    /// ([`CatalogError::InvalidSortKey`]); a mapping that targets a field the
    /// entity cannot produce is a wiring fault ([`CatalogError::Configuration`]).
    pub fn compile(expression: &SortExpression, mapping: &PropertyMapping) -> Result<Self> {
        let mut chain = ChainedSort::new();
        let mut fields = Vec::new();

        for clause in expression.clauses() {
            let value = mapping.get(&clause.key).ok_or_else(|| {
                CatalogError::InvalidSortKey(format!("no mapping for sort key '{}'", clause.key))
            })?;

            let direction = if value.revert() {
                clause.direction.reversed()
            } else {
                clause.direction
            };

            for destination in value.destination_properties() {
                let field = T::resolve_sort_field(destination).ok_or_else(|| {
                    CatalogError::Configuration(format!(
                        "mapping for '{}' targets unknown field '{destination}'",
                        clause.key
                    ))
                })?;
                chain = chain.then_by(FieldSort::<T>::new(field, direction.is_descending()));
                fields.push((field, direction));
            }
        }

        Ok(Self { chain, fields })
    }

    pub fn apply(&self, items: &mut [T]) {
        self.chain.sort(items);
    }

    /// The resolved storage fields in priority order
    pub fn fields(&self) -> &[(&'static str, SortDirection)] {
        &self.fields
    }
}

impl<T> fmt::Debug for SortPlan<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SortPlan")
            .field("fields", &self.fields)
            .finish_non_exhaustive()
    }
}
