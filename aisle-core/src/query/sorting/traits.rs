//! Core trait for sortable entities

use super::SortValue;

/// An entity that can be ordered by named storage fields
///
/// Property mappings point public sort keys at the names listed in
/// `SORT_FIELDS`; a mapping that names anything else is rejected when
/// the sort plan is compiled.
pub trait Sortable {
    /// Storage field names this entity can produce sort keys for
    const SORT_FIELDS: &'static [&'static str];

    /// Extract the sort key for one of `SORT_FIELDS`
    fn sort_value(&self, field: &str) -> Option<SortValue>;

    /// Resolve a storage field name to its canonical spelling
    fn resolve_sort_field(name: &str) -> Option<&'static str> {
        Self::SORT_FIELDS
            .iter()
            .copied()
            .find(|field| field.eq_ignore_ascii_case(name))
    }
}
