//! Sort key values extracted from entities
//!
//! Entities hand back one of these per storage field; comparisons between
//! keys of the same kind are total, floats included.

use ordered_float::OrderedFloat;
use std::cmp::Ordering;

/// A comparable value pulled out of an entity for one storage field
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SortValue {
    Integer(i64),
    Float(OrderedFloat<f64>),
    Text(TextKey),
}

impl SortValue {
    pub fn integer(value: impl Into<i64>) -> Self {
        SortValue::Integer(value.into())
    }

    pub fn float(value: f64) -> Self {
        SortValue::Float(OrderedFloat(value))
    }

    pub fn text(value: impl Into<String>) -> Self {
        SortValue::Text(TextKey::new(value))
    }

    fn rank(&self) -> u8 {
        match self {
            SortValue::Integer(_) => 0,
            SortValue::Float(_) => 1,
            SortValue::Text(_) => 2,
        }
    }

    /// Compare two keys, reversing the result when `reverse` is set
    #[inline]
    pub fn compare_with_order(&self, other: &Self, reverse: bool) -> Ordering {
        if reverse {
            other.cmp(self)
        } else {
            self.cmp(other)
        }
    }
}

impl Ord for SortValue {
    fn cmp(&self, other: &Self) -> Ordering {
        match (self, other) {
            (SortValue::Integer(a), SortValue::Integer(b)) => a.cmp(b),
            (SortValue::Float(a), SortValue::Float(b)) => a.cmp(b),
            (SortValue::Text(a), SortValue::Text(b)) => a.cmp(b),
            // Mixed kinds only happen when an entity reports inconsistent
            // types for one field; keep the order total anyway.
            _ => self.rank().cmp(&other.rank()),
        }
    }
}

impl PartialOrd for SortValue {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// Text key ordered case-insensitively, with an ordinal tie-break so that
/// "milk" and "Milk" still have a fixed relative order
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TextKey {
    folded: String,
    raw: String,
}

impl TextKey {
    pub fn new(value: impl Into<String>) -> Self {
        let raw = value.into();
        TextKey {
            folded: raw.to_lowercase(),
            raw,
        }
    }

    pub fn as_str(&self) -> &str {
        &self.raw
    }
}

impl Ord for TextKey {
    fn cmp(&self, other: &Self) -> Ordering {
        self.folded
            .cmp(&other.folded)
            .then_with(|| self.raw.cmp(&other.raw))
    }
}

impl PartialOrd for TextKey {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}
