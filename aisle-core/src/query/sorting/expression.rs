//! Parsing of `orderBy` expressions such as `"name desc, price"`

use crate::error::{CatalogError, Result};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortDirection {
    #[default]
    Ascending,
    Descending,
}

impl SortDirection {
    pub fn is_descending(self) -> bool {
        matches!(self, SortDirection::Descending)
    }

    /// Flip the direction; used for mapping entries with the revert flag
    pub fn reversed(self) -> Self {
        match self {
            SortDirection::Ascending => SortDirection::Descending,
            SortDirection::Descending => SortDirection::Ascending,
        }
    }
}

/// One `key [desc]` segment of an expression
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SortClause {
    pub key: String,
    pub direction: SortDirection,
}

/// An ordered list of sort clauses; empty means "no explicit ordering"
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct SortExpression {
    clauses: Vec<SortClause>,
}

impl SortExpression {
    /// Parse a comma separated sort expression.
    ///
    /// The key is the first word of each segment. A segment is descending
    /// when it has more than one word and the last one is `desc` in any
    /// case. A blank input parses to an empty expression, while an empty
    /// segment inside a non-blank input (`"name,,price"`) is an error.
    pub fn parse(raw: &str) -> Result<Self> {
        if raw.trim().is_empty() {
            return Ok(Self::default());
        }

        let mut clauses = Vec::new();
        for segment in raw.split(',') {
            let mut words = segment.split_whitespace();
            let Some(key) = words.next() else {
                return Err(CatalogError::InvalidSortKey(format!(
                    "empty sort clause in '{raw}'"
                )));
            };

            let direction = match words.last() {
                Some(word) if word.eq_ignore_ascii_case("desc") => SortDirection::Descending,
                _ => SortDirection::Ascending,
            };

            clauses.push(SortClause {
                key: key.to_string(),
                direction,
            });
        }

        Ok(Self { clauses })
    }

    pub fn clauses(&self) -> &[SortClause] {
        &self.clauses
    }

    pub fn is_empty(&self) -> bool {
        self.clauses.is_empty()
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.clauses.iter().map(|clause| clause.key.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_directions_and_whitespace() {
        let expr = SortExpression::parse("  name DESC ,price,  id   desc ").unwrap();
        let clauses = expr.clauses();
        assert_eq!(clauses.len(), 3);
        assert_eq!(clauses[0].key, "name");
        assert_eq!(clauses[0].direction, SortDirection::Descending);
        assert_eq!(clauses[1].key, "price");
        assert_eq!(clauses[1].direction, SortDirection::Ascending);
        assert_eq!(clauses[2].key, "id");
        assert_eq!(clauses[2].direction, SortDirection::Descending);
    }

    #[test]
    fn test_blank_expression_is_empty() {
        assert!(SortExpression::parse("").unwrap().is_empty());
        assert!(SortExpression::parse("   ").unwrap().is_empty());
    }

    #[test]
    fn test_key_named_desc_is_ascending() {
        let expr = SortExpression::parse("desc").unwrap();
        assert_eq!(expr.clauses()[0].key, "desc");
        assert_eq!(expr.clauses()[0].direction, SortDirection::Ascending);
    }

    #[test]
    fn test_empty_segment_rejected() {
        let err = SortExpression::parse("name,,price").unwrap_err();
        assert!(matches!(err, CatalogError::InvalidSortKey(_)));
        assert!(SortExpression::parse("name,").is_err());
    }

    #[test]
    fn test_other_trailing_words_keep_ascending() {
        let expr = SortExpression::parse("name asc").unwrap();
        assert_eq!(expr.clauses()[0].direction, SortDirection::Ascending);
        let expr = SortExpression::parse("name descending").unwrap();
        assert_eq!(expr.clauses()[0].direction, SortDirection::Ascending);
    }
}
