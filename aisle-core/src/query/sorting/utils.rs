//! Helpers shared by the sort strategies

use std::cmp::Ordering;

use super::SortValue;

/// Compare two optional sort keys; rows without a value sort after rows
/// with one regardless of direction.
pub fn compare_keys(
    a: Option<&SortValue>,
    b: Option<&SortValue>,
    reverse: bool,
) -> Ordering {
    match (a, b) {
        (Some(x), Some(y)) => x.compare_with_order(y, reverse),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}

/// Move rows so position `n` holds the row previously at `order[n]`.
pub fn apply_order<T: Clone>(rows: &mut [T], order: &[usize]) {
    debug_assert_eq!(rows.len(), order.len());

    let arranged: Vec<T> = order.iter().map(|&from| rows[from].clone()).collect();
    rows.clone_from_slice(&arranged);
}

/// True when no adjacent pair of `rows` is out of order under `compare`.
pub fn is_ordered<T>(rows: &[T], mut compare: impl FnMut(&T, &T) -> Ordering) -> bool {
    rows.windows(2)
        .all(|pair| compare(&pair[0], &pair[1]) != Ordering::Greater)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_keys_sort_last_both_ways() {
        let value = SortValue::Integer(3);
        assert_eq!(compare_keys(Some(&value), None, false), Ordering::Less);
        assert_eq!(compare_keys(Some(&value), None, true), Ordering::Less);
        assert_eq!(compare_keys(None, None, true), Ordering::Equal);
    }

    #[test]
    fn apply_order_moves_rows() {
        let mut rows = vec!["milk", "bread", "eggs"];
        apply_order(&mut rows, &[1, 2, 0]);
        assert_eq!(rows, vec!["bread", "eggs", "milk"]);
    }

    #[test]
    fn ordered_check() {
        assert!(is_ordered(&[1, 2, 2, 3], |a, b| a.cmp(b)));
        assert!(!is_ordered(&[3, 1], |a, b| a.cmp(b)));
        assert!(is_ordered::<i32>(&[], |a, b| a.cmp(b)));
    }
}
