use serde::{Deserialize, Serialize};
use std::borrow::Borrow;
use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

use crate::data::datavalue_compare::compare_datavalues;
use crate::data::record::Record;

/// Sort direction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum SortDirection {
    #[default]
    #[serde(rename = "asc")]
    Ascending,
    #[serde(rename = "desc")]
    Descending,
}

impl SortDirection {
    /// Returns the opposite direction
    pub fn toggle(self) -> Self {
        match self {
            SortDirection::Ascending => SortDirection::Descending,
            SortDirection::Descending => SortDirection::Ascending,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            SortDirection::Ascending => "asc",
            SortDirection::Descending => "desc",
        }
    }
}

impl fmt::Display for SortDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SortDirection {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "asc" | "ascending" => Ok(SortDirection::Ascending),
            "desc" | "descending" => Ok(SortDirection::Descending),
            other => Err(anyhow::anyhow!("Unknown sort direction '{}'", other)),
        }
    }
}

/// The active sort: one field, one direction
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SortSpec {
    pub key: String,
    pub direction: SortDirection,
}

impl SortSpec {
    pub fn ascending(key: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            direction: SortDirection::Ascending,
        }
    }

    pub fn descending(key: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            direction: SortDirection::Descending,
        }
    }

    /// Next sort after the user asks to sort by `key`: the same key flips
    /// direction, a different key starts ascending.
    pub fn toggled(current: Option<&SortSpec>, key: &str) -> SortSpec {
        match current {
            Some(spec) if spec.key == key => SortSpec {
                key: spec.key.clone(),
                direction: spec.direction.toggle(),
            },
            _ => SortSpec::ascending(key),
        }
    }
}

/// Compare two records on `key`.
///
/// A record whose value is absent or `Null` sorts after the other one in
/// both directions; only comparisons between present values are reversed
/// for [`SortDirection::Descending`].
pub fn compare_records(a: &Record, b: &Record, key: &str, direction: SortDirection) -> Ordering {
    match (a.present(key), b.present(key)) {
        (None, None) => Ordering::Equal,
        (None, Some(_)) => Ordering::Greater,
        (Some(_), None) => Ordering::Less,
        (Some(x), Some(y)) => {
            let cmp = compare_datavalues(x, y);
            match direction {
                SortDirection::Ascending => cmp,
                SortDirection::Descending => cmp.reverse(),
            }
        }
    }
}

/// Stable sorted permutation of `records` by `key`.
///
/// Element `i` of the result is the input index of the record that belongs
/// at position `i`. Ties keep input order.
pub fn sorted_order<R>(records: &[R], key: &str, direction: SortDirection) -> Vec<usize>
where
    R: Borrow<Record>,
{
    stable_sort_indices(records.len(), |a, b| {
        compare_records(
            <R as Borrow<Record>>::borrow(&records[a]),
            <R as Borrow<Record>>::borrow(&records[b]),
            key,
            direction,
        )
    })
}

/// Sorted copy of `records`; the input is left untouched
pub fn sort_records<R>(records: &[R], key: &str, direction: SortDirection) -> Vec<R>
where
    R: Borrow<Record> + Clone,
{
    sorted_order(records, key, direction)
        .into_iter()
        .map(|idx| records[idx].clone())
        .collect()
}

/// Bottom-up merge sort over indices.
///
/// Ties keep input order. Only strictly-less comparisons move an element, so
/// a comparator that reports NaN as equal to everything still yields a
/// deterministic result instead of a panic.
fn stable_sort_indices<F>(len: usize, mut compare: F) -> Vec<usize>
where
    F: FnMut(usize, usize) -> Ordering,
{
    let mut order: Vec<usize> = (0..len).collect();
    let mut merged = order.clone();
    let mut width = 1;

    while width < len {
        let mut start = 0;
        while start < len {
            let mid = (start + width).min(len);
            let end = (start + 2 * width).min(len);
            let (mut left, mut right) = (start, mid);

            for slot in merged.iter_mut().take(end).skip(start) {
                // Taking from the right only when strictly less keeps ties stable
                let take_right = right < end
                    && (left >= mid || compare(order[right], order[left]) == Ordering::Less);
                if take_right {
                    *slot = order[right];
                    right += 1;
                } else {
                    *slot = order[left];
                    left += 1;
                }
            }
            start = end;
        }
        std::mem::swap(&mut order, &mut merged);
        width *= 2;
    }

    order
}
