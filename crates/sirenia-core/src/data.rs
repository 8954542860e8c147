//! Derived projections of a data sequence: parallel accessor columns, interned domains, extents
//! and the valid-index filters every chart applies before drawing.

use crate::accessor::Accessor;
use crate::value::Scalar;
use chrono::{DateTime, Utc};
use indexmap::{IndexMap, IndexSet};

/// Applies `accessor` to every record; the result is aligned by index with `data`.
pub fn project<T, V>(data: &[T], accessor: &Accessor<T, V>) -> Vec<V> {
    data.iter().enumerate().map(|(i, d)| accessor(d, i)).collect()
}

/// Unique values in first-seen order, deduplicated by value equality.
pub fn intern<I>(values: I) -> IndexSet<Scalar>
where
    I: IntoIterator<Item = Scalar>,
{
    values.into_iter().collect()
}

/// `intern(explicit)` when a domain was supplied, otherwise `intern(observed)`.
pub fn categorical_domain(explicit: Option<&[Scalar]>, observed: &[Scalar]) -> IndexSet<Scalar> {
    match explicit {
        Some(d) => intern(d.iter().cloned()),
        None => intern(observed.iter().cloned()),
    }
}

/// Grows `domain` with observed values it does not contain yet, keeping first-seen order.
pub fn extend_domain(domain: &IndexSet<Scalar>, observed: &[Scalar]) -> IndexSet<Scalar> {
    let mut out = domain.clone();
    out.extend(observed.iter().cloned());
    out
}

/// Largest numeric value, ignoring anything that does not coerce to a number.
pub fn max_number(values: &[Scalar]) -> Option<f64> {
    values
        .iter()
        .filter_map(Scalar::as_number)
        .fold(None, |acc, v| Some(acc.map_or(v, |m: f64| m.max(v))))
}

pub fn sum_numbers(values: &[Scalar]) -> f64 {
    values.iter().filter_map(Scalar::as_number).sum()
}

pub fn time_extent(values: &[Option<DateTime<Utc>>]) -> Option<(DateTime<Utc>, DateTime<Utc>)> {
    let mut it = values.iter().flatten();
    let first = *it.next()?;
    Some(it.fold((first, first), |(lo, hi), t| (lo.min(*t), hi.max(*t))))
}

/// Indices whose value coerces to a number.
pub fn numeric_indices(values: &[Scalar]) -> Vec<usize> {
    (0..values.len())
        .filter(|&i| values[i].is_numeric())
        .collect()
}

/// Indices whose value is a member of `domain`.
pub fn indices_in_domain(values: &[Scalar], domain: &IndexSet<Scalar>) -> Vec<usize> {
    (0..values.len())
        .filter(|&i| domain.contains(&values[i]))
        .collect()
}

/// Groups indices by key, groups ordered by first appearance.
pub fn group_by(indices: &[usize], keys: &[Scalar]) -> IndexMap<Scalar, Vec<usize>> {
    let mut out: IndexMap<Scalar, Vec<usize>> = IndexMap::new();
    for &i in indices {
        out.entry(keys[i].clone()).or_default().push(i);
    }
    out
}

/// Index of the value in ascending `sorted` closest to `x`; ties go to the right neighbor.
///
/// Returns `None` only for an empty slice.
pub fn bisect_center(sorted: &[f64], x: f64) -> Option<usize> {
    if sorted.is_empty() {
        return None;
    }
    let hi = sorted.len() - 1;
    let mut lo = 0usize;
    let mut upper = hi;
    while lo < upper {
        let mid = (lo + upper) / 2;
        if sorted[mid] < x {
            lo = mid + 1;
        } else {
            upper = mid;
        }
    }
    let i = lo;
    if i > 0 && (sorted[i - 1] - x) > -(sorted[i] - x) {
        Some(i - 1)
    } else {
        Some(i)
    }
}
