//! Integer conventions used when knot data crosses a persisted or foreign
//! boundary: signed indices, sentinel values, and raw side selectors.

use super::knot::KnotVector;
use super::span::Side;

/// Sentinel for an index that has not been set.
pub const UNSET_INT_INDEX: i32 = i32::MIN + 1;

/// Knot count for `order` and `cv_count`, or 0 if the pair is invalid.
pub fn knot_count(order: i32, cv_count: i32) -> i32 {
    if order < 2 || cv_count < order {
        return 0;
    }
    order
        .checked_add(cv_count)
        .and_then(|n| n.checked_sub(2))
        .unwrap_or(0)
}

/// Convert a signed index; negative values (including [`UNSET_INT_INDEX`]) are `None`.
pub fn index_from_raw(index: i32) -> Option<usize> {
    usize::try_from(index).ok()
}

pub fn index_or_unset(index: Option<usize>) -> i32 {
    index
        .and_then(|i| i32::try_from(i).ok())
        .unwrap_or(UNSET_INT_INDEX)
}

/// [`KnotVector::span_index`] with a raw side (`< 0` below) and hint (`< 0` none).
pub fn span_index(kv: &KnotVector, t: f64, side: i32, hint: i32) -> i32 {
    index_or_unset(Some(kv.span_index(t, Side::from_raw(side), index_from_raw(hint))))
}

/// [`KnotVector::next_span_index`] in integer form: 0 below the range, -1 above it.
pub fn next_span_index(kv: &KnotVector, span_index: i32) -> i32 {
    kv.next_span_index(span_index).to_raw()
}

/// Multiplicity of the knot at `index`, 0 when out of range.
pub fn knot_multiplicity(kv: &KnotVector, index: i32) -> i32 {
    index_from_raw(index)
        .and_then(|i| kv.multiplicity(i))
        .map_or(0, |m| m as i32)
}
