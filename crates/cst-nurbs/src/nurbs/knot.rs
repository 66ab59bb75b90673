//! The knot vector value type and its tolerance queries.
//!
//! Knots are stored without the two superfluous end knots of the textbook
//! formulation, so a vector for `order` and `cv_count` holds
//! `cv_count + order - 2` values and its domain is
//! `[knot[order-2], knot[cv_count-1]]`.

use cst_core::{KnotError, Result, Tolerance, Validate};
use serde::{Deserialize, Serialize};

/// Number of knots for a NURBS of the given order and control point count.
pub fn knot_count(order: usize, cv_count: usize) -> usize {
    (order + cv_count).saturating_sub(2)
}

pub(crate) fn check_counts(order: usize, cv_count: usize) -> Result<()> {
    if order < 2 {
        return Err(KnotError::InvalidOrder { order });
    }
    if cv_count < order {
        return Err(KnotError::InvalidCvCount {
            order,
            cv_count,
            minimum: order,
        });
    }
    Ok(())
}

/// A non-decreasing sequence of knots paired with its order and control point count.
///
/// Deserialization goes through [`KnotVector::new`], so a decoded vector
/// always has a consistent layout.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "KnotVectorParts")]
pub struct KnotVector {
    order: usize,
    cv_count: usize,
    knots: Vec<f64>,
    tolerance: Tolerance,
}

#[derive(Deserialize)]
struct KnotVectorParts {
    order: usize,
    cv_count: usize,
    knots: Vec<f64>,
    #[serde(default)]
    tolerance: Tolerance,
}

impl TryFrom<KnotVectorParts> for KnotVector {
    type Error = KnotError;

    fn try_from(parts: KnotVectorParts) -> Result<Self> {
        Ok(Self::new(parts.order, parts.cv_count, parts.knots)?.with_tolerance(parts.tolerance))
    }
}

impl KnotVector {
    /// Wrap an explicit knot sequence.
    ///
    /// Only the layout is checked here (order, count, finiteness). Ordering and
    /// multiplicity are validity properties, see [`Validate::validate`].
    pub fn new(order: usize, cv_count: usize, knots: Vec<f64>) -> Result<Self> {
        check_counts(order, cv_count)?;
        let expected = knot_count(order, cv_count);
        if knots.len() != expected {
            return Err(KnotError::KnotCountMismatch {
                expected,
                found: knots.len(),
            });
        }
        if let Some((index, &value)) = knots.iter().enumerate().find(|(_, k)| !k.is_finite()) {
            return Err(KnotError::NonFiniteKnot { index, value });
        }
        Ok(Self::from_parts(order, cv_count, knots))
    }

    pub(crate) fn from_parts(order: usize, cv_count: usize, knots: Vec<f64>) -> Self {
        Self {
            order,
            cv_count,
            knots,
            tolerance: Tolerance::default(),
        }
    }

    /// Replace the tolerance used by every comparison on this vector.
    pub fn with_tolerance(mut self, tolerance: Tolerance) -> Self {
        self.tolerance = tolerance;
        self
    }

    pub fn order(&self) -> usize {
        self.order
    }

    pub fn degree(&self) -> usize {
        self.order - 1
    }

    pub fn cv_count(&self) -> usize {
        self.cv_count
    }

    pub fn knot_count(&self) -> usize {
        self.knots.len()
    }

    pub fn knots(&self) -> &[f64] {
        &self.knots
    }

    pub fn tolerance(&self) -> Tolerance {
        self.tolerance
    }

    pub fn into_knots(self) -> Vec<f64> {
        self.knots
    }

    pub(crate) fn knots_mut(&mut self) -> &mut [f64] {
        &mut self.knots
    }

    /// Insert a single knot at `position`, growing the control point count by one.
    pub(crate) fn insert_value(&mut self, position: usize, value: f64) {
        self.knots.insert(position, value);
        self.cv_count += 1;
    }

    /// Parametric domain `(knot[order-2], knot[cv_count-1])`.
    pub fn domain(&self) -> (f64, f64) {
        (self.knots[self.order - 2], self.knots[self.cv_count - 1])
    }

    /// Tolerance of the domain endpoints.
    pub fn domain_tolerance(&self) -> f64 {
        let (t0, t1) = self.domain();
        self.tolerance.domain_tolerance(t0, t1)
    }

    /// Tolerance for deciding whether the knot at `index` coincides with a neighbor.
    ///
    /// Scaled by the knots at the edges of the window
    /// `index-order+1 ..= index+order-1`, i.e. the support of the basis
    /// functions that see this knot. Returns 0 for an out-of-range index.
    pub fn knot_tolerance(&self, index: usize) -> f64 {
        let n = self.knots.len();
        if index >= n {
            return 0.0;
        }
        let i0 = index.saturating_sub(self.order - 1);
        let i1 = (index + self.order - 1).min(n - 1);
        self.tolerance
            .domain_tolerance(self.knots[i0], self.knots[i1])
    }

    /// Tolerance of the span `[knot[span_index+order-2], knot[span_index+order-1]]`.
    pub fn span_tolerance(&self, span_index: usize) -> f64 {
        if span_index + self.order > self.cv_count {
            return 0.0;
        }
        let i0 = span_index + self.order - 2;
        self.tolerance
            .domain_tolerance(self.knots[i0], self.knots[i0 + 1])
    }

    /// Whether `knot[j]` and `knot[j+1]` belong to the same cluster.
    pub(crate) fn coincide(&self, j: usize) -> bool {
        let gap = self.knots[j + 1] - self.knots[j];
        gap.abs() <= self.knot_tolerance(j)
    }

    /// Inclusive index range of the knot cluster containing `index`.
    ///
    /// Neighbors are grouped sequentially: a chain of pairwise coincident
    /// knots forms one cluster even if its ends are further apart than the
    /// tolerance.
    pub(crate) fn cluster(&self, index: usize) -> (usize, usize) {
        let mut lo = index;
        while lo > 0 && self.coincide(lo - 1) {
            lo -= 1;
        }
        let mut hi = index;
        while hi + 1 < self.knots.len() && self.coincide(hi) {
            hi += 1;
        }
        (lo, hi)
    }

    /// Number of knots equal (within tolerance) to the knot at `index`.
    pub fn multiplicity(&self, index: usize) -> Option<usize> {
        if index >= self.knots.len() {
            return None;
        }
        let (lo, hi) = self.cluster(index);
        Some(hi - lo + 1)
    }
}

impl Validate for KnotVector {
    fn validate(&self) -> Result<()> {
        let result = self.check();
        if let Err(err) = &result {
            log::debug!("invalid knot vector (order {}, cv_count {}): {err}", self.order, self.cv_count);
        }
        result
    }
}

impl KnotVector {
    fn check(&self) -> Result<()> {
        let k = &self.knots;
        for (i, pair) in k.windows(2).enumerate() {
            if pair[1] < pair[0] {
                return Err(KnotError::Decreasing {
                    index: i,
                    prev: pair[0],
                    next: pair[1],
                });
            }
        }

        let start = self.order - 2;
        if self.coincide(start) {
            return Err(KnotError::EmptyEndSpan {
                end: "first",
                index: start,
                value: k[start],
            });
        }
        let end = self.cv_count - 2;
        if self.coincide(end) {
            return Err(KnotError::EmptyEndSpan {
                end: "last",
                index: end,
                value: k[end],
            });
        }

        let mut i = 0;
        while i < k.len() {
            let (lo, hi) = self.cluster(i);
            let multiplicity = hi - lo + 1;
            if multiplicity > self.order {
                return Err(KnotError::MultiplicityExceeded {
                    index: lo,
                    value: k[lo],
                    multiplicity,
                    max: self.order,
                });
            }
            i = hi + 1;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cubic() -> KnotVector {
        KnotVector::new(4, 7, vec![0.0, 0.0, 0.0, 1.0, 2.0, 3.0, 4.0, 4.0, 4.0]).unwrap()
    }

    #[test]
    fn test_knot_count() {
        assert_eq!(knot_count(4, 7), 9);
        assert_eq!(knot_count(2, 2), 2);
    }

    #[test]
    fn test_new_rejects_bad_layout() {
        assert_eq!(
            KnotVector::new(1, 3, vec![0.0, 1.0]),
            Err(KnotError::InvalidOrder { order: 1 })
        );
        assert!(matches!(
            KnotVector::new(4, 3, vec![0.0; 5]),
            Err(KnotError::InvalidCvCount { minimum: 4, .. })
        ));
        assert_eq!(
            KnotVector::new(3, 4, vec![0.0, 0.0, 1.0]),
            Err(KnotError::KnotCountMismatch {
                expected: 5,
                found: 3
            })
        );
        assert!(matches!(
            KnotVector::new(2, 2, vec![0.0, f64::NAN]),
            Err(KnotError::NonFiniteKnot { index: 1, .. })
        ));
    }

    #[test]
    fn test_domain() {
        assert_eq!(cubic().domain(), (0.0, 4.0));
    }

    #[test]
    fn test_multiplicity() {
        let kv = cubic();
        assert_eq!(kv.multiplicity(0), Some(3));
        assert_eq!(kv.multiplicity(2), Some(3));
        assert_eq!(kv.multiplicity(4), Some(1));
        assert_eq!(kv.multiplicity(8), Some(3));
        assert_eq!(kv.multiplicity(9), None);
    }

    #[test]
    fn test_multiplicity_uses_tolerance() {
        let kv = KnotVector::new(3, 5, vec![0.0, 0.0, 1.0, 1.0 + 1e-12, 2.0, 2.0]).unwrap();
        assert_eq!(kv.multiplicity(2), Some(2));
        assert_eq!(kv.multiplicity(3), Some(2));

        let tight = kv.clone().with_tolerance(Tolerance::new(1e-14, f64::EPSILON));
        assert_eq!(tight.multiplicity(2), Some(1));
    }

    #[test]
    fn test_multiplicity_follows_neighbor_chain() {
        let stacked = KnotVector::new(3, 6, vec![0.0, 0.0, 10.0, 10.0, 10.0, 20.0, 20.0]).unwrap();
        let h = 0.75 * stacked.knot_tolerance(2);

        // 10 ~ 10+h and 10+h ~ 10+2h, but 10 and 10+2h are further apart than the tolerance
        let chained = vec![0.0, 0.0, 10.0, 10.0 + h, 10.0 + 2.0 * h, 20.0, 20.0];
        let kv = KnotVector::new(3, 6, chained).unwrap();
        assert!(h <= kv.knot_tolerance(2));
        assert!(h <= kv.knot_tolerance(3));
        assert!(2.0 * h > kv.knot_tolerance(2));
        for i in 2..=4 {
            assert_eq!(kv.multiplicity(i), Some(3));
        }
        assert!(kv.is_valid());

        // a fourth link pushes the chain past order 3
        let longer = vec![0.0, 0.0, 10.0, 10.0 + h, 10.0 + 2.0 * h, 10.0 + 3.0 * h, 20.0, 20.0];
        let kv = KnotVector::new(3, 7, longer).unwrap();
        for i in 2..=5 {
            assert_eq!(kv.multiplicity(i), Some(4));
        }
        assert!(matches!(
            kv.validate(),
            Err(KnotError::MultiplicityExceeded {
                index: 2,
                multiplicity: 4,
                max: 3,
                ..
            })
        ));
    }

    #[test]
    fn test_deserialize_checks_layout() {
        let short = serde_json::from_str::<KnotVector>(r#"{"order":4,"cv_count":7,"knots":[0.0,1.0]}"#);
        assert!(short.is_err());
        let order_one = serde_json::from_str::<KnotVector>(r#"{"order":1,"cv_count":2,"knots":[0.0]}"#);
        assert!(order_one.is_err());

        let kv: KnotVector =
            serde_json::from_str(r#"{"order":2,"cv_count":2,"knots":[0.0,1.0]}"#).unwrap();
        assert_eq!(kv.domain(), (0.0, 1.0));
        assert_eq!(kv.tolerance(), Tolerance::default());
    }

    #[test]
    fn test_validate() {
        assert!(cubic().is_valid());

        let decreasing = KnotVector::new(3, 4, vec![0.0, 0.0, 2.0, 1.0, 1.0]).unwrap();
        assert!(matches!(
            decreasing.validate(),
            Err(KnotError::Decreasing { index: 2, .. })
        ));

        let empty_start = KnotVector::new(3, 4, vec![0.0, 0.0, 0.0, 1.0, 1.0]).unwrap();
        assert!(matches!(
            empty_start.validate(),
            Err(KnotError::EmptyEndSpan { end: "first", .. })
        ));

        // order 3 allows an interior knot of multiplicity 3, not 4
        let full = KnotVector::new(3, 7, vec![0.0, 0.0, 1.0, 1.0, 1.0, 2.0, 3.0, 3.0]).unwrap();
        assert!(full.is_valid());
        let over = KnotVector::new(3, 8, vec![0.0, 0.0, 1.0, 1.0, 1.0, 1.0, 2.0, 3.0, 3.0]).unwrap();
        assert!(matches!(
            over.validate(),
            Err(KnotError::MultiplicityExceeded {
                index: 2,
                multiplicity: 4,
                max: 3,
                ..
            })
        ));
    }

    #[test]
    fn test_span_tolerance() {
        let kv = cubic();
        assert!(kv.span_tolerance(0) > 0.0);
        assert_eq!(kv.span_tolerance(4), 0.0);
        assert!(kv.domain_tolerance() > kv.span_tolerance(0));
    }
}
