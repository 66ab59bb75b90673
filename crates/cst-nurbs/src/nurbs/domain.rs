//! Domain changes, reversal, and comparison of knot vectors.

use std::cmp::Ordering;

use cst_core::{KnotError, Result};

use super::knot::KnotVector;

impl KnotVector {
    /// Affinely remap the knots so the domain becomes `(t0, t1)`.
    ///
    /// Knots equal to the old domain ends land exactly on `t0`/`t1`.
    pub fn set_domain(&mut self, t0: f64, t1: f64) -> Result<()> {
        if !(t0.is_finite() && t1.is_finite() && t0 < t1) {
            return Err(KnotError::InvalidDomain(t0, t1));
        }
        let (k0, k1) = self.domain();
        if !(k0 < k1) {
            return Err(KnotError::InvalidDomain(k0, k1));
        }
        if k0 == t0 && k1 == t1 {
            return Ok(());
        }
        let scale = (t1 - t0) / (k1 - k0);
        for k in self.knots_mut() {
            *k = if *k == k0 {
                t0
            } else if *k == k1 {
                t1
            } else {
                t0 + (*k - k0) * scale
            };
        }
        Ok(())
    }

    /// Reverse the parameterization: `knot'[i] = -knot[n-1-i]`.
    ///
    /// The domain `(t0, t1)` becomes `(-t1, -t0)`. Control points must be
    /// reversed separately.
    pub fn reverse(&mut self) {
        let knots = self.knots_mut();
        knots.reverse();
        for k in knots.iter_mut() {
            *k = -*k;
        }
    }

    /// Order by order, then control point count, then knot values.
    ///
    /// Knots closer than the tolerance of the combined domain compare equal.
    pub fn compare(&self, other: &KnotVector) -> Ordering {
        self.order()
            .cmp(&other.order())
            .then(self.cv_count().cmp(&other.cv_count()))
            .then_with(|| {
                let (a0, a1) = self.domain();
                let (b0, b1) = other.domain();
                let tol = self
                    .tolerance()
                    .domain_tolerance(a0.min(b0), a1.max(b1));
                self.knots()
                    .iter()
                    .zip(other.knots())
                    .find(|(a, b)| (*a - *b).abs() > tol)
                    .and_then(|(a, b)| a.partial_cmp(b))
                    .unwrap_or(Ordering::Equal)
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cubic() -> KnotVector {
        KnotVector::new(4, 6, vec![0.0, 0.0, 0.0, 1.0, 3.0, 4.0, 4.0, 4.0]).unwrap()
    }

    #[test]
    fn test_set_domain() {
        let mut kv = cubic();
        kv.set_domain(10.0, 12.0).unwrap();
        assert_eq!(kv.domain(), (10.0, 12.0));
        assert_eq!(kv.knots(), &[10.0, 10.0, 10.0, 10.5, 11.5, 12.0, 12.0, 12.0]);
    }

    #[test]
    fn test_set_domain_rejects_empty_interval() {
        let mut kv = cubic();
        assert_eq!(kv.set_domain(1.0, 1.0), Err(KnotError::InvalidDomain(1.0, 1.0)));
        assert_eq!(kv.domain(), (0.0, 4.0));
    }

    #[test]
    fn test_reverse() {
        let mut kv = cubic();
        kv.reverse();
        assert_eq!(kv.domain(), (-4.0, 0.0));
        assert_eq!(kv.knots(), &[-4.0, -4.0, -4.0, -3.0, -1.0, 0.0, 0.0, 0.0]);
        kv.reverse();
        assert_eq!(kv, cubic());
    }

    #[test]
    fn test_compare() {
        let a = cubic();
        let mut b = cubic();
        assert_eq!(a.compare(&b), Ordering::Equal);

        b.knots_mut()[3] += 1e-12;
        assert_eq!(a.compare(&b), Ordering::Equal);

        b.knots_mut()[3] = 2.0;
        assert_eq!(a.compare(&b), Ordering::Less);
        assert_eq!(b.compare(&a), Ordering::Greater);

        let quadratic = KnotVector::new(3, 6, vec![0.0, 0.0, 1.0, 2.0, 3.0, 4.0, 4.0]).unwrap();
        assert_eq!(quadratic.compare(&a), Ordering::Less);
    }
}
