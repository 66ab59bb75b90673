//! Uniform knot vector construction.

use cst_core::{KnotError, Result};

use super::classify::KnotEnd;
use super::greville::minimum_cv_count;
use super::knot::{check_counts, knot_count, KnotVector};

fn check_spacing(delta: f64) -> Result<()> {
    if delta.is_finite() && delta > 0.0 {
        Ok(())
    } else {
        Err(KnotError::InvalidSpacing(delta))
    }
}

impl KnotVector {
    /// Clamped knots with uniform interior spacing `delta`.
    ///
    /// The domain is `(0, (cv_count - order + 1) * delta)`.
    pub fn clamped_uniform(order: usize, cv_count: usize, delta: f64) -> Result<Self> {
        check_counts(order, cv_count)?;
        check_spacing(delta)?;
        let mut knots = vec![0.0; knot_count(order, cv_count)];
        for (n, i) in (order - 2..cv_count).enumerate() {
            knots[i] = n as f64 * delta;
        }
        let mut kv = Self::from_parts(order, cv_count, knots);
        kv.clamp_knots(KnotEnd::Both);
        Ok(kv)
    }

    /// Unclamped knots `knot[i] = (i - (order - 2)) * delta`.
    ///
    /// The domain is `(0, (cv_count - order + 1) * delta)` and the outer knots
    /// wrap, so the vector is periodic.
    pub fn periodic_uniform(order: usize, cv_count: usize, delta: f64) -> Result<Self> {
        check_counts(order, cv_count)?;
        if order < 3 {
            return Err(KnotError::InvalidOperation(format!(
                "periodic knot vectors need order >= 3, got {order}"
            )));
        }
        let minimum = minimum_cv_count(order, true);
        if cv_count < minimum {
            return Err(KnotError::InvalidCvCount {
                order,
                cv_count,
                minimum,
            });
        }
        check_spacing(delta)?;
        let offset = (order - 2) as f64;
        let knots = (0..knot_count(order, cv_count))
            .map(|i| (i as f64 - offset) * delta)
            .collect();
        Ok(Self::from_parts(order, cv_count, knots))
    }

    /// Uniform knots, periodic or clamped.
    pub fn uniform(order: usize, cv_count: usize, delta: f64, periodic: bool) -> Result<Self> {
        if periodic {
            Self::periodic_uniform(order, cv_count, delta)
        } else {
            Self::clamped_uniform(order, cv_count, delta)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::nurbs::KnotStyle;
    use cst_core::Validate;

    #[test]
    fn test_clamped_uniform_cubic() {
        let kv = KnotVector::clamped_uniform(4, 7, 1.0).unwrap();
        assert_eq!(kv.knots(), &[0.0, 0.0, 0.0, 1.0, 2.0, 3.0, 4.0, 4.0, 4.0]);
        assert_eq!(kv.span_count(), 4);
        assert_eq!(kv.domain(), (0.0, 4.0));
        assert_eq!(kv.style(), KnotStyle::QuasiUniform);
    }

    #[test]
    fn test_clamped_uniform_linear() {
        let kv = KnotVector::clamped_uniform(2, 3, 0.5).unwrap();
        assert_eq!(kv.knots(), &[0.0, 0.5, 1.0]);
    }

    #[test]
    fn test_periodic_uniform() {
        let kv = KnotVector::periodic_uniform(3, 5, 2.0).unwrap();
        assert_eq!(kv.knots(), &[-2.0, 0.0, 2.0, 4.0, 6.0, 8.0]);
        assert_eq!(kv.domain(), (0.0, 6.0));
        assert!(kv.is_periodic());
        assert!(kv.is_valid());
    }

    #[test]
    fn test_uniform_dispatch() {
        assert!(KnotVector::uniform(4, 8, 1.0, true).unwrap().is_periodic());
        assert!(KnotVector::uniform(4, 8, 1.0, false)
            .unwrap()
            .is_clamped(KnotEnd::Both));
    }

    #[test]
    fn test_construction_preconditions() {
        assert_eq!(
            KnotVector::clamped_uniform(4, 7, 0.0),
            Err(KnotError::InvalidSpacing(0.0))
        );
        assert!(matches!(
            KnotVector::clamped_uniform(4, 3, 1.0),
            Err(KnotError::InvalidCvCount { .. })
        ));
        assert!(matches!(
            KnotVector::periodic_uniform(4, 5, 1.0),
            Err(KnotError::InvalidCvCount { minimum: 6, .. })
        ));
        assert!(matches!(
            KnotVector::periodic_uniform(2, 5, 1.0),
            Err(KnotError::InvalidOperation(_))
        ));
    }
}
