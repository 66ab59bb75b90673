//! Clamping, unclamping, and periodic end knots.

use cst_core::{KnotError, Result, Validate};

use super::classify::KnotEnd;
use super::cv::ControlPoints;
use super::deboor::{blossom, check_pair};
use super::greville::minimum_cv_count;
use super::knot::KnotVector;

impl KnotVector {
    /// Overwrite the outer knots at `end` with the domain endpoint.
    ///
    /// Only the knots change; a curve using this vector changes shape unless
    /// its control points are updated too, see [`clamp_knot_vector`].
    pub fn clamp_knots(&mut self, end: KnotEnd) {
        let d = self.degree();
        let cv_count = self.cv_count();
        let k = self.knots_mut();
        if end.includes_start() {
            let t = k[d - 1];
            for x in &mut k[..d - 1] {
                *x = t;
            }
        }
        if end.includes_end() {
            let t = k[cv_count - 1];
            for x in &mut k[cv_count..] {
                *x = t;
            }
        }
    }

    /// Rewrite the outer `order - 2` knots at each end so the spacing wraps
    /// around the domain.
    pub fn make_periodic(&mut self) -> Result<()> {
        let order = self.order();
        if order < 3 {
            return Err(KnotError::InvalidOperation(format!(
                "periodic knot vectors need order >= 3, got {order}"
            )));
        }
        let cv_count = self.cv_count();
        let minimum = minimum_cv_count(order, true);
        if cv_count < minimum {
            return Err(KnotError::InvalidCvCount {
                order,
                cv_count,
                minimum,
            });
        }

        let mut periodic = self.clone();
        let p = cv_count - order + 1;
        let (t0, t1) = self.domain();
        let period = t1 - t0;
        let k = periodic.knots_mut();
        for i in 0..order - 2 {
            k[i] = k[i + p] - period;
        }
        for i in cv_count..k.len() {
            k[i] = k[i - p] + period;
        }
        periodic.validate()?;
        *self = periodic;
        Ok(())
    }
}

/// Clamp the knots at `end` and recompute the affected control points so the
/// curve keeps its shape on the domain.
///
/// Clamping an already clamped end only snaps its knots, so repeated calls
/// leave the control points unchanged.
pub fn clamp_knot_vector(knots: &mut KnotVector, cvs: &mut ControlPoints, end: KnotEnd) -> Result<()> {
    check_pair(knots, cvs)?;
    let d = knots.degree();
    if d < 2 {
        return Ok(());
    }
    let cv_dim = cvs.cv_dim();

    if end.includes_start() && !knots.is_clamped(KnotEnd::Start) {
        let local = knots.knots()[..2 * d].to_vec();
        let packed = cvs.gather(0, d + 1);
        let t = local[d - 1];
        for i in 0..d {
            let mut args = vec![t; d - i];
            args.extend_from_slice(&local[d..d + i]);
            let cv = blossom(d, &local, &packed, cv_dim, &args);
            cvs.set_cv(i, &cv);
        }
        knots.clamp_knots(KnotEnd::Start);
        log::debug!("clamped start at {t}");
    }

    if end.includes_end() && !knots.is_clamped(KnotEnd::End) {
        let s = knots.cv_count() - knots.order();
        let local = knots.knots()[s..s + 2 * d].to_vec();
        let packed = cvs.gather(s, d + 1);
        let t = local[d];
        for i in 1..=d {
            let mut args = local[i..d].to_vec();
            args.resize(d, t);
            let cv = blossom(d, &local, &packed, cv_dim, &args);
            cvs.set_cv(s + i, &cv);
        }
        knots.clamp_knots(KnotEnd::End);
        log::debug!("clamped end at {t}");
    }

    // already clamped ends only snap to the domain
    knots.clamp_knots(end);
    Ok(())
}

/// An unclamped copy of a knot vector and its control points.
#[derive(Debug, Clone, PartialEq)]
pub struct Unclamped {
    pub knots: KnotVector,
    pub cvs: ControlPoints,
    pub end: KnotEnd,
}

/// Replace the clamped end knots with knots mirroring the interior spacing and
/// recompute the control points so the curve keeps its shape on the domain.
///
/// Requires degree >= 2. The inputs are left untouched.
pub fn unclamp(knots: &KnotVector, cvs: &ControlPoints, end: KnotEnd) -> Result<Unclamped> {
    if knots.degree() < 2 {
        return Err(KnotError::InvalidOperation(format!(
            "unclamping needs degree >= 2, got {}",
            knots.degree()
        )));
    }
    let mut knots = knots.clone();
    let mut cvs = cvs.clone();
    clamp_knot_vector(&mut knots, &mut cvs, end)?;

    if end.includes_start() {
        unclamp_start(&mut knots, &mut cvs);
    }
    if end.includes_end() {
        unclamp_end(&mut knots, &mut cvs);
    }
    knots.validate()?;
    log::debug!("unclamped {end:?}, domain {:?}", knots.domain());
    Ok(Unclamped { knots, cvs, end })
}

fn unclamp_start(knots: &mut KnotVector, cvs: &mut ControlPoints) {
    let d = knots.degree();
    let cv_dim = cvs.cv_dim();
    let local = knots.knots()[..2 * d].to_vec();
    let packed = cvs.gather(0, d + 1);

    let mut mirrored = local.clone();
    let t = local[d - 1];
    for m in 1..d {
        mirrored[d - 1 - m] = t - (local[d - 1 + m] - t);
    }
    let new_cvs: Vec<Vec<f64>> = (0..d - 1)
        .map(|i| blossom(d, &local, &packed, cv_dim, &mirrored[i..i + d]))
        .collect();

    for (i, cv) in new_cvs.iter().enumerate() {
        cvs.set_cv(i, cv);
    }
    knots.knots_mut()[..d - 1].copy_from_slice(&mirrored[..d - 1]);
}

fn unclamp_end(knots: &mut KnotVector, cvs: &mut ControlPoints) {
    let d = knots.degree();
    let cv_dim = cvs.cv_dim();
    let s = knots.cv_count() - knots.order();
    let local = knots.knots()[s..s + 2 * d].to_vec();
    let packed = cvs.gather(s, d + 1);

    let mut mirrored = local.clone();
    let t = local[d];
    for m in 1..d {
        mirrored[d + m] = t + (t - local[d - m]);
    }
    let new_cvs: Vec<Vec<f64>> = (2..=d)
        .map(|i| blossom(d, &local, &packed, cv_dim, &mirrored[i..i + d]))
        .collect();

    for (m, cv) in new_cvs.iter().enumerate() {
        cvs.set_cv(s + 2 + m, cv);
    }
    knots.knots_mut()[s + d + 1..].copy_from_slice(&mirrored[d + 1..]);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::nurbs::{evaluate, Side};
    use approx::assert_relative_eq;

    fn unclamped_cubic() -> (KnotVector, ControlPoints) {
        let kv = KnotVector::new(4, 6, vec![-2.0, -1.0, 0.0, 1.0, 2.5, 4.0, 5.0, 6.0]).unwrap();
        let cvs = ControlPoints::new(
            2,
            false,
            2,
            vec![0.0, 0.0, 1.0, 2.0, 2.0, 3.0, 3.0, 1.0, 4.0, -1.0, 5.0, 0.0],
        )
        .unwrap();
        (kv, cvs)
    }

    fn assert_same_shape(a: (&KnotVector, &ControlPoints), b: (&KnotVector, &ControlPoints)) {
        let (t0, t1) = a.0.domain();
        for i in 0..=16 {
            let t = t0 + (t1 - t0) * i as f64 / 16.0;
            let p = evaluate(a.0, a.1, t, Side::Above, None).unwrap();
            let q = evaluate(b.0, b.1, t, Side::Above, None).unwrap();
            for (x, y) in p.iter().zip(&q) {
                assert_relative_eq!(*x, *y, epsilon = 1e-9);
            }
        }
    }

    #[test]
    fn test_clamp_knots_only() {
        let (mut kv, _) = unclamped_cubic();
        kv.clamp_knots(KnotEnd::Start);
        assert_eq!(kv.knots(), &[0.0, 0.0, 0.0, 1.0, 2.5, 4.0, 5.0, 6.0]);
        kv.clamp_knots(KnotEnd::End);
        assert_eq!(kv.knots(), &[0.0, 0.0, 0.0, 1.0, 2.5, 4.0, 4.0, 4.0]);
    }

    #[test]
    fn test_clamp_preserves_shape() {
        let (kv, cvs) = unclamped_cubic();
        let (mut kv2, mut cvs2) = (kv.clone(), cvs.clone());
        clamp_knot_vector(&mut kv2, &mut cvs2, KnotEnd::Both).unwrap();
        assert!(kv2.is_clamped(KnotEnd::Both));
        assert_same_shape((&kv, &cvs), (&kv2, &cvs2));

        // the clamped curve interpolates its end control points
        let start = evaluate(&kv2, &cvs2, 0.0, Side::Above, None).unwrap();
        for (a, b) in cvs2.cv(0).unwrap().iter().zip(&start) {
            assert_relative_eq!(*a, *b, epsilon = 1e-12);
        }
    }

    #[test]
    fn test_clamp_is_idempotent() {
        let (mut kv, mut cvs) = unclamped_cubic();
        clamp_knot_vector(&mut kv, &mut cvs, KnotEnd::Both).unwrap();
        let (kv_once, cvs_once) = (kv.clone(), cvs.clone());
        clamp_knot_vector(&mut kv, &mut cvs, KnotEnd::Both).unwrap();
        assert_eq!(kv, kv_once);
        assert_eq!(cvs, cvs_once);
    }

    #[test]
    fn test_unclamp_then_clamp() {
        let (mut kv, mut cvs) = unclamped_cubic();
        clamp_knot_vector(&mut kv, &mut cvs, KnotEnd::Both).unwrap();

        let un = unclamp(&kv, &cvs, KnotEnd::Both).unwrap();
        assert_eq!(un.end, KnotEnd::Both);
        assert!(!un.knots.is_clamped(KnotEnd::Start));
        assert!(!un.knots.is_clamped(KnotEnd::End));
        assert_eq!(un.knots.knots(), &[-2.5, -1.0, 0.0, 1.0, 2.5, 4.0, 5.5, 7.0]);
        assert_same_shape((&kv, &cvs), (&un.knots, &un.cvs));

        let (mut kv2, mut cvs2) = (un.knots, un.cvs);
        clamp_knot_vector(&mut kv2, &mut cvs2, KnotEnd::Both).unwrap();
        assert_eq!(kv2, kv);
        for (a, b) in cvs2.data().iter().zip(cvs.data()) {
            assert_relative_eq!(*a, *b, epsilon = 1e-9);
        }
    }

    #[test]
    fn test_unclamp_bezier() {
        let kv = KnotVector::new(5, 5, vec![0.0, 0.0, 0.0, 0.0, 1.0, 1.0, 1.0, 1.0]).unwrap();
        let cvs = ControlPoints::new(1, false, 1, vec![0.0, 3.0, -1.0, 2.0, 1.0]).unwrap();
        let un = unclamp(&kv, &cvs, KnotEnd::Both).unwrap();
        // no interior spacing to mirror, the first unclamped end repeats the far end
        assert_eq!(un.knots.knots(), &[-1.0, -1.0, -1.0, 0.0, 1.0, 2.0, 3.0, 3.0]);
        assert_same_shape((&kv, &cvs), (&un.knots, &un.cvs));
    }

    #[test]
    fn test_unclamp_requires_degree_two() {
        let kv = KnotVector::new(2, 3, vec![0.0, 1.0, 2.0]).unwrap();
        let cvs = ControlPoints::new(1, false, 1, vec![0.0, 1.0, 0.0]).unwrap();
        assert!(matches!(
            unclamp(&kv, &cvs, KnotEnd::Start),
            Err(KnotError::InvalidOperation(_))
        ));
    }

    #[test]
    fn test_make_periodic() {
        let mut kv = KnotVector::new(4, 8, vec![0.0, 0.0, 0.0, 1.0, 3.0, 4.0, 6.0, 7.0, 7.0, 7.0]).unwrap();
        assert!(!kv.is_periodic());
        kv.make_periodic().unwrap();
        assert_eq!(kv.knots(), &[-3.0, -1.0, 0.0, 1.0, 3.0, 4.0, 6.0, 7.0, 8.0, 10.0]);
        assert!(kv.is_periodic());
    }

    #[test]
    fn test_make_periodic_preconditions() {
        let mut quadratic_short = KnotVector::new(3, 3, vec![0.0, 0.0, 1.0, 1.0]).unwrap();
        assert!(matches!(
            quadratic_short.make_periodic(),
            Err(KnotError::InvalidCvCount { minimum: 4, .. })
        ));
        let mut linear = KnotVector::new(2, 4, vec![0.0, 1.0, 2.0, 3.0]).unwrap();
        assert!(linear.make_periodic().is_err());
    }
}
