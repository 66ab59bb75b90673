//! Boehm knot insertion.

use cst_core::{KnotError, Result};

use super::cv::ControlPoints;
use super::deboor::check_pair;
use super::knot::KnotVector;
use super::span::Side;

/// Insert `value` into `knots` until its multiplicity reaches `multiplicity`.
///
/// `value` snaps to an existing knot within tolerance and must lie strictly
/// inside the domain. The control points are updated so the curve keeps its
/// shape. Returns the number of knots added, 0 when the value already has the
/// requested multiplicity. Nothing is modified on error.
pub fn insert_knot(
    knots: &mut KnotVector,
    cvs: &mut ControlPoints,
    value: f64,
    multiplicity: usize,
    hint: Option<usize>,
) -> Result<usize> {
    check_pair(knots, cvs)?;
    let d = knots.degree();
    if multiplicity == 0 || multiplicity > d {
        return Err(KnotError::InvalidMultiplicity {
            multiplicity,
            max: d,
        });
    }

    let (t0, t1) = knots.domain();
    let span = knots.span_index(value, Side::Above, hint);
    let lo = knots.knots()[span + d - 1];
    let hi = knots.knots()[span + d];
    let tol = knots.tolerance();
    let (u, existing) = if tol.param_eq(lo, value) {
        (lo, knots.multiplicity(span + d - 1).unwrap_or(0))
    } else if tol.param_eq(hi, value) {
        (hi, knots.multiplicity(span + d).unwrap_or(0))
    } else {
        (value, 0)
    };
    if !(t0 < u && u < t1) {
        return Err(KnotError::OutsideDomain { t: value, t0, t1 });
    }

    let added = multiplicity.saturating_sub(existing);
    let cv_dim = cvs.cv_dim();
    let mut hint = Some(span);
    for _ in 0..added {
        let s = knots.span_index(u, Side::Above, hint);
        let k = knots.knots();
        let old = cvs.gather(s, d + 1);
        // q[m] replaces cv[s+1+m]; the last one is inserted
        let q: Vec<Vec<f64>> = (s + 1..=s + d)
            .map(|i| {
                let a = (u - k[i - 1]) / (k[i + d - 1] - k[i - 1]);
                let prev = &old[(i - 1 - s) * cv_dim..(i - s) * cv_dim];
                let next = &old[(i - s) * cv_dim..(i - s + 1) * cv_dim];
                prev.iter().zip(next).map(|(p, n)| (1.0 - a) * p + a * n).collect()
            })
            .collect();

        for (m, cv) in q[..d - 1].iter().enumerate() {
            cvs.set_cv(s + 1 + m, cv);
        }
        cvs.insert_cv(s + d, &q[d - 1]);
        knots.insert_value(s + d, u);
        hint = Some(s + 1);
    }

    if added > 0 {
        log::debug!("inserted knot {u} {added} time(s), cv_count now {}", knots.cv_count());
    }
    Ok(added)
}
