//! Reparameterization and weight changes of rational curves.
//!
//! Scaling the control point weights of a rational Bezier by `c^i` moves no
//! point of the curve; it only changes the parameterization by the Möbius map
//! `s = u / (c - (c - 1) * u)` on the normalized domain. The NURBS variants
//! apply the same map to the knots.

use cst_core::{KnotError, Result};

use super::classify::KnotEnd;
use super::clamp::clamp_knot_vector;
use super::cv::ControlPoints;
use super::deboor::check_pair;
use super::knot::KnotVector;

fn check_constant(c: f64) -> Result<()> {
    if c.is_finite() && c > 0.0 {
        Ok(())
    } else {
        Err(KnotError::InvalidReparameterization(c))
    }
}

fn check_rational(cvs: &ControlPoints) -> Result<()> {
    if cvs.is_rational() {
        Ok(())
    } else {
        Err(KnotError::NotRational)
    }
}

fn check_weight(name: &str, w: f64) -> Result<()> {
    if w.is_finite() && w != 0.0 {
        Ok(())
    } else {
        Err(KnotError::InvalidWeight(format!("{name}={w}")))
    }
}

/// Scale rational Bezier control point `i` by `c^i`.
///
/// `c == 1` leaves the control points untouched.
pub fn reparameterize_rational_bezier(cvs: &mut ControlPoints, c: f64) -> Result<()> {
    check_rational(cvs)?;
    check_constant(c)?;
    if c == 1.0 {
        return Ok(());
    }
    let mut factor = c;
    for i in 1..cvs.count() {
        cvs.scale_cv(i, factor);
        factor *= c;
    }
    Ok(())
}

/// Give rational Bezier control points `i0` and `i1` the weights `w0` and `w1`
/// without changing the curve's locus.
///
/// All control points are scaled by a common factor and then reparameterized.
/// Each requested weight must have the sign of the current one. Nothing is
/// modified on error.
pub fn change_rational_bezier_weights(
    cvs: &mut ControlPoints,
    i0: usize,
    w0: f64,
    i1: usize,
    w1: f64,
) -> Result<()> {
    check_rational(cvs)?;
    let count = cvs.count();
    if i0 >= count || i1 >= count {
        return Err(KnotError::InvalidOperation(format!(
            "weight indices ({i0}, {i1}) out of range for {count} control points"
        )));
    }
    if i0 == i1 && w0 != w1 {
        return Err(KnotError::InvalidWeight(format!(
            "conflicting weights {w0} and {w1} for control point {i0}"
        )));
    }
    let ((i0, w0), (i1, w1)) = if i0 <= i1 { ((i0, w0), (i1, w1)) } else { ((i1, w1), (i0, w0)) };
    check_weight("w0", w0)?;
    check_weight("w1", w1)?;
    let v0 = cvs.weight(i0).unwrap_or(0.0);
    let v1 = cvs.weight(i1).unwrap_or(0.0);
    if w0 * v0 <= 0.0 || w1 * v1 <= 0.0 {
        return Err(KnotError::InvalidWeight(format!(
            "weights ({w0}, {w1}) must have the signs of the current weights ({v0}, {v1})"
        )));
    }

    let (s, r) = if i0 == i1 {
        (w0 / v0, 1.0)
    } else {
        let r = ((w1 / v1) / (w0 / v0)).powf(1.0 / (i1 - i0) as f64);
        (w0 / v0 / r.powi(i0 as i32), r)
    };
    check_constant(r)?;

    if s != 1.0 {
        for i in 0..count {
            cvs.scale_cv(i, s);
        }
    }
    reparameterize_rational_bezier(cvs, r)?;
    cvs.set_weight(i0, w0);
    cvs.set_weight(i1, w1);
    log::trace!("changed bezier weights: scale {s}, reparameterization {r}");
    Ok(())
}

/// Apply the Möbius reparameterization with constant `c` to a rational NURBS.
///
/// The knots are mapped through the normalized domain and the control points
/// rescaled so the locus is unchanged; knots at the domain ends stay put.
/// Knots outside the domain of an unclamped vector must stay on the
/// increasing branch of the map (`c - (c - 1) * u > 0`), otherwise the
/// constant is rejected. Nothing is modified on error.
pub fn reparameterize_rational_nurbs(knots: &mut KnotVector, cvs: &mut ControlPoints, c: f64) -> Result<()> {
    check_rational(cvs)?;
    check_constant(c)?;
    check_pair(knots, cvs)?;
    if c == 1.0 {
        return Ok(());
    }

    let d = knots.degree();
    let (t0, t1) = knots.domain();
    let width = t1 - t0;
    if !(width > 0.0) {
        return Err(KnotError::InvalidDomain(t0, t1));
    }

    let k = knots.knots();
    let mut mapped = Vec::with_capacity(k.len());
    for &knot in k {
        let u = (knot - t0) / width;
        let denom = c - (c - 1.0) * u;
        if !(denom > 0.0) {
            log::debug!("knot {knot} leaves the increasing branch of the map for c={c}");
            return Err(KnotError::InvalidReparameterization(c));
        }
        mapped.push(u / denom);
    }

    let factors: Vec<f64> = (0..cvs.count())
        .map(|i| mapped[i..i + d].iter().map(|s| (c - 1.0) * s + 1.0).product())
        .collect();
    for (i, f) in factors.into_iter().enumerate() {
        cvs.scale_cv(i, f);
    }

    let out = knots.knots_mut();
    for (knot, s) in out.iter_mut().zip(mapped) {
        if *knot != t0 && *knot != t1 {
            *knot = t0 + s * width;
        }
    }
    log::debug!("reparameterized rational nurbs by {c}");
    Ok(())
}

/// Clamp both ends and rescale so the end control points get the weights
/// `w0` and `w1`, without changing the curve's locus or domain.
///
/// Nothing is modified on error.
pub fn change_rational_nurbs_end_weights(
    knots: &mut KnotVector,
    cvs: &mut ControlPoints,
    w0: f64,
    w1: f64,
) -> Result<()> {
    check_rational(cvs)?;
    check_weight("w0", w0)?;
    check_weight("w1", w1)?;
    check_pair(knots, cvs)?;

    let mut new_knots = knots.clone();
    let mut new_cvs = cvs.clone();
    clamp_knot_vector(&mut new_knots, &mut new_cvs, KnotEnd::Both)?;

    let last = new_cvs.count() - 1;
    let v0 = new_cvs.weight(0).unwrap_or(0.0);
    let v1 = new_cvs.weight(last).unwrap_or(0.0);
    check_weight("current start weight", v0)?;
    check_weight("current end weight", v1)?;
    let ratio = (w1 * v0) / (v1 * w0);
    if !(ratio.is_finite() && ratio > 0.0) {
        return Err(KnotError::InvalidWeight(format!(
            "end weights ({w0}, {w1}) are incompatible with the current weights ({v0}, {v1})"
        )));
    }

    let c = ratio.powf(1.0 / new_knots.degree() as f64);
    reparameterize_rational_nurbs(&mut new_knots, &mut new_cvs, c)?;
    let sigma = w0 / v0;
    if sigma != 1.0 {
        for i in 0..=last {
            new_cvs.scale_cv(i, sigma);
        }
    }
    new_cvs.set_weight(0, w0);
    new_cvs.set_weight(last, w1);

    *knots = new_knots;
    *cvs = new_cvs;
    log::debug!("changed end weights to ({w0}, {w1})");
    Ok(())
}
