//! Basis functions, blossoms, and De Boor evaluation.
//!
//! Span `s` of a knot vector is supported by the `2*degree` local knots
//! `knot[s..s+2*degree]` and the `degree + 1` control points `cv[s..=s+degree]`;
//! the span itself is `[knot[s+degree-1], knot[s+degree]]`.

use cst_core::{KnotError, Result, Validate};

use super::cv::ControlPoints;
use super::knot::KnotVector;
use super::span::Side;

/// Triangular table of basis function values and knot differences (The NURBS
/// Book, A2.2). Column `degree` holds the basis functions.
fn ndu_table(degree: usize, local: &[f64], t: f64) -> Vec<Vec<f64>> {
    let p = degree;
    let mut ndu = vec![vec![0.0; p + 1]; p + 1];
    let mut left = vec![0.0; p + 1];
    let mut right = vec![0.0; p + 1];

    ndu[0][0] = 1.0;

    for j in 1..=p {
        left[j] = t - local[p - j];
        right[j] = local[p + j - 1] - t;
        let mut saved = 0.0;

        for r in 0..j {
            // Lower triangle
            ndu[j][r] = right[r + 1] + left[j - r];
            let temp = ndu[r][j - 1] / ndu[j][r];

            // Upper triangle
            ndu[r][j] = saved + right[r + 1] * temp;
            saved = left[j - r] * temp;
        }
        ndu[j][j] = saved;
    }

    ndu
}

fn local_knots(degree: usize, knots: &[f64], span: usize) -> Option<&[f64]> {
    knots.get(span..span + 2 * degree)
}

/// The `degree + 1` basis functions that are non-zero on `span`, evaluated at `t`.
///
/// Returns `None` if `knots` does not hold the span's local knots.
pub fn basis_functions(degree: usize, knots: &[f64], span: usize, t: f64) -> Option<Vec<f64>> {
    let local = local_knots(degree, knots, span)?;
    let ndu = ndu_table(degree, local, t);
    Some((0..=degree).map(|j| ndu[j][degree]).collect())
}

/// Basis functions and their first derivatives at `t`.
pub fn basis_functions_derivs(
    degree: usize,
    knots: &[f64],
    span: usize,
    t: f64,
) -> Option<(Vec<f64>, Vec<f64>)> {
    let local = local_knots(degree, knots, span)?;
    let p = degree;
    let ndu = ndu_table(p, local, t);

    let values = (0..=p).map(|j| ndu[j][p]).collect();
    let derivs = (0..=p)
        .map(|r| {
            let mut d = 0.0;
            if r >= 1 {
                d += ndu[r - 1][p - 1] / ndu[p][r - 1];
            }
            if r < p {
                d -= ndu[r][p - 1] / ndu[p][r];
            }
            p as f64 * d
        })
        .collect();

    Some((values, derivs))
}

/// Check that `cvs` matches `knots` and that the knot vector is valid.
pub(crate) fn check_pair(knots: &KnotVector, cvs: &ControlPoints) -> Result<()> {
    if cvs.count() != knots.cv_count() {
        return Err(KnotError::CvCountMismatch {
            expected: knots.cv_count(),
            found: cvs.count(),
        });
    }
    knots.validate()
}

fn accumulate(weights: &[f64], cvs: &ControlPoints, first: usize) -> Vec<f64> {
    let mut out = vec![0.0; cvs.cv_dim()];
    for (i, w) in weights.iter().enumerate() {
        if let Some(cv) = cvs.cv(first + i) {
            for (o, c) in out.iter_mut().zip(cv) {
                *o += w * c;
            }
        }
    }
    out
}

/// Evaluate the spline at `t`.
///
/// Returns `cv_dim` values; rational results are homogeneous (divide by the
/// last value for the Euclidean point). `side` picks the span at a knot and
/// `hint` seeds the span search.
pub fn evaluate(
    knots: &KnotVector,
    cvs: &ControlPoints,
    t: f64,
    side: Side,
    hint: Option<usize>,
) -> Result<Vec<f64>> {
    check_pair(knots, cvs)?;
    let span = knots.span_index(t, side, hint);
    let basis = basis_functions(knots.degree(), knots.knots(), span, t)
        .ok_or_else(|| KnotError::InvalidOperation(format!("span {span} has no local knots")))?;
    Ok(accumulate(&basis, cvs, span))
}

/// Evaluate the spline and its first derivative at `t`, both homogeneous.
pub fn evaluate_with_derivative(
    knots: &KnotVector,
    cvs: &ControlPoints,
    t: f64,
    side: Side,
    hint: Option<usize>,
) -> Result<(Vec<f64>, Vec<f64>)> {
    check_pair(knots, cvs)?;
    let span = knots.span_index(t, side, hint);
    let (basis, dbasis) = basis_functions_derivs(knots.degree(), knots.knots(), span, t)
        .ok_or_else(|| KnotError::InvalidOperation(format!("span {span} has no local knots")))?;
    Ok((accumulate(&basis, cvs, span), accumulate(&dbasis, cvs, span)))
}

/// Blossom of one span at the `degree` arguments `args`.
///
/// `local` holds the span's `2*degree` knots and `cvs` its `degree + 1`
/// control points packed `cv_dim` wide. With every argument equal to `t` this
/// is the De Boor evaluation at `t`.
pub(crate) fn blossom(degree: usize, local: &[f64], cvs: &[f64], cv_dim: usize, args: &[f64]) -> Vec<f64> {
    let d = degree;
    let mut p = cvs[..(d + 1) * cv_dim].to_vec();
    for (r, &u) in (1..=d).zip(args) {
        for j in (r..=d).rev() {
            let k0 = local[j - 1];
            let k1 = local[j + d - r];
            let a = (u - k0) / (k1 - k0);
            for c in 0..cv_dim {
                p[j * cv_dim + c] = (1.0 - a) * p[(j - 1) * cv_dim + c] + a * p[j * cv_dim + c];
            }
        }
    }
    p[d * cv_dim..(d + 1) * cv_dim].to_vec()
}
